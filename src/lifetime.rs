//! Service lifetime definitions.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseLifetimeError;

/// Service lifetimes controlling instance caching behavior.
///
/// The lifetime chosen for a concrete registration also decides how its
/// interface aliases resolve: Singleton and Scoped aliases forward to the
/// concrete key, Transient aliases construct their own instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_interfaces::{ServiceCollection, Resolver, Lifetime};
///
/// struct Database { url: String }
/// struct Repository { db_url: String }
/// struct RequestModel { id: u32 }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: One instance for entire application
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string()
/// });
///
/// // Scoped: One instance per scope
/// services.add_scoped_factory::<Repository, _>(|r| {
///     let db = r.get_required::<Database>();
///     Repository { db_url: db.url.clone() }
/// });
///
/// // Transient: New instance every time
/// services.add_transient_factory::<RequestModel, _>(|_| RequestModel { id: 7 });
///
/// let provider = services.build();
/// let scope = provider.create_scope();
///
/// let repo_a = scope.get_required::<Repository>();
/// let repo_b = scope.get_required::<Repository>();
/// assert!(std::ptr::eq(&*repo_a, &*repo_b));
///
/// let model_a = scope.get_required::<RequestModel>();
/// let model_b = scope.get_required::<RequestModel>();
/// assert!(!std::ptr::eq(&*model_a, &*model_b));
///
/// assert_eq!("scoped".parse::<Lifetime>().unwrap(), Lifetime::Scoped);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// Single instance per root provider, cached forever.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime.
    ///
    /// Scoped services cannot be resolved from the root provider.
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}

impl Lifetime {
    /// Whether every resolution within a scope observes the same instance.
    ///
    /// True for Singleton and Scoped; aliases of such registrations must
    /// forward to the concrete key instead of constructing.
    pub fn shares_instance(self) -> bool {
        matches!(self, Lifetime::Singleton | Lifetime::Scoped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifetime {
    type Err = ParseLifetimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "singleton" => Ok(Lifetime::Singleton),
            "scoped" => Ok(Lifetime::Scoped),
            "transient" => Ok(Lifetime::Transient),
            _ => Err(ParseLifetimeError(s.to_string())),
        }
    }
}
