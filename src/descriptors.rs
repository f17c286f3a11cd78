//! Service descriptors for introspection and diagnostics.

use std::fmt;

use crate::key::Key;
use crate::lifetime::Lifetime;

/// How a registered key produces its instance.
///
/// Alias entries created by the interface registrar are either
/// [`Redirect`](ResolutionStrategy::Redirect) or [`Copy`](ResolutionStrategy::Copy);
/// everything else is a plain factory or a pre-built instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Constructed by a factory or an `Injectable` constructor.
    Factory,
    /// Bound to a pre-built instance.
    Instance,
    /// Forwards to the resolution of another key and shares its instance.
    Redirect(Key),
    /// Runs the same constructor as another key, producing its own instance.
    Copy(Key),
}

impl ResolutionStrategy {
    /// The concrete key an alias points at, if this is an alias.
    pub fn alias_target(&self) -> Option<Key> {
        match self {
            ResolutionStrategy::Redirect(key) | ResolutionStrategy::Copy(key) => Some(*key),
            ResolutionStrategy::Factory | ResolutionStrategy::Instance => None,
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStrategy::Factory => f.write_str("factory"),
            ResolutionStrategy::Instance => f.write_str("instance"),
            ResolutionStrategy::Redirect(target) => write!(f, "redirect -> {}", target),
            ResolutionStrategy::Copy(target) => write!(f, "copy of {}", target),
        }
    }
}

/// Service descriptor for introspection and diagnostics
///
/// Describes one registered key: its lifetime, the implementation backing it
/// and, for interface aliases, which concrete key it resolves through.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_interfaces::{
///     interfaces, Injectable, Key, Lifetime, ResolutionStrategy, ResolverContext,
///     DiResult, ServiceCollection, ServiceCollectionInterfaceExt,
/// };
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter {
///     fn greet(&self) -> String { "hello".into() }
/// }
/// interfaces!(EnglishGreeter => [dyn Greeter]);
///
/// impl Injectable for EnglishGreeter {
///     fn create(_: &ResolverContext<'_>) -> DiResult<Self> { Ok(EnglishGreeter) }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.try_add_singleton_with_interfaces::<EnglishGreeter>();
///
/// let descriptors = services.get_service_descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let alias = descriptors.iter().find(|d| d.is_alias()).unwrap();
/// assert_eq!(alias.key, Key::of_trait::<dyn Greeter>());
/// assert_eq!(alias.strategy, ResolutionStrategy::Redirect(Key::of_type::<EnglishGreeter>()));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service key
    pub key: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// How the key produces its instance
    pub strategy: ResolutionStrategy,
    /// Implementation type name (if available)
    pub impl_type_name: Option<&'static str>,
}

impl ServiceDescriptor {
    /// Get the type/trait name
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Whether this entry is an interface alias created by the registrar.
    pub fn is_alias(&self) -> bool {
        self.strategy.alias_target().is_some()
    }
}
