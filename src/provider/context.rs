//! Resolver context handed to factories and alias constructors.

use crate::error::DiResult;
use crate::internal::BoxFutureUnit;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};

/// Context passed to factory functions for resolving dependencies.
///
/// Wraps whichever resolver triggered the construction (root provider or a
/// scope). Redirect aliases resolve their concrete key through it, which is
/// what keeps a scoped alias inside the scope it was requested from.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string()
/// });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService {
///         db: resolver.get_required::<Database>(),
///     }
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.resolver.push_sync_disposer(f);
    }

    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> BoxFutureUnit + Send>) {
        self.resolver.push_async_disposer(f);
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
