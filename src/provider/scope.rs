//! Scoped service resolution and lifecycle management.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::warn;

use crate::{DiError, DiResult, Key, Lifetime};
use crate::internal::{BoxFutureUnit, DisposeBag};
use crate::registration::{AnyArc, Registration};
use crate::traits::{Resolver, ResolverCore};
use super::{ResolverContext, ServiceProvider};

/// A unit of work with its own cache for scoped services.
///
/// - **Singleton**: resolved and cached in the root provider
/// - **Scoped**: resolved and cached within this scope
/// - **Transient**: constructed on every resolution; disposal hooks of
///   transients constructed here belong to this scope
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct DatabaseConnection(String);
///
/// struct UserService {
///     db: Arc<DatabaseConnection>,
/// }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_scoped_factory::<DatabaseConnection, _>(|_| {
///     DatabaseConnection("connection-123".to_string())
/// });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService {
///         db: resolver.get_required::<DatabaseConnection>(),
///     }
/// });
///
/// let provider = collection.build();
/// let scope = provider.create_scope();
///
/// let user1 = scope.get_required::<UserService>();
/// let user2 = scope.get_required::<UserService>();
/// assert!(Arc::ptr_eq(&user1.db, &user2.db));
/// ```
pub struct Scope {
    root: ServiceProvider,
    scoped_cells: Box<[OnceCell<AnyArc>]>,
    scoped_disposers: Mutex<DisposeBag>,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        let scoped_count = root.inner().registry.scoped_count;
        let scoped_cells = (0..scoped_count)
            .map(|_| OnceCell::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            root,
            scoped_cells,
            scoped_disposers: Mutex::new(DisposeBag::default()),
        }
    }

    /// The provider this scope was created from.
    pub fn root(&self) -> &ServiceProvider {
        &self.root
    }

    fn resolve_scoped(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        let cell = reg
            .scoped_slot
            .and_then(|slot| self.scoped_cells.get(slot))
            .ok_or(DiError::NotFound(key.display_name()))?;

        let ctx = ResolverContext::new(self);
        cell.get_or_try_init(|| (reg.ctor)(&ctx)).map(Clone::clone)
    }

    /// Runs all disposal hooks registered in this scope: async first, then sync, each LIFO.
    ///
    /// Singletons resolved through the scope are owned by the root provider
    /// and are not disposed here.
    pub async fn dispose_all(&self) {
        let bag = std::mem::take(&mut *self.scoped_disposers.lock());
        bag.run_all().await;
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .root
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        match reg.lifetime {
            Lifetime::Singleton => self.root.resolve_singleton(reg),
            Lifetime::Scoped => self.resolve_scoped(reg, key),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.scoped_disposers.lock().push_sync(f);
    }

    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> BoxFutureUnit + Send>) {
        self.scoped_disposers.lock().push_async(f);
    }
}

impl Resolver for Scope {}

impl Drop for Scope {
    fn drop(&mut self) {
        let bag = self.scoped_disposers.get_mut();
        if !bag.is_empty() {
            warn!(
                pending = bag.len(),
                "Scope dropped with undisposed resources; call dispose_all().await first"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceCollection;
    use std::sync::Arc;

    #[test]
    fn scoped_instances_are_isolated_per_scope() {
        let mut sc = ServiceCollection::new();
        sc.add_scoped_factory::<Vec<u8>, _>(|_| vec![1, 2, 3]);
        let sp = sc.build();

        let s1 = sp.create_scope();
        let s2 = sp.create_scope();

        let a = s1.get_required::<Vec<u8>>();
        let b = s1.get_required::<Vec<u8>>();
        let c = s2.get_required::<Vec<u8>>();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn singletons_are_shared_with_the_root() {
        let mut sc = ServiceCollection::new();
        sc.add_singleton_factory::<String, _>(|_| "shared".to_string());
        let sp = sc.build();

        let scope = sp.create_scope();
        let from_scope = scope.get_required::<String>();
        let from_root = sp.get_required::<String>();

        assert!(Arc::ptr_eq(&from_scope, &from_root));
        assert!(scope.root().contains_key(&Key::of_type::<String>()));
    }
}
