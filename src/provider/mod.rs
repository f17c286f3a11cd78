//! Service provider module.
//!
//! The frozen form of a `ServiceCollection`: resolves registered keys
//! according to their lifetimes and owns the disposal hooks of the
//! singletons and root-level transients it constructs.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::{DiError, DiResult, Key, Lifetime};
use crate::internal::{BoxFutureUnit, DisposeBag};
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::Scope;

/// Service provider for resolving dependencies from the registry.
///
/// Cloning is cheap and every clone shares the same singleton cache.
///
/// Disposal hooks of transients resolved from the root are held until
/// [`dispose_all`](Self::dispose_all); resolve disposable transients from a
/// [`Scope`] so their hooks are released with it.
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
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
    pub(crate) root_disposers: Mutex<DisposeBag>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                root_disposers: Mutex::new(DisposeBag::default()),
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_di_interfaces::{ServiceCollection, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct RequestId(u32);
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_scoped_factory::<RequestId, _>(|_| RequestId(1));
    ///
    /// let provider = collection.build();
    /// let scope1 = provider.create_scope();
    /// let scope2 = provider.create_scope();
    ///
    /// let a = scope1.get_required::<RequestId>();
    /// let b = scope1.get_required::<RequestId>();
    /// let c = scope2.get_required::<RequestId>();
    ///
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert!(!Arc::ptr_eq(&a, &c));
    /// ```
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Whether `key` has a registration.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.inner().registry.contains_key(key)
    }

    /// Runs all root-level disposal hooks: async first, then sync, each LIFO.
    ///
    /// Hooks are taken out of the provider before running, so calling this
    /// twice disposes each instance once.
    pub async fn dispose_all(&self) {
        let bag = std::mem::take(&mut *self.inner().root_disposers.lock());
        bag.run_all().await;
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for (key, reg) in self.inner().registry.iter() {
            s.push_str(&format!("  {:?}: {} ({})\n", key, reg.lifetime, reg.strategy));
        }
        s
    }

    /// Resolves a singleton registration, constructing it against the root on first use.
    pub(crate) fn resolve_singleton(&self, reg: &Registration) -> DiResult<AnyArc> {
        if let Some(cell) = &reg.single_runtime {
            // Only one thread runs the constructor; a failure leaves the cell empty.
            let ctx = ResolverContext::new(self);
            return cell.get_or_try_init(|| (reg.ctor)(&ctx)).map(Clone::clone);
        }

        let ctx = ResolverContext::new(self);
        (reg.ctor)(&ctx)
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let reg = self
            .inner()
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;

        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg),
            Lifetime::Scoped => Err(DiError::WrongLifetime(
                "Cannot resolve scoped service from root provider",
            )),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.inner().root_disposers.lock().push_sync(f);
    }

    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> BoxFutureUnit + Send>) {
        self.inner().root_disposers.lock().push_async(f);
    }
}

impl Resolver for ServiceProvider {}

impl Drop for ServiceProvider {
    fn drop(&mut self) {
        // Only the last handle (scopes hold one too) reports leftovers.
        if Arc::strong_count(&self.inner) == 1 {
            if let Some(bag) = self.inner.root_disposers.try_lock() {
                if !bag.is_empty() {
                    warn!(
                        pending = bag.len(),
                        "ServiceProvider dropped with undisposed resources; call dispose_all().await first"
                    );
                }
            }
        }
    }
}
