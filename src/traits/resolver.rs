//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::internal::BoxFutureUnit;
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::{AsyncDispose, Dispose};

/// Core resolver trait for object-safe service resolution.
///
/// This is the `Resolve(key)` capability the interface registrar relies on:
/// redirect aliases capture the concrete [`Key`] and call
/// [`resolve_any`](Self::resolve_any) on whichever resolver is current.
///
/// Most users should use the [`Resolver`] trait instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// Concrete types are stored as `Arc<T>`; trait aliases are stored as
    /// `Arc<Arc<dyn Trait>>`, both behind `Arc<dyn Any>`.
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;

    /// Registers a synchronous disposal hook with this resolver.
    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>);

    /// Registers an asynchronous disposal hook with this resolver.
    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> BoxFutureUnit + Send>);
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Both `ServiceProvider` and `Scope` implement this trait, as does the
/// `ResolverContext` handed to factories.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
/// collection.add_singleton_trait(Arc::new(ConsoleLogger) as Arc<dyn Logger>);
///
/// let provider = collection.build();
///
/// let number = provider.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// let logger = provider.get_required_trait::<dyn Logger>();
/// logger.log("Service resolved successfully");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&Key::of_type::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait object, e.g. an interface alias.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_any(&Key::of_trait::<T>())?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves a trait object, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T> {
        self.get_trait::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve trait {}: {}", std::any::type_name::<T>(), e))
    }

    /// Registers a service for synchronous disposal with this resolver.
    ///
    /// Hooks run LIFO when the owning provider or scope is disposed.
    fn register_disposer<T: ?Sized + Dispose>(&self, service: Arc<T>) {
        self.push_sync_disposer(Box::new(move || service.dispose()));
    }

    /// Registers a service for asynchronous disposal with this resolver.
    ///
    /// Async hooks run before sync hooks, LIFO.
    fn register_async_disposer<T: ?Sized + AsyncDispose>(&self, service: Arc<T>) {
        self.push_async_disposer(Box::new(move || -> BoxFutureUnit {
            Box::pin(async move { service.dispose().await })
        }));
    }
}
