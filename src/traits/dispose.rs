//! Disposal traits for resource cleanup.
//!
//! These are the two disposal markers. A type may list them in its
//! `interfaces!` declaration so the container hooks its teardown when it
//! constructs the type, but they are never registered as alias keys: doing
//! so would let an alias resolution count as a second owner of the instance.

/// Trait for synchronous resource disposal.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{interfaces, Dispose};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// trait Cache: Send + Sync {}
///
/// #[derive(Default)]
/// struct MemoryCache { flushed: AtomicBool }
///
/// impl Cache for MemoryCache {}
///
/// impl Dispose for MemoryCache {
///     fn dispose(&self) {
///         self.flushed.store(true, Ordering::SeqCst);
///     }
/// }
///
/// // `dyn Dispose` is a lifecycle marker, `dyn Cache` becomes an alias.
/// interfaces!(MemoryCache => [dyn Cache, dyn Dispose]);
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}

/// Trait for asynchronous resource disposal.
///
/// When a type declares both markers only this one is invoked.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{interfaces, AsyncDispose};
/// use async_trait::async_trait;
///
/// trait Client: Send + Sync {}
///
/// struct DatabaseClient;
/// impl Client for DatabaseClient {}
///
/// #[async_trait]
/// impl AsyncDispose for DatabaseClient {
///     async fn dispose(&self) {
///         // close the connection pool
///     }
/// }
///
/// interfaces!(DatabaseClient => [dyn Client, dyn AsyncDispose]);
/// ```
#[async_trait::async_trait]
pub trait AsyncDispose: Send + Sync + 'static {
    /// Perform asynchronous cleanup of resources.
    async fn dispose(&self);
}
