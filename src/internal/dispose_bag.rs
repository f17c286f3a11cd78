//! Internal disposal bag for managing cleanup hooks.

use std::future::Future;
use std::pin::Pin;

/// Future type for disposal operations.
pub(crate) type BoxFutureUnit = Pin<Box<dyn Future<Output = ()> + Send>>;

type SyncHook = Box<dyn FnOnce() + Send>;
type AsyncHook = Box<dyn FnOnce() -> BoxFutureUnit + Send>;

/// Disposal hooks collected while constructing instances, run in LIFO order.
///
/// Async hooks are executed first (in reverse order), followed by sync hooks.
/// Each hook corresponds to exactly one constructed instance; aliases that
/// forward to an existing instance never add hooks.
#[derive(Default)]
pub(crate) struct DisposeBag {
    sync: Vec<SyncHook>,
    asyncs: Vec<AsyncHook>,
}

impl DisposeBag {
    pub(crate) fn push_sync(&mut self, f: SyncHook) {
        self.sync.push(f);
    }

    pub(crate) fn push_async(&mut self, f: AsyncHook) {
        self.asyncs.push(f);
    }

    /// Runs every hook: async ones first, then sync ones, each LIFO.
    pub(crate) async fn run_all(mut self) {
        while let Some(f) = self.asyncs.pop() {
            (f)().await;
        }
        while let Some(f) = self.sync.pop() {
            (f)();
        }
    }

    /// Number of pending hooks.
    pub(crate) fn len(&self) -> usize {
        self.sync.len() + self.asyncs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sync.is_empty() && self.asyncs.is_empty()
    }
}
