//! Core traits for resolution and disposal.

mod dispose;
mod resolver;

pub use dispose::{Dispose, AsyncDispose};
pub use resolver::{Resolver, ResolverCore};
