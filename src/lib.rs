//! # ferrous-di-interfaces
//!
//! Register a concrete service once and resolve it through every trait it
//! implements, with the lifetime relationship between the two kept intact.
//!
//! ## Features
//!
//! - **Interface aliases**: one call registers `T` and an alias per declared trait
//! - **Identity preserving**: Singleton and Scoped aliases return the very same instance as `T`
//! - **Transient copies**: Transient aliases construct a fresh instance on every resolution
//! - **Idempotent**: every registration is a try-add, repeated calls are harmless
//! - **Disposal aware**: `Dispose`/`AsyncDispose` markers hook teardown, never aliasing
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_di_interfaces::{
//!     interfaces, DiResult, Injectable, Resolver, ResolverContext, ServiceCollection,
//!     ServiceCollectionInterfaceExt,
//! };
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! trait Ticker: Send + Sync {
//!     fn tick(&self) -> u64;
//! }
//!
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 { 42 }
//! }
//!
//! impl Ticker for SystemClock {
//!     fn tick(&self) -> u64 { self.now() + 1 }
//! }
//!
//! interfaces!(SystemClock => [dyn Clock, dyn Ticker]);
//!
//! impl Injectable for SystemClock {
//!     fn create(_: &ResolverContext<'_>) -> DiResult<Self> {
//!         Ok(SystemClock)
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.try_add_singleton_with_interfaces::<SystemClock>();
//!
//! let provider = services.build();
//! let clock = provider.get_required_trait::<dyn Clock>();
//! let ticker = provider.get_required_trait::<dyn Ticker>();
//! let concrete = provider.get_required::<SystemClock>();
//!
//! assert_eq!(clock.now(), 42);
//! assert_eq!(ticker.tick(), 43);
//! assert_eq!(Arc::as_ptr(&clock) as *const (), Arc::as_ptr(&concrete) as *const ());
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once and shared across the entire application
//! - **Scoped**: Created once per scope, aliases resolve inside the scope they are requested from
//! - **Transient**: Created fresh on every resolution, through any key
//!
//! ## Pre-built Instances
//!
//! ```rust
//! use ferrous_di_interfaces::{interfaces, Resolver, ServiceCollection, ServiceCollectionInterfaceExt};
//!
//! trait Logger: Send + Sync {
//!     fn prefix(&self) -> &str;
//! }
//!
//! struct ConsoleLogger { prefix: String }
//! impl Logger for ConsoleLogger {
//!     fn prefix(&self) -> &str { &self.prefix }
//! }
//! interfaces!(ConsoleLogger => [dyn Logger]);
//!
//! let mut services = ServiceCollection::new();
//! services.try_add_singleton_instance_with_interfaces(ConsoleLogger { prefix: "[app]".into() });
//!
//! let provider = services.build();
//! assert_eq!(provider.get_required_trait::<dyn Logger>().prefix(), "[app]");
//! ```

// Module declarations
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod interfaces;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::ServiceCollection;
pub use provider::{ServiceProvider, Scope, ResolverContext};
pub use descriptors::{ServiceDescriptor, ResolutionStrategy};
pub use error::{DiError, DiResult, ParseLifetimeError};
pub use key::{Key, key_of_type};
pub use lifetime::Lifetime;
pub use traits::{Dispose, AsyncDispose, Resolver, ResolverCore};
pub use interfaces::{
    ImplementationType, Injectable, InterfaceEntry, InterfaceFilter, InterfaceSet, Interfaces,
    ServiceCollectionInterfaceExt,
};
