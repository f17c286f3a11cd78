//! Service collection module.
//!
//! The mutable, composition-time side of the registry. Registration methods
//! come in two flavours: `add_*` replaces any existing entry for the key,
//! `try_add_*` is a no-op when the key is already present.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{DiResult, Key, Lifetime, ServiceDescriptor, ServiceProvider};
use crate::descriptors::ResolutionStrategy;
use crate::interfaces::InterfaceFilter;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Registration, Registry};

/// Registry of services under composition.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_interfaces::{ServiceCollection, Resolver};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(8080u16);
/// assert!(!services.try_add_singleton(9090u16));
///
/// let provider = services.build();
/// assert_eq!(*provider.get_required::<u16>(), 8080);
/// ```
pub struct ServiceCollection {
    registry: Registry,
    interface_filter: InterfaceFilter,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            interface_filter: InterfaceFilter::default(),
        }
    }

    // ----- Concrete Type Registrations -----

    /// Registers a pre-built singleton instance.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.add_registration(Key::of_type::<T>(), instance_registration::<T>(Arc::new(value)));
        self
    }

    /// Registers a singleton factory that creates the instance on first request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_di_interfaces::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Database { url: String }
    /// struct UserService { db: Arc<Database> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Database { url: "postgres://localhost".to_string() });
    /// services.add_singleton_factory::<UserService, _>(|resolver| {
    ///     UserService {
    ///         db: resolver.get_required::<Database>()
    ///     }
    /// });
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_registration(Key::of_type::<T>(), factory_registration(Lifetime::Singleton, factory));
        self
    }

    /// Registers a scoped factory that creates one instance per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_registration(Key::of_type::<T>(), factory_registration(Lifetime::Scoped, factory));
        self
    }

    /// Registers a transient factory that creates a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_registration(Key::of_type::<T>(), factory_registration(Lifetime::Transient, factory));
        self
    }

    // ----- Trait Registrations -----

    /// Registers a singleton trait implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ferrous_di_interfaces::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct FixedClock;
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> u64 { 1_700_000_000 }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Clock>(Arc::new(FixedClock));
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_required_trait::<dyn Clock>().now(), 1_700_000_000);
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Trait objects are stored as Arc<Arc<dyn Trait>> inside Any
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.add_registration(
            Key::of_trait::<T>(),
            Registration::new(Lifetime::Singleton, ResolutionStrategy::Instance, Arc::new(ctor)),
        );
        self
    }

    /// Registers a singleton trait factory.
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_registration(Key::of_trait::<Trait>(), trait_registration(Lifetime::Singleton, factory));
        self
    }

    /// Registers a scoped trait factory.
    pub fn add_scoped_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_registration(Key::of_trait::<Trait>(), trait_registration(Lifetime::Scoped, factory));
        self
    }

    /// Registers a transient trait factory.
    pub fn add_transient_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_registration(Key::of_trait::<Trait>(), trait_registration(Lifetime::Transient, factory));
        self
    }

    // ----- Conditional Registration (TryAdd*) -----

    /// Register a singleton if not already registered.
    ///
    /// Returns `true` if the service was registered, `false` if the key was taken.
    pub fn try_add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> bool {
        self.try_add_registration(Key::of_type::<T>(), instance_registration::<T>(Arc::new(value)))
    }

    /// Register a singleton factory if not already registered.
    pub fn try_add_singleton_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.try_add_registration(Key::of_type::<T>(), factory_registration(Lifetime::Singleton, factory))
    }

    /// Register a scoped factory if not already registered.
    pub fn try_add_scoped_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.try_add_registration(Key::of_type::<T>(), factory_registration(Lifetime::Scoped, factory))
    }

    /// Register a transient factory if not already registered.
    pub fn try_add_transient_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.try_add_registration(Key::of_type::<T>(), factory_registration(Lifetime::Transient, factory))
    }

    /// Register a trait factory with the given lifetime if not already registered.
    pub fn try_add_trait_factory<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> bool
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.try_add_registration(Key::of_trait::<Trait>(), trait_registration(lifetime, factory))
    }

    pub(crate) fn add_registration(&mut self, key: Key, registration: Registration) {
        debug!(key = %key, lifetime = %registration.lifetime, strategy = %registration.strategy, "Registered service");
        self.registry.insert(key, registration);
    }

    /// The registry's `TryAdd` primitive: inserts only if `key` is absent.
    pub(crate) fn try_add_registration(&mut self, key: Key, registration: Registration) -> bool {
        let lifetime = registration.lifetime;
        let strategy = registration.strategy;
        let added = self.registry.try_insert(key, registration);
        if added {
            debug!(key = %key, lifetime = %lifetime, strategy = %strategy, "Registered service");
        } else {
            trace!(key = %key, "Key already registered, skipping");
        }
        added
    }

    // ----- Introspection -----

    /// Whether `key` is already registered.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Descriptors for every registered key, in registration order.
    pub fn get_service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: *key,
                lifetime: registration.lifetime,
                strategy: registration.strategy,
                impl_type_name: registration.impl_name,
            })
            .collect()
    }

    // ----- Interface Filter -----

    /// Excludes an additional marker trait from interface aliasing.
    ///
    /// `dyn Dispose` and `dyn AsyncDispose` are always excluded. Use this for
    /// other lifecycle markers that must never become alias keys.
    pub fn exclude_interface<T: ?Sized + 'static>(&mut self) -> &mut Self {
        self.interface_filter.exclude(Key::of_trait::<T>());
        self
    }

    /// The interface exclusion list applied by the interface registrar.
    pub fn interface_filter(&self) -> &InterfaceFilter {
        &self.interface_filter
    }

    /// Freezes the collection into a [`ServiceProvider`].
    pub fn build(mut self) -> ServiceProvider {
        self.registry.finalize();
        debug!(services = self.registry.len(), scoped = self.registry.scoped_count, "Built service provider");
        ServiceProvider::new(self.registry)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

fn instance_registration<T: 'static + Send + Sync>(arc: Arc<T>) -> Registration {
    let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
    Registration::new(Lifetime::Singleton, ResolutionStrategy::Instance, Arc::new(ctor))
        .with_impl_name(std::any::type_name::<T>())
}

fn factory_registration<T, F>(lifetime: Lifetime, factory: F) -> Registration
where
    T: 'static + Send + Sync,
    F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
{
    let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
    Registration::new(lifetime, ResolutionStrategy::Factory, Arc::new(ctor))
        .with_impl_name(std::any::type_name::<T>())
}

fn trait_registration<Trait, F>(lifetime: Lifetime, factory: F) -> Registration
where
    Trait: ?Sized + 'static + Send + Sync,
    F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
{
    // Trait objects are stored as Arc<Arc<dyn Trait>> inside Any
    let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
    Registration::new(lifetime, ResolutionStrategy::Factory, Arc::new(ctor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;

    trait Shape: Send + Sync {
        fn sides(&self) -> u8;
    }

    struct Square;
    impl Shape for Square {
        fn sides(&self) -> u8 {
            4
        }
    }

    #[test]
    fn add_replaces_and_try_add_keeps_first() {
        let mut sc = ServiceCollection::new();
        sc.add_singleton(1u32);
        sc.add_singleton(2u32);
        assert!(!sc.try_add_singleton(3u32));
        assert!(!sc.try_add_transient_factory::<u32, _>(|_| 4));

        let sp = sc.build();
        assert_eq!(*sp.get_required::<u32>(), 2);
    }

    #[test]
    fn trait_factories_resolve_through_trait_keys() {
        let mut sc = ServiceCollection::new();
        assert!(sc.try_add_trait_factory::<dyn Shape, _>(Lifetime::Transient, |_| Arc::new(Square)));
        assert!(!sc.try_add_trait_factory::<dyn Shape, _>(Lifetime::Singleton, |_| Arc::new(Square)));

        let sp = sc.build();
        let a = sp.get_required_trait::<dyn Shape>();
        let b = sp.get_required_trait::<dyn Shape>();
        assert_eq!(a.sides(), 4);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn descriptors_follow_registration_order() {
        let mut sc = ServiceCollection::new();
        sc.add_singleton(1u8);
        sc.add_scoped_factory::<String, _>(|_| String::new());
        sc.add_singleton_trait::<dyn Shape>(Arc::new(Square));

        let descriptors = sc.get_service_descriptors();
        let lifetimes: Vec<Lifetime> = descriptors.iter().map(|d| d.lifetime).collect();
        assert_eq!(lifetimes, vec![Lifetime::Singleton, Lifetime::Scoped, Lifetime::Singleton]);
        assert_eq!(descriptors[0].strategy, ResolutionStrategy::Instance);
        assert_eq!(descriptors[1].strategy, ResolutionStrategy::Factory);
        assert_eq!(descriptors[1].impl_type_name, Some("alloc::string::String"));
        assert!(descriptors.iter().all(|d| !d.is_alias()));
        assert_eq!(sc.len(), 3);
    }

    #[test]
    fn excluded_interfaces_are_recorded() {
        let mut sc = ServiceCollection::new();
        assert!(!sc.interface_filter().is_excluded(&Key::of_trait::<dyn Shape>()));
        sc.exclude_interface::<dyn Shape>();
        assert!(sc.interface_filter().is_excluded(&Key::of_trait::<dyn Shape>()));
    }
}
