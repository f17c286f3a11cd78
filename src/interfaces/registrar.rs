//! Registration of a concrete type together with its interface aliases.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{DiResult, Key, Lifetime, ServiceCollection};
use crate::descriptors::ResolutionStrategy;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Ctor, Registration};
use crate::traits::ResolverCore;
use super::{ImplementationType, InterfaceEntry, Interfaces, Injectable};

/// Registers implementation types under their own key and under every
/// interface they declare.
///
/// Every method is a sequence of try-adds: keys that are already registered
/// are left alone, so calling any of them twice is harmless and a prior
/// registration of the concrete type (from anywhere) is what the aliases
/// attach to.
///
/// Alias resolution depends on the lifetime:
///
/// - **Singleton / Scoped**: the alias redirects to the concrete key and
///   returns the very same instance.
/// - **Transient**: the alias runs the concrete construction rule itself, so
///   every resolution yields a fresh instance.
///
/// Disposal markers (`dyn Dispose`, `dyn AsyncDispose`, plus anything added
/// with [`ServiceCollection::exclude_interface`]) never become alias keys.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{
///     interfaces, DiResult, Injectable, Resolver, ResolverContext, ServiceCollection,
///     ServiceCollectionInterfaceExt,
/// };
/// use std::sync::Arc;
///
/// trait Widget: Send + Sync {}
///
/// struct Slider;
/// impl Widget for Slider {}
/// interfaces!(Slider => [dyn Widget]);
/// impl Injectable for Slider {
///     fn create(_: &ResolverContext<'_>) -> DiResult<Self> { Ok(Slider) }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.try_add_singleton_with_interfaces::<Slider>();
///
/// let provider = services.build();
/// let concrete = provider.get_required::<Slider>();
/// let widget = provider.get_required_trait::<dyn Widget>();
/// assert_eq!(Arc::as_ptr(&concrete) as *const (), Arc::as_ptr(&widget) as *const ());
/// ```
pub trait ServiceCollectionInterfaceExt {
    /// Registers `T` with `lifetime` and aliases each of its interfaces.
    fn try_add_with_interfaces<T: Injectable>(&mut self, lifetime: Lifetime) -> &mut Self;

    /// Registers a pre-built singleton and redirects each of its interfaces to it.
    ///
    /// The container does not dispose instances it did not construct.
    fn try_add_singleton_instance_with_interfaces<T: Interfaces>(&mut self, instance: T) -> &mut Self;

    /// Runtime form of [`try_add_with_interfaces`](Self::try_add_with_interfaces).
    fn try_add_with_interfaces_of(
        &mut self,
        implementation: &ImplementationType,
        lifetime: Lifetime,
    ) -> &mut Self;

    fn try_add_singleton_with_interfaces<T: Injectable>(&mut self) -> &mut Self {
        self.try_add_with_interfaces::<T>(Lifetime::Singleton)
    }

    fn try_add_scoped_with_interfaces<T: Injectable>(&mut self) -> &mut Self {
        self.try_add_with_interfaces::<T>(Lifetime::Scoped)
    }

    fn try_add_transient_with_interfaces<T: Injectable>(&mut self) -> &mut Self {
        self.try_add_with_interfaces::<T>(Lifetime::Transient)
    }

    fn try_add_singleton_with_interfaces_of(&mut self, implementation: &ImplementationType) -> &mut Self {
        self.try_add_with_interfaces_of(implementation, Lifetime::Singleton)
    }

    fn try_add_scoped_with_interfaces_of(&mut self, implementation: &ImplementationType) -> &mut Self {
        self.try_add_with_interfaces_of(implementation, Lifetime::Scoped)
    }

    fn try_add_transient_with_interfaces_of(&mut self, implementation: &ImplementationType) -> &mut Self {
        self.try_add_with_interfaces_of(implementation, Lifetime::Transient)
    }
}

impl ServiceCollectionInterfaceExt for ServiceCollection {
    fn try_add_with_interfaces<T: Injectable>(&mut self, lifetime: Lifetime) -> &mut Self {
        self.try_add_with_interfaces_of(&ImplementationType::of::<T>(), lifetime)
    }

    fn try_add_singleton_instance_with_interfaces<T: Interfaces>(&mut self, instance: T) -> &mut Self {
        let concrete = Key::of_type::<T>();
        let instance: AnyArc = Arc::new(instance);
        let ctor = move |_: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(instance.clone()) };

        self.try_add_registration(
            concrete,
            Registration::new(Lifetime::Singleton, ResolutionStrategy::Instance, Arc::new(ctor))
                .with_impl_name(concrete.display_name()),
        );

        let entries = T::interfaces().into_entries();
        add_aliases(self, concrete, &entries, |entry| redirect(concrete, entry));
        self
    }

    fn try_add_with_interfaces_of(
        &mut self,
        implementation: &ImplementationType,
        lifetime: Lifetime,
    ) -> &mut Self {
        let concrete = implementation.key();
        debug!(service = %concrete, %lifetime, "Registering with interfaces");

        self.try_add_registration(
            concrete,
            Registration::new(lifetime, ResolutionStrategy::Factory, implementation.constructor())
                .with_impl_name(implementation.name()),
        );

        let entries = implementation.entries();
        if lifetime.shares_instance() {
            add_aliases(self, concrete, entries, |entry| redirect(concrete, entry));
        } else {
            let construct = implementation.constructor();
            add_aliases(self, concrete, entries, |entry| copy(concrete, construct.clone(), entry));
        }
        self
    }
}

fn add_aliases<F>(services: &mut ServiceCollection, concrete: Key, entries: &[InterfaceEntry], alias: F)
where
    F: Fn(InterfaceEntry) -> Registration,
{
    let aliasable: Vec<InterfaceEntry> = services
        .interface_filter()
        .aliasable(entries)
        .cloned()
        .collect();

    for entry in aliasable {
        let key = entry.key();
        if !services.try_add_registration(key, alias(entry).with_impl_name(concrete.display_name())) {
            trace!(interface = %key, service = %concrete, "Interface already registered by another service");
        }
    }
}

/// Alias that resolves the concrete key through the current resolver, then upcasts.
///
/// The entry itself is transient: it never caches and never constructs, so
/// the concrete registration alone decides the instance and owns its disposal.
fn redirect(concrete: Key, entry: InterfaceEntry) -> Registration {
    let ctor = move |resolver: &ResolverContext<'_>| -> DiResult<AnyArc> {
        trace!(interface = %entry.key(), service = %concrete, "Following interface alias");
        let instance = resolver.resolve_any(&concrete)?;
        entry.upcast(instance)
    };
    Registration::new(
        Lifetime::Transient,
        ResolutionStrategy::Redirect(concrete),
        Arc::new(ctor),
    )
}

/// Alias that runs the concrete construction rule itself, then upcasts.
fn copy(concrete: Key, construct: Ctor, entry: InterfaceEntry) -> Registration {
    let ctor = move |resolver: &ResolverContext<'_>| -> DiResult<AnyArc> {
        let instance = construct(resolver)?;
        entry.upcast(instance)
    };
    Registration::new(
        Lifetime::Transient,
        ResolutionStrategy::Copy(concrete),
        Arc::new(ctor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interfaces, DiError, Dispose, Resolver};
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Gadget: Send + Sync {
        fn id(&self) -> usize;
    }
    trait Part: Send + Sync {}

    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

    struct Sprocket {
        id: usize,
    }
    impl Gadget for Sprocket {
        fn id(&self) -> usize {
            self.id
        }
    }
    impl Part for Sprocket {}
    impl Dispose for Sprocket {
        fn dispose(&self) {}
    }

    interfaces!(Sprocket => [dyn Gadget, dyn Part, dyn Dispose]);

    impl Injectable for Sprocket {
        fn create(_: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Sprocket { id: NEXT_ID.fetch_add(1, Ordering::SeqCst) })
        }
    }

    #[test]
    fn singleton_aliases_redirect() {
        let mut sc = ServiceCollection::new();
        sc.try_add_singleton_with_interfaces::<Sprocket>();

        let descriptors = sc.get_service_descriptors();
        let keys: Vec<Key> = descriptors.iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![Key::of_type::<Sprocket>(), Key::of_trait::<dyn Gadget>(), Key::of_trait::<dyn Part>()]
        );
        assert_eq!(descriptors[0].strategy, ResolutionStrategy::Factory);
        assert!(descriptors[1..]
            .iter()
            .all(|d| d.strategy == ResolutionStrategy::Redirect(Key::of_type::<Sprocket>())));
    }

    #[test]
    fn transient_aliases_copy() {
        let mut sc = ServiceCollection::new();
        sc.try_add_transient_with_interfaces::<Sprocket>();

        let descriptors = sc.get_service_descriptors();
        assert_eq!(descriptors.len(), 3);
        assert!(descriptors[1..]
            .iter()
            .all(|d| d.strategy == ResolutionStrategy::Copy(Key::of_type::<Sprocket>())
                && d.lifetime == Lifetime::Transient));
    }

    #[test]
    fn transient_resolutions_are_distinct() {
        let mut sc = ServiceCollection::new();
        sc.try_add_transient_with_interfaces::<Sprocket>();
        let sp = sc.build();

        let a = sp.get_required::<Sprocket>();
        let b = sp.get_required_trait::<dyn Gadget>();
        let c = sp.get_required_trait::<dyn Gadget>();
        assert_ne!(a.id, b.id());
        assert_ne!(b.id(), c.id());
    }

    #[test]
    fn redirect_to_a_missing_concrete_key_passes_the_error_through() {
        let mut sc = ServiceCollection::new();
        let entry = Sprocket::interfaces().into_entries().remove(0);
        sc.try_add_registration(entry.key(), redirect(Key::of_type::<Sprocket>(), entry));

        let sp = sc.build();
        match sp.get_trait::<dyn Gadget>() {
            Err(err) => assert_eq!(err, DiError::NotFound(std::any::type_name::<Sprocket>())),
            Ok(_) => panic!("alias resolved without a concrete registration"),
        }
    }
}
