//! Runtime descriptor of a constructible implementation type.

use std::fmt;
use std::sync::Arc;

use crate::{DiResult, Key};
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Ctor};
use super::{DisposalHook, InterfaceEntry, Injectable};

/// A concrete type captured as a value: its key, its constructor and its
/// declared interfaces.
///
/// This is what the non-generic registrar form works on, for start-up code
/// that picks implementations at runtime (from a plugin table, say) rather
/// than naming them as type parameters.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{
///     interfaces, DiResult, ImplementationType, Injectable, Key, Lifetime, Resolver,
///     ResolverContext, ServiceCollection, ServiceCollectionInterfaceExt,
/// };
///
/// trait Storage: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct DiskStorage;
/// impl Storage for DiskStorage {
///     fn name(&self) -> &'static str { "disk" }
/// }
/// interfaces!(DiskStorage => [dyn Storage]);
/// impl Injectable for DiskStorage {
///     fn create(_: &ResolverContext<'_>) -> DiResult<Self> { Ok(DiskStorage) }
/// }
///
/// let chosen = ImplementationType::of::<DiskStorage>();
/// assert_eq!(chosen.key(), Key::of_type::<DiskStorage>());
///
/// let mut services = ServiceCollection::new();
/// services.try_add_with_interfaces_of(&chosen, Lifetime::Singleton);
///
/// let provider = services.build();
/// assert_eq!(provider.get_required_trait::<dyn Storage>().name(), "disk");
/// ```
#[derive(Clone)]
pub struct ImplementationType {
    key: Key,
    construct: Ctor,
    interfaces: Arc<[InterfaceEntry]>,
}

impl ImplementationType {
    /// Captures `T` with its `Injectable` constructor and declared interfaces.
    pub fn of<T: Injectable>() -> Self {
        let interfaces: Arc<[InterfaceEntry]> = T::interfaces().into_entries().into();
        let disposal = DisposalHook::detect(&interfaces);

        let construct = move |resolver: &ResolverContext<'_>| -> DiResult<AnyArc> {
            let instance: AnyArc = Arc::new(T::create(resolver)?);
            disposal.attach(resolver, &instance)?;
            Ok(instance)
        };

        Self {
            key: Key::of_type::<T>(),
            construct: Arc::new(construct),
            interfaces,
        }
    }

    /// The concrete `Key::Type` the implementation registers under.
    pub fn key(&self) -> Key {
        self.key
    }

    /// The implementation's type name.
    pub fn name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Every declared interface key, disposal markers included.
    pub fn interfaces(&self) -> impl Iterator<Item = Key> + '_ {
        self.interfaces.iter().map(InterfaceEntry::key)
    }

    pub(crate) fn entries(&self) -> &[InterfaceEntry] {
        &self.interfaces
    }

    /// The construction rule: `T::create`, then disposal hooks for the new instance.
    pub(crate) fn constructor(&self) -> Ctor {
        self.construct.clone()
    }
}

impl fmt::Debug for ImplementationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationType")
            .field("key", &self.key)
            .field("interfaces", &self.interfaces)
            .finish()
    }
}
