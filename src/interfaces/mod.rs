//! Interface declarations and the interface registrar.
//!
//! Rust has no runtime reflection over implemented traits, so each concrete
//! type declares the trait objects it can be resolved as, usually with the
//! [`interfaces!`](crate::interfaces!) macro. The registrar
//! ([`ServiceCollectionInterfaceExt`]) turns that declaration into alias
//! registrations.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::{DiError, DiResult, Key};
use crate::provider::ResolverContext;
use crate::registration::AnyArc;
use crate::traits::{AsyncDispose, Dispose};

mod implementation;
mod registrar;

pub use implementation::ImplementationType;
pub use registrar::ServiceCollectionInterfaceExt;

/// The set of trait objects a concrete type can be resolved as.
///
/// Implement it with the [`interfaces!`](crate::interfaces!) macro:
///
/// ```
/// use ferrous_di_interfaces::{interfaces, Interfaces, Key, Dispose};
///
/// trait Widget: Send + Sync {}
///
/// struct Button;
/// impl Widget for Button {}
/// impl Dispose for Button {
///     fn dispose(&self) {}
/// }
///
/// interfaces!(Button => [dyn Widget, dyn Dispose]);
///
/// let declared: Vec<Key> = Button::interfaces().keys().collect();
/// assert_eq!(declared, vec![Key::of_trait::<dyn Widget>(), Key::of_trait::<dyn Dispose>()]);
/// ```
pub trait Interfaces: Sized + Send + Sync + 'static {
    /// Every interface the type declares, disposal markers included.
    fn interfaces() -> InterfaceSet<Self>;
}

/// The default construction strategy used by the type-based registrar forms.
///
/// # Examples
///
/// ```
/// use ferrous_di_interfaces::{interfaces, Injectable, ResolverContext, Resolver, DiResult};
/// use std::sync::Arc;
///
/// struct Settings { retries: u32 }
///
/// trait Fetcher: Send + Sync {}
///
/// struct HttpFetcher { settings: Arc<Settings> }
/// impl Fetcher for HttpFetcher {}
///
/// interfaces!(HttpFetcher => [dyn Fetcher]);
///
/// impl Injectable for HttpFetcher {
///     fn create(resolver: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(HttpFetcher { settings: resolver.get::<Settings>()? })
///     }
/// }
/// ```
pub trait Injectable: Interfaces {
    /// Builds a new instance, resolving dependencies through `resolver`.
    fn create(resolver: &ResolverContext<'_>) -> DiResult<Self>;
}

type Upcast = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// One declared interface: its trait key and the upcast from the concrete type.
#[derive(Clone)]
pub struct InterfaceEntry {
    key: Key,
    upcast: Upcast,
}

impl InterfaceEntry {
    /// The `Key::Trait` this interface is registered under.
    pub fn key(&self) -> Key {
        self.key
    }

    /// Converts a stored `Arc<T>` into the stored form of `Arc<dyn Trait>`.
    pub(crate) fn upcast(&self, concrete: AnyArc) -> DiResult<AnyArc> {
        (self.upcast)(concrete)
    }
}

impl fmt::Debug for InterfaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InterfaceEntry").field(&self.key).finish()
    }
}

/// Ordered, duplicate-free list of the interfaces declared for `T`.
pub struct InterfaceSet<T> {
    entries: Vec<InterfaceEntry>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> InterfaceSet<T> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declares `I` as an interface of `T`.
    ///
    /// `cast` is the unsizing coercion `Arc<T> -> Arc<I>`; a closure
    /// `|s: Arc<T>| -> Arc<dyn I> { s }` does it. Declaring the same
    /// interface twice keeps the first declaration.
    pub fn with<I>(mut self, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let key = Key::of_trait::<I>();
        if self.contains_key(&key) {
            return self;
        }

        let upcast = move |concrete: AnyArc| -> DiResult<AnyArc> {
            let concrete = concrete
                .downcast::<T>()
                .map_err(|_| DiError::TypeMismatch(type_name::<T>()))?;
            // Trait objects are stored as Arc<Arc<dyn Trait>> inside Any
            Ok(Arc::new(cast(concrete)))
        };

        self.entries.push(InterfaceEntry {
            key,
            upcast: Arc::new(upcast),
        });
        self
    }

    /// The declared trait keys, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.iter().map(InterfaceEntry::key)
    }

    /// Whether `I` is declared.
    pub fn contains<I: ?Sized + 'static>(&self) -> bool {
        self.contains_key(&Key::of_trait::<I>())
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.iter().any(|entry| entry.key == *key)
    }

    /// Number of declared interfaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<InterfaceEntry> {
        self.entries
    }
}

impl<T: Send + Sync + 'static> Default for InterfaceSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InterfaceSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.key))
            .finish()
    }
}

/// Trait keys that are never registered as interface aliases.
///
/// The default list holds the two disposal markers. Aliasing them would let
/// a resolution through the marker key count as another owner of the
/// instance and dispose it twice.
#[derive(Debug, Clone)]
pub struct InterfaceFilter {
    excluded: Vec<Key>,
}

impl InterfaceFilter {
    /// Adds `key` to the deny-list.
    pub fn exclude(&mut self, key: Key) {
        if !self.excluded.contains(&key) {
            self.excluded.push(key);
        }
    }

    pub fn is_excluded(&self, key: &Key) -> bool {
        self.excluded.contains(key)
    }

    /// The excluded keys, in the order they were added.
    pub fn excluded(&self) -> &[Key] {
        &self.excluded
    }

    /// The entries that survive the filter, in declaration order.
    pub(crate) fn aliasable<'a>(
        &'a self,
        entries: &'a [InterfaceEntry],
    ) -> impl Iterator<Item = &'a InterfaceEntry> + 'a {
        entries.iter().filter(move |entry| !self.is_excluded(&entry.key))
    }
}

impl Default for InterfaceFilter {
    fn default() -> Self {
        Self {
            excluded: vec![Key::of_trait::<dyn Dispose>(), Key::of_trait::<dyn AsyncDispose>()],
        }
    }
}

/// Which disposal hook a freshly constructed instance gets.
#[derive(Clone)]
pub(crate) enum DisposalHook {
    None,
    Sync(InterfaceEntry),
    Async(InterfaceEntry),
}

impl DisposalHook {
    /// Picks the hook from the declared markers. `AsyncDispose` wins when both are declared.
    pub(crate) fn detect(entries: &[InterfaceEntry]) -> Self {
        let find = |key: Key| entries.iter().find(|entry| entry.key == key).cloned();

        if let Some(entry) = find(Key::of_trait::<dyn AsyncDispose>()) {
            DisposalHook::Async(entry)
        } else if let Some(entry) = find(Key::of_trait::<dyn Dispose>()) {
            DisposalHook::Sync(entry)
        } else {
            DisposalHook::None
        }
    }

    /// Registers the hook for `instance` with the resolver that constructed it.
    pub(crate) fn attach(&self, resolver: &ResolverContext<'_>, instance: &AnyArc) -> DiResult<()> {
        use crate::traits::Resolver;

        match self {
            DisposalHook::None => {}
            DisposalHook::Sync(entry) => {
                let service = entry
                    .upcast(instance.clone())?
                    .downcast::<Arc<dyn Dispose>>()
                    .map_err(|_| DiError::TypeMismatch(type_name::<dyn Dispose>()))?;
                resolver.register_disposer((*service).clone());
            }
            DisposalHook::Async(entry) => {
                let service = entry
                    .upcast(instance.clone())?
                    .downcast::<Arc<dyn AsyncDispose>>()
                    .map_err(|_| DiError::TypeMismatch(type_name::<dyn AsyncDispose>()))?;
                resolver.register_async_disposer((*service).clone());
            }
        }
        Ok(())
    }
}

/// Implements [`Interfaces`] for a type from a list of trait objects.
///
/// ```
/// use ferrous_di_interfaces::{interfaces, Interfaces};
///
/// trait Part: Send + Sync {}
/// trait Gadget: Send + Sync {}
///
/// struct Sprocket;
/// impl Part for Sprocket {}
/// impl Gadget for Sprocket {}
///
/// struct Plain;
///
/// interfaces!(Sprocket => [dyn Gadget, dyn Part]);
/// interfaces!(Plain => []);
///
/// assert_eq!(Sprocket::interfaces().len(), 2);
/// assert!(Plain::interfaces().is_empty());
/// ```
#[macro_export]
macro_rules! interfaces {
    ($ty:ty => [$($iface:ty),* $(,)?]) => {
        impl $crate::Interfaces for $ty {
            fn interfaces() -> $crate::InterfaceSet<Self> {
                $crate::InterfaceSet::<$ty>::new()
                    $(.with::<$iface>(|service: ::std::sync::Arc<$ty>| -> ::std::sync::Arc<$iface> { service }))*
            }
        }
    };
}
