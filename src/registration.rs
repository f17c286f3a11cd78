//! Service registration types.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::descriptors::ResolutionStrategy;
use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;

// ResolverContext is defined in provider module
pub(crate) use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased constructor shared between a registration and its copies.
pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) strategy: ResolutionStrategy,
    pub(crate) ctor: Ctor,
    /// Implementation type name for diagnostics
    pub(crate) impl_name: Option<&'static str>,
    /// Singleton cache, only present for `Lifetime::Singleton`
    pub(crate) single_runtime: Option<OnceCell<AnyArc>>,
    /// Scoped slot index, assigned by `Registry::finalize`
    pub(crate) scoped_slot: Option<usize>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, strategy: ResolutionStrategy, ctor: Ctor) -> Self {
        let single_runtime = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };

        Self {
            lifetime,
            strategy,
            ctor,
            impl_name: None,
            single_runtime,
            scoped_slot: None,
        }
    }

    pub(crate) fn with_impl_name(mut self, name: &'static str) -> Self {
        self.impl_name = Some(name);
        self
    }
}

/// Service registry holding all registrations in insertion order.
pub(crate) struct Registry {
    entries: HashMap<Key, Registration>,
    order: Vec<Key>,
    /// Total count of scoped registrations for slot allocation
    pub(crate) scoped_count: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            scoped_count: 0,
        }
    }

    /// Inserts a registration, replacing any existing one for `key`.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        if self.entries.insert(key, registration).is_none() {
            self.order.push(key);
        }
    }

    /// Inserts only if `key` is absent. Returns whether the insert happened.
    pub(crate) fn try_insert(&mut self, key: Key, registration: Registration) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.insert(key, registration);
        true
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.entries.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Iterator over all key-registration pairs, in first-insertion order
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|reg| (key, reg)))
    }

    /// Finalizes registry by assigning scoped slot indices
    pub(crate) fn finalize(&mut self) {
        let mut next_scoped_slot = 0;

        for key in &self.order {
            if let Some(reg) = self.entries.get_mut(key) {
                if reg.lifetime == Lifetime::Scoped {
                    reg.scoped_slot = Some(next_scoped_slot);
                    next_scoped_slot += 1;
                }
            }
        }

        self.scoped_count = next_scoped_slot;
    }
}
