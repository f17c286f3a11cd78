//! Service key types for the registry.

use std::any::TypeId;
use std::fmt;

/// Key for service storage and lookup.
///
/// A key is a type identity: either a concrete type or a trait object type.
/// Both carry the `TypeId` used for comparison and hashing plus the
/// `type_name` used in diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_interfaces::Key;
///
/// trait Logger: Send + Sync {}
///
/// let concrete = Key::of_type::<String>();
/// let alias = Key::of_trait::<dyn Logger>();
///
/// assert!(concrete.is_type());
/// assert!(alias.is_trait());
/// assert_ne!(concrete, alias);
/// assert!(alias.display_name().contains("Logger"));
/// ```
#[derive(Clone, Copy)]
pub enum Key {
    /// Concrete type key (structs, enums, primitives).
    Type(TypeId, &'static str),
    /// Trait object key (`dyn Trait`), used for interface aliases.
    Trait(TypeId, &'static str),
}

impl Key {
    /// Key for a concrete type.
    #[inline]
    pub fn of_type<T: 'static>() -> Self {
        Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Key for a trait object type such as `dyn Logger`.
    #[inline]
    pub fn of_trait<T: ?Sized + 'static>() -> Self {
        Key::Trait(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// The type or trait name, as reported by `std::any::type_name`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) | Key::Trait(_, name) => name,
        }
    }

    /// The underlying type identity.
    pub fn type_id(&self) -> TypeId {
        match self {
            Key::Type(id, _) | Key::Trait(id, _) => *id,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Key::Type(..))
    }

    pub fn is_trait(&self) -> bool {
        matches!(self, Key::Trait(..))
    }
}

// Names are diagnostic only; identity is the TypeId plus the variant.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a, _), Key::Trait(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(_, name) => write!(f, "Type({})", name),
            Key::Trait(_, name) => write!(f, "Trait({})", name),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Helper for creating concrete type keys.
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::of_type::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    trait Marker {}

    #[test]
    fn type_and_trait_keys_never_collide() {
        let a = Key::Type(TypeId::of::<u8>(), "u8");
        let b = Key::Trait(TypeId::of::<u8>(), "u8");
        assert_ne!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn names_do_not_affect_equality() {
        let a = Key::Type(TypeId::of::<u32>(), "u32");
        let b = Key::Type(TypeId::of::<u32>(), "renamed");
        assert_eq!(a, b);
    }

    #[test]
    fn trait_key_reports_dyn_name() {
        let key = Key::of_trait::<dyn Marker>();
        assert!(key.display_name().starts_with("dyn "));
        assert_eq!(format!("{:?}", key), format!("Trait({})", key.display_name()));
        assert_eq!(key.type_id(), TypeId::of::<dyn Marker>());
    }
}
