//! Runtime type identity for converter registration.
//!
//! This module provides [`TypeKey`], the descriptor under which a Rust type
//! participates in conversion registration and lookup. A key pairs the type's
//! [`TypeId`] with its name, enabling:
//!
//! - Exact, collision-free identity (`TypeId` is unique per type)
//! - Readable diagnostics (the name travels with the key)
//! - Cheap `Copy` keys for registry maps and caches
//!
//! Identity, equality, and hashing use the `TypeId` only. The name is
//! informational - `std::any::type_name` output is not guaranteed stable
//! across compiler versions and must never be used as a key.
//!
//! # Examples
//!
//! ```
//! use silo_core::TypeKey;
//!
//! let string_key = TypeKey::of::<String>();
//! let same_key = TypeKey::of::<String>();
//! assert_eq!(string_key, same_key);
//!
//! let int_key = TypeKey::of::<i64>();
//! assert_ne!(string_key, int_key);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Descriptor identifying a Rust type in converter registrations.
///
/// Obtained via [`TypeKey::of`]. Two keys are equal exactly when they denote
/// the same Rust type.
#[derive(Clone, Copy, Debug, Eq)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Create the key for a type.
    ///
    /// # Examples
    ///
    /// ```
    /// use silo_core::TypeKey;
    ///
    /// let key = TypeKey::of::<Vec<u8>>();
    /// assert!(key.name().contains("Vec<u8>"));
    /// ```
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, e.g. `alloc::string::String`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The unqualified type name, e.g. `String`.
    ///
    /// Generic arguments keep their own qualification; this only strips the
    /// leading path of the outer type.
    pub fn simple_name(&self) -> &'static str {
        let head = self.name.split('<').next().unwrap_or(self.name);
        match head.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }

    /// Whether this key denotes the type `T`.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}
