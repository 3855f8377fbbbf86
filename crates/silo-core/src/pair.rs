//! Ordered (source, target) conversion pairs.

use std::any::Any;
use std::fmt;

use crate::TypeKey;

/// An ordered (source type, target type) tuple identifying a conversion
/// capability.
///
/// Equality and hashing consider both sides, so `(String, i64)` and
/// `(i64, String)` are distinct pairs.
///
/// # Examples
///
/// ```
/// use silo_core::{ConvertiblePair, TypeKey};
///
/// let pair = ConvertiblePair::of::<String, i64>();
/// assert_eq!(pair.source(), TypeKey::of::<String>());
/// assert_eq!(pair.target(), TypeKey::of::<i64>());
/// assert_eq!(pair.to_string(), "String -> i64");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConvertiblePair {
    source: TypeKey,
    target: TypeKey,
}

impl ConvertiblePair {
    /// Create a pair from two type keys.
    #[inline]
    pub fn new(source: TypeKey, target: TypeKey) -> Self {
        ConvertiblePair { source, target }
    }

    /// Create the pair for a source and target type.
    #[inline]
    pub fn of<S: Any, T: Any>() -> Self {
        ConvertiblePair {
            source: TypeKey::of::<S>(),
            target: TypeKey::of::<T>(),
        }
    }

    /// The source side of the conversion.
    #[inline]
    pub fn source(&self) -> TypeKey {
        self.source
    }

    /// The target side of the conversion.
    #[inline]
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// The pair with source and target swapped.
    pub fn reversed(&self) -> Self {
        ConvertiblePair {
            source: self.target,
            target: self.source,
        }
    }
}

impl fmt::Display for ConvertiblePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
