//! Converter kinds and their declared conversion capabilities.
//!
//! This module provides [`Converter`], a closed enum over the converter
//! kinds a registry accepts:
//!
//! - [`DirectConverter`] - one declared pair, one conversion function
//! - [`FactoryConverter`] - a (source, target range) pair plus a function
//!   producing a conversion function for a concrete requested target
//! - [`GenericConverter`] - an explicit set of declared pairs with one
//!   pair-dispatching conversion function
//! - `Composite` - a list of child converters, recursed into during
//!   registration
//!
//! Every converter declares its source and target types at construction via
//! [`TypeKey`]s captured by the typed constructors. There is no runtime
//! signature introspection: what a converter can do is exactly what it
//! declares. Dispatch over kinds is a `match`, so adding a kind is a
//! compile-time-visible change at every dispatch site.
//!
//! Conversion functions are fallible, type-erased, and shared through
//! [`Arc`], making converters cheap to clone. Clones share identity (see
//! [`Converter::identity`]), which is what registration deduplicates on.
//!
//! # Examples
//!
//! ```
//! use silo_core::{Converter, DirectConverter};
//!
//! let to_digits: Converter = DirectConverter::new(|n: &u32| n.to_string())
//!     .writing()
//!     .into();
//! let boxed = to_digits.as_direct().unwrap().invoke(&42u32).unwrap();
//! assert_eq!(*boxed.downcast::<String>().unwrap(), "42");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::{ConversionError, ConvertiblePair, TypeKey};

bitflags! {
    /// Explicit reading/writing markers carried by a converter.
    ///
    /// A reading converter converts from the store-native representation to
    /// a domain type; a writing converter converts from a domain type to the
    /// store-native representation. A converter carrying neither marker is
    /// classified during registration from the store's simple types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConverterFlags: u8 {
        /// Converts store-native values into domain values.
        const READING = 1 << 0;
        /// Converts domain values into store-native values.
        const WRITING = 1 << 1;
    }
}

/// Type-erased fallible conversion function.
pub type ConvertFn = Arc<dyn Fn(&dyn Any) -> Result<Box<dyn Any>, ConversionError> + Send + Sync>;

/// Function producing a conversion function for a concrete target type, or
/// `None` when the factory cannot serve that target.
pub type FactoryFn = Arc<dyn Fn(TypeKey) -> Option<ConvertFn> + Send + Sync>;

/// Pair-dispatching conversion function of a [`GenericConverter`].
pub type GenericFn =
    Arc<dyn Fn(&dyn Any, &ConvertiblePair) -> Result<Box<dyn Any>, ConversionError> + Send + Sync>;

/// Opaque identity of a converter, shared by its clones.
///
/// Derived from the address of the converter's underlying shared function,
/// so two independently-constructed converters are never identical while a
/// converter and its clones always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConverterId(usize);

// ============================================================================
// Direct converters
// ============================================================================

/// A converter for exactly one declared (source, target) pair.
#[derive(Clone)]
pub struct DirectConverter {
    pair: ConvertiblePair,
    flags: ConverterFlags,
    convert: ConvertFn,
}

impl DirectConverter {
    /// Create a converter from an infallible function.
    pub fn new<S, T, F>(convert: F) -> Self
    where
        S: Any,
        T: Any,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self::try_new(move |source: &S| Ok(convert(source)))
    }

    /// Create a converter from a fallible function.
    pub fn try_new<S, T, F>(convert: F) -> Self
    where
        S: Any,
        T: Any,
        F: Fn(&S) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        let erased: ConvertFn = Arc::new(move |value: &dyn Any| {
            let source = value
                .downcast_ref::<S>()
                .ok_or(ConversionError::TypeMismatch {
                    expected: std::any::type_name::<S>(),
                })?;
            convert(source).map(|target| Box::new(target) as Box<dyn Any>)
        });
        DirectConverter {
            pair: ConvertiblePair::of::<S, T>(),
            flags: ConverterFlags::empty(),
            convert: erased,
        }
    }

    /// Mark this converter as reading (store -> domain).
    pub fn reading(mut self) -> Self {
        self.flags |= ConverterFlags::READING;
        self
    }

    /// Mark this converter as writing (domain -> store).
    pub fn writing(mut self) -> Self {
        self.flags |= ConverterFlags::WRITING;
        self
    }

    /// The declared conversion pair.
    pub fn pair(&self) -> ConvertiblePair {
        self.pair
    }

    /// The explicit reading/writing markers.
    pub fn flags(&self) -> ConverterFlags {
        self.flags
    }

    /// The shared type-erased conversion function.
    pub fn convert_fn(&self) -> ConvertFn {
        Arc::clone(&self.convert)
    }

    /// Run the conversion on a type-erased value.
    pub fn invoke(&self, value: &dyn Any) -> Result<Box<dyn Any>, ConversionError> {
        (self.convert)(value)
    }
}

// ============================================================================
// Converter factories
// ============================================================================

/// A converter family: one declared source type and a range of targets,
/// with a function producing the concrete conversion on demand.
///
/// The declared pair's target is the *range* - the type standing for the
/// family of producible targets. The factory decides per requested target
/// whether it can serve it.
#[derive(Clone)]
pub struct FactoryConverter {
    pair: ConvertiblePair,
    flags: ConverterFlags,
    make: FactoryFn,
}

impl FactoryConverter {
    /// Create a factory converting from `S` into targets of the `R` range.
    pub fn new<S, R, F>(make: F) -> Self
    where
        S: Any,
        R: Any,
        F: Fn(TypeKey) -> Option<ConvertFn> + Send + Sync + 'static,
    {
        FactoryConverter {
            pair: ConvertiblePair::of::<S, R>(),
            flags: ConverterFlags::empty(),
            make: Arc::new(make),
        }
    }

    /// Mark this factory as reading (store -> domain).
    pub fn reading(mut self) -> Self {
        self.flags |= ConverterFlags::READING;
        self
    }

    /// Mark this factory as writing (domain -> store).
    pub fn writing(mut self) -> Self {
        self.flags |= ConverterFlags::WRITING;
        self
    }

    /// The declared (source, target range) pair.
    pub fn pair(&self) -> ConvertiblePair {
        self.pair
    }

    /// The explicit reading/writing markers.
    pub fn flags(&self) -> ConverterFlags {
        self.flags
    }

    /// Produce the conversion function for a concrete target, if served.
    pub fn converter_for(&self, target: TypeKey) -> Option<ConvertFn> {
        (self.make)(target)
    }
}

// ============================================================================
// Generic converters
// ============================================================================

/// A converter declaring several pairs, dispatching on the pair at call time.
///
/// Declaring zero pairs is accepted at construction but rejected when the
/// converter is registered - there is nothing to register it under.
#[derive(Clone)]
pub struct GenericConverter {
    pairs: Arc<[ConvertiblePair]>,
    flags: ConverterFlags,
    convert: GenericFn,
}

impl GenericConverter {
    /// Create a generic converter over the given declared pairs.
    pub fn new<F>(pairs: impl IntoIterator<Item = ConvertiblePair>, convert: F) -> Self
    where
        F: Fn(&dyn Any, &ConvertiblePair) -> Result<Box<dyn Any>, ConversionError>
            + Send
            + Sync
            + 'static,
    {
        GenericConverter {
            pairs: pairs.into_iter().collect(),
            flags: ConverterFlags::empty(),
            convert: Arc::new(convert),
        }
    }

    /// Mark this converter as reading (store -> domain).
    pub fn reading(mut self) -> Self {
        self.flags |= ConverterFlags::READING;
        self
    }

    /// Mark this converter as writing (domain -> store).
    pub fn writing(mut self) -> Self {
        self.flags |= ConverterFlags::WRITING;
        self
    }

    /// The declared pairs.
    pub fn pairs(&self) -> &[ConvertiblePair] {
        &self.pairs
    }

    /// The explicit reading/writing markers.
    pub fn flags(&self) -> ConverterFlags {
        self.flags
    }

    /// The conversion function bound to one of the declared pairs.
    ///
    /// The returned function always invokes the generic converter with the
    /// given pair, regardless of whether the pair was declared.
    pub fn convert_fn_for(&self, pair: ConvertiblePair) -> ConvertFn {
        let convert = Arc::clone(&self.convert);
        Arc::new(move |value: &dyn Any| convert(value, &pair))
    }

    /// Run the conversion on a type-erased value for a specific pair.
    pub fn invoke(
        &self,
        value: &dyn Any,
        pair: &ConvertiblePair,
    ) -> Result<Box<dyn Any>, ConversionError> {
        (self.convert)(value, pair)
    }
}

// ============================================================================
// Unified converter
// ============================================================================

/// Unified converter value for registration and dispatch.
#[derive(Clone)]
pub enum Converter {
    /// A single-pair converter.
    Direct(DirectConverter),
    /// A converter family produced per target.
    Factory(FactoryConverter),
    /// A multi-pair converter.
    Generic(GenericConverter),
    /// A group of child converters registered individually.
    Composite(Arc<[Converter]>),
}

impl Converter {
    /// Group several converters into a composite.
    pub fn composite(children: impl IntoIterator<Item = Converter>) -> Self {
        Converter::Composite(children.into_iter().collect())
    }

    /// The identity shared by this converter and its clones.
    pub fn identity(&self) -> ConverterId {
        let addr = match self {
            Converter::Direct(c) => Arc::as_ptr(&c.convert) as *const () as usize,
            Converter::Factory(c) => Arc::as_ptr(&c.make) as *const () as usize,
            Converter::Generic(c) => Arc::as_ptr(&c.convert) as *const () as usize,
            Converter::Composite(children) => children.as_ptr() as usize,
        };
        ConverterId(addr)
    }

    /// The explicit reading/writing markers. Composites carry none; their
    /// children declare their own.
    pub fn flags(&self) -> ConverterFlags {
        match self {
            Converter::Direct(c) => c.flags,
            Converter::Factory(c) => c.flags,
            Converter::Generic(c) => c.flags,
            Converter::Composite(_) => ConverterFlags::empty(),
        }
    }

    /// Borrow the direct converter, if this is one.
    pub fn as_direct(&self) -> Option<&DirectConverter> {
        match self {
            Converter::Direct(c) => Some(c),
            _ => None,
        }
    }

    /// Human-readable description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Converter::Direct(c) => format!("direct converter {}", c.pair),
            Converter::Factory(c) => format!("converter factory {}", c.pair),
            Converter::Generic(c) => match c.pairs.as_ref() {
                [] => "generic converter (no pairs)".to_string(),
                [only] => format!("generic converter {only}"),
                [first, rest @ ..] => {
                    format!("generic converter {} (+{} pairs)", first, rest.len())
                }
            },
            Converter::Composite(children) => {
                format!("composite converter ({} children)", children.len())
            }
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<DirectConverter> for Converter {
    fn from(converter: DirectConverter) -> Self {
        Converter::Direct(converter)
    }
}

impl From<FactoryConverter> for Converter {
    fn from(factory: FactoryConverter) -> Self {
        Converter::Factory(factory)
    }
}

impl From<GenericConverter> for Converter {
    fn from(converter: GenericConverter) -> Self {
        Converter::Generic(converter)
    }
}
