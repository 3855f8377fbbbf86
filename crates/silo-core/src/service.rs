//! Conversion service: executing registered converters.
//!
//! [`ConverterSink`] is the seam between a converter registry and whatever
//! executes conversions; [`GenericConversionService`] is the in-memory
//! implementation. A registry pushes its retained converters into a sink
//! once, at bootstrap; the service then serves typed conversions.
//!
//! When several converters are sunk for the same pair, the first insertion
//! wins. Registries feed the sink in precedence order, so "first in" is
//! "highest precedence".

use std::any::Any;

use rustc_hash::FxHashMap;

use crate::{
    ConversionError, ConvertFn, ConvertiblePair, DirectConverter, FactoryConverter,
    GenericConverter, TypeKey,
};

/// Receiver of converters drained from a registry.
pub trait ConverterSink {
    /// Accept a single-pair converter.
    fn add_converter(&mut self, converter: DirectConverter);

    /// Accept a converter factory.
    fn add_converter_factory(&mut self, factory: FactoryConverter);

    /// Accept a multi-pair converter.
    fn add_generic_converter(&mut self, converter: GenericConverter);
}

/// In-memory conversion service over sunk converters.
///
/// Conversion first consults the direct pair map, then the factories in
/// insertion order.
///
/// # Examples
///
/// ```
/// use silo_core::{ConverterSink, DirectConverter, GenericConversionService};
///
/// let mut service = GenericConversionService::new();
/// service.add_converter(DirectConverter::new(|n: &u32| n.to_string()));
///
/// let text: String = service.convert(&42u32).unwrap();
/// assert_eq!(text, "42");
/// ```
#[derive(Default)]
pub struct GenericConversionService {
    converters: FxHashMap<ConvertiblePair, ConvertFn>,
    factories: Vec<FactoryConverter>,
}

impl GenericConversionService {
    /// Create an empty service.
    pub fn new() -> Self {
        GenericConversionService::default()
    }

    /// Whether a conversion for (source, target) is available.
    pub fn can_convert(&self, source: TypeKey, target: TypeKey) -> bool {
        self.lookup(ConvertiblePair::new(source, target)).is_some()
    }

    /// Convert a value to the target type.
    ///
    /// Fails with [`ConversionError::NoConverterFound`] when no converter
    /// serves the pair, or with the converter's own error.
    pub fn convert<S: Any, T: Any>(&self, value: &S) -> Result<T, ConversionError> {
        let pair = ConvertiblePair::of::<S, T>();
        let convert = self
            .lookup(pair)
            .ok_or(ConversionError::NoConverterFound {
                source: std::any::type_name::<S>(),
                target: std::any::type_name::<T>(),
            })?;
        let produced = convert(value)?;
        produced
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| ConversionError::TypeMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    /// Number of distinct direct pairs.
    pub fn pair_count(&self) -> usize {
        self.converters.len()
    }

    fn lookup(&self, pair: ConvertiblePair) -> Option<ConvertFn> {
        if let Some(convert) = self.converters.get(&pair) {
            return Some(convert.clone());
        }
        self.factories
            .iter()
            .filter(|factory| factory.pair().source() == pair.source())
            .find_map(|factory| factory.converter_for(pair.target()))
    }
}

impl ConverterSink for GenericConversionService {
    fn add_converter(&mut self, converter: DirectConverter) {
        self.converters
            .entry(converter.pair())
            .or_insert_with(|| converter.convert_fn());
    }

    fn add_converter_factory(&mut self, factory: FactoryConverter) {
        self.factories.push(factory);
    }

    fn add_generic_converter(&mut self, converter: GenericConverter) {
        for &pair in converter.pairs() {
            self.converters
                .entry(pair)
                .or_insert_with(|| converter.convert_fn_for(pair));
        }
    }
}
