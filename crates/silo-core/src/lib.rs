//! Core types for store conversion registration.
//!
//! This crate provides the building blocks a conversion registry is
//! assembled from:
//!
//! - [`TypeKey`] - runtime type identity
//! - [`ConvertiblePair`] - an ordered (source, target) conversion capability
//! - [`Converter`] and its kinds - declared, type-erased converters
//! - [`SimpleTypeHolder`] - the types a store persists natively
//! - [`ConverterSink`] / [`GenericConversionService`] - converter execution
//! - [`RegistrationError`] / [`ConversionError`] - the two failure phases

mod converter;
mod error;
mod pair;
mod service;
mod simple_type;
mod type_key;

pub use converter::{
    ConvertFn, Converter, ConverterFlags, ConverterId, DirectConverter, FactoryConverter,
    FactoryFn, GenericConverter, GenericFn,
};
pub use error::{ConversionError, RegistrationError};
pub use pair::ConvertiblePair;
pub use service::{ConverterSink, GenericConversionService};
pub use simple_type::SimpleTypeHolder;
pub use type_key::TypeKey;
