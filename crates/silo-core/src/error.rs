//! Error types for converter registration and execution.
//!
//! Two phases, two error types:
//!
//! - [`RegistrationError`] - construction-time failures while a registry is
//!   assembled. Fatal and surfaced to the caller immediately.
//! - [`ConversionError`] - runtime failures while converting a value through
//!   a conversion service.
//!
//! Advisory conditions during registration (a converter whose types are not
//! store-simple) are logged, not returned as errors.

use std::any::Any;

use thiserror::Error;

/// Errors raised while registering converters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A generic converter declared no convertible pairs, so there is
    /// nothing to register it under.
    #[error("converter {converter} declares no convertible pairs")]
    NoConvertiblePairs {
        /// Description of the offending converter.
        converter: String,
    },
}

/// Errors raised while converting a value.
///
/// `Display`/`Error` are implemented by hand rather than via `thiserror`'s
/// derive: `thiserror` unconditionally treats a field named `source` as the
/// error's `std::error::Error` source, but here `source`/`target` are plain
/// type-name strings, not nested errors. The manual impls below reproduce the
/// same messages a `#[error("…")]` attribute would and report no nested source.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// No converter is registered for the requested (source, target) pair.
    NoConverterFound {
        /// The source type name.
        source: &'static str,
        /// The target type name.
        target: &'static str,
    },

    /// A value of an unexpected type reached a converter, or a converter
    /// produced a value of an unexpected type.
    TypeMismatch {
        /// The expected type name.
        expected: &'static str,
    },

    /// The converter itself failed, e.g. unparsable input.
    Failed {
        /// The source type name.
        source: &'static str,
        /// The target type name.
        target: &'static str,
        /// What went wrong.
        message: String,
    },
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::NoConverterFound { source, target } => {
                write!(f, "no converter found for {source} -> {target}")
            }
            ConversionError::TypeMismatch { expected } => {
                write!(f, "type mismatch: expected a value of type {expected}")
            }
            ConversionError::Failed {
                source,
                target,
                message,
            } => write!(f, "conversion from {source} to {target} failed: {message}"),
        }
    }
}

impl std::error::Error for ConversionError {}

impl ConversionError {
    /// Shorthand for [`ConversionError::Failed`] with the pair's type names.
    pub fn failed<S: Any, T: Any>(message: impl Into<String>) -> Self {
        ConversionError::Failed {
            source: std::any::type_name::<S>(),
            target: std::any::type_name::<T>(),
            message: message.into(),
        }
    }
}
