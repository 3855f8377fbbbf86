//! Registration metadata for candidate converters.
//!
//! A [`ConverterRegistration`] ties a converter to one of its declared pairs
//! and records how the pair relates to the store's simple types. A
//! [`ConverterRegistrationIntent`] additionally tracks where the candidate
//! came from ([`ConverterOrigin`]), which drives the support filter: user
//! and store converters are always kept, framework defaults only when they
//! touch a store-simple type.

use silo_core::{Converter, ConverterFlags, ConvertiblePair, TypeKey};

/// Where a candidate converter was contributed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterOrigin {
    /// Framework-supplied default.
    Default,
    /// Store-supplied default.
    Store,
    /// User configuration.
    UserDefined,
}

/// A converter bound to one declared pair, classified for registration.
///
/// Whether a registration reads or writes follows a disjoint-default policy:
/// an explicit flag always counts; absent both flags, an unflagged converter
/// reads if its source is store-simple and writes if its target is
/// store-simple. Both can be true.
#[derive(Clone, Debug)]
pub struct ConverterRegistration {
    converter: Converter,
    pair: ConvertiblePair,
    flags: ConverterFlags,
    simple_source: bool,
    simple_target: bool,
}

impl ConverterRegistration {
    pub(crate) fn new(
        converter: Converter,
        pair: ConvertiblePair,
        flags: ConverterFlags,
        simple_source: bool,
        simple_target: bool,
    ) -> Self {
        ConverterRegistration {
            converter,
            pair,
            flags,
            simple_source,
            simple_target,
        }
    }

    /// Whether the converter shall be used for reading.
    pub fn is_reading(&self) -> bool {
        self.flags.contains(ConverterFlags::READING)
            || (!self.flags.contains(ConverterFlags::WRITING) && self.simple_source)
    }

    /// Whether the converter shall be used for writing.
    pub fn is_writing(&self) -> bool {
        self.flags.contains(ConverterFlags::WRITING)
            || (!self.flags.contains(ConverterFlags::READING) && self.simple_target)
    }

    /// Whether the pair's source is a store-simple type.
    pub fn is_simple_source_type(&self) -> bool {
        self.simple_source
    }

    /// Whether the pair's target is a store-simple type.
    pub fn is_simple_target_type(&self) -> bool {
        self.simple_target
    }

    /// The declared pair this registration is for.
    pub fn pair(&self) -> ConvertiblePair {
        self.pair
    }

    /// The converter being registered.
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub(crate) fn into_converter(self) -> Converter {
        self.converter
    }
}

/// A registration together with its origin.
#[derive(Clone)]
pub struct ConverterRegistrationIntent {
    registration: ConverterRegistration,
    origin: ConverterOrigin,
}

impl ConverterRegistrationIntent {
    /// Wrap a user-contributed registration.
    pub fn user(registration: ConverterRegistration) -> Self {
        ConverterRegistrationIntent {
            registration,
            origin: ConverterOrigin::UserDefined,
        }
    }

    /// Wrap a store-default registration.
    pub fn store(registration: ConverterRegistration) -> Self {
        ConverterRegistrationIntent {
            registration,
            origin: ConverterOrigin::Store,
        }
    }

    /// Wrap a framework-default registration.
    pub fn framework_default(registration: ConverterRegistration) -> Self {
        ConverterRegistrationIntent {
            registration,
            origin: ConverterOrigin::Default,
        }
    }

    /// The declared pair's source type.
    pub fn source_type(&self) -> TypeKey {
        self.registration.pair.source()
    }

    /// The declared pair's target type.
    pub fn target_type(&self) -> TypeKey {
        self.registration.pair.target()
    }

    /// See [`ConverterRegistration::is_reading`].
    pub fn is_reading(&self) -> bool {
        self.registration.is_reading()
    }

    /// See [`ConverterRegistration::is_writing`].
    pub fn is_writing(&self) -> bool {
        self.registration.is_writing()
    }

    /// See [`ConverterRegistration::is_simple_source_type`].
    pub fn is_simple_source_type(&self) -> bool {
        self.registration.is_simple_source_type()
    }

    /// See [`ConverterRegistration::is_simple_target_type`].
    pub fn is_simple_target_type(&self) -> bool {
        self.registration.is_simple_target_type()
    }

    /// Whether the candidate came from user configuration.
    pub fn is_user_converter(&self) -> bool {
        self.origin == ConverterOrigin::UserDefined
    }

    /// Whether the candidate is a store default.
    pub fn is_store_converter(&self) -> bool {
        self.origin == ConverterOrigin::Store
    }

    /// Whether the candidate is a framework default.
    pub fn is_default_converter(&self) -> bool {
        self.origin == ConverterOrigin::Default
    }

    /// The candidate's origin.
    pub fn origin(&self) -> ConverterOrigin {
        self.origin
    }

    /// The wrapped registration.
    pub fn registration(&self) -> &ConverterRegistration {
        &self.registration
    }

    pub(crate) fn into_registration(self) -> ConverterRegistration {
        self.registration
    }
}
