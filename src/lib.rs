//! silo - store conversion registration and resolution for data mapping.
//!
//! silo is the conversion layer of a data-store object-mapping stack. A
//! store declares the types it persists natively and its default codecs;
//! users contribute converters for their domain types; and a
//! [`CustomConversions`] registry - built once at bootstrap, read-only and
//! concurrent afterwards - resolves which store type a domain type should
//! be written to or read from, and drains the retained converters into a
//! conversion service.
//!
//! # Quick start
//!
//! ```
//! use silo::prelude::*;
//!
//! // A domain type the store cannot persist natively.
//! struct AccountId(u64);
//!
//! let store = StoreConversions::of(SimpleTypeHolder::base(), []);
//! let conversions = CustomConversions::with_converters(
//!     store,
//!     vec![DirectConverter::new(|id: &AccountId| id.0.to_string())
//!         .writing()
//!         .into()],
//! )
//! .unwrap();
//!
//! assert!(conversions.has_custom_write_target(TypeKey::of::<AccountId>()));
//!
//! let mut service = GenericConversionService::new();
//! conversions.register_converters_in(&mut service);
//! let stored: String = service.convert(&AccountId(7)).unwrap();
//! assert_eq!(stored, "7");
//! ```

pub use silo_core::{
    ConversionError, ConvertFn, Converter, ConverterFlags, ConverterId, ConverterSink,
    ConvertiblePair, DirectConverter, FactoryConverter, FactoryFn, GenericConversionService,
    GenericConverter, GenericFn, RegistrationError, SimpleTypeHolder, TypeKey,
};
pub use silo_conversions::{
    ConverterConfiguration, ConverterOrigin, ConverterRegistration, ConverterRegistrationIntent,
    CustomConversions, RegistrationPredicate, StoreConversions, temporal,
};

/// Everything needed to configure and query conversions.
pub mod prelude {
    pub use silo_core::{
        ConversionError, Converter, ConverterFlags, ConverterSink, ConvertiblePair,
        DirectConverter, FactoryConverter, GenericConversionService, GenericConverter,
        RegistrationError, SimpleTypeHolder, TypeKey,
    };
    pub use silo_conversions::{
        ConverterConfiguration, CustomConversions, StoreConversions, temporal,
    };
}
