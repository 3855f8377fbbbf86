//! Store conversion registration and resolution.
//!
//! A data store declares its natively-persistable types and default codecs
//! as [`StoreConversions`]; users contribute their own converters through a
//! [`ConverterConfiguration`]. [`CustomConversions`] registers everything
//! once at bootstrap and then answers, concurrently and memoized, which
//! store type a domain type converts to or from.
//!
//! # Example
//!
//! ```
//! use silo_core::{DirectConverter, SimpleTypeHolder, TypeKey};
//! use silo_conversions::{CustomConversions, StoreConversions};
//!
//! let store = StoreConversions::of(SimpleTypeHolder::base(), []);
//! let conversions = CustomConversions::with_converters(
//!     store,
//!     vec![DirectConverter::new(|p: &std::path::PathBuf| {
//!         p.display().to_string()
//!     })
//!     .writing()
//!     .into()],
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     conversions.custom_write_target(TypeKey::of::<std::path::PathBuf>()),
//!     Some(TypeKey::of::<String>())
//! );
//! ```

mod cache;
mod config;
mod conversions;
mod registration;
mod store;
pub mod temporal;

pub use config::{ConverterConfiguration, RegistrationPredicate};
pub use conversions::CustomConversions;
pub use registration::{ConverterOrigin, ConverterRegistration, ConverterRegistrationIntent};
pub use store::StoreConversions;
