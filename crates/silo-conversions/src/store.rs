//! Store-specific conversion extensions.

use silo_core::{Converter, ConvertiblePair, RegistrationError, SimpleTypeHolder, TypeKey};

use crate::registration::ConverterRegistration;

/// A data store's contribution to conversion registration: the types it
/// persists natively plus its default converters.
///
/// # Examples
///
/// ```
/// use silo_core::{DirectConverter, SimpleTypeHolder};
/// use silo_conversions::StoreConversions;
///
/// let store = StoreConversions::of(
///     SimpleTypeHolder::base(),
///     [DirectConverter::new(|v: &Vec<u8>| String::from_utf8_lossy(v).into_owned())
///         .reading()
///         .into()],
/// );
/// assert_eq!(store.store_converters().len(), 1);
/// ```
#[derive(Clone)]
pub struct StoreConversions {
    simple_types: SimpleTypeHolder,
    store_converters: Vec<Converter>,
}

impl StoreConversions {
    /// Store conversions declaring no simple types and no converters.
    pub fn none() -> Self {
        StoreConversions {
            simple_types: SimpleTypeHolder::empty(),
            store_converters: Vec::new(),
        }
    }

    /// Store conversions over the given simple types and default converters.
    pub fn of(
        simple_types: SimpleTypeHolder,
        converters: impl IntoIterator<Item = Converter>,
    ) -> Self {
        StoreConversions {
            simple_types,
            store_converters: converters.into_iter().collect(),
        }
    }

    /// The store's simple types.
    pub fn simple_types(&self) -> &SimpleTypeHolder {
        &self.simple_types
    }

    /// The store's default converters.
    pub fn store_converters(&self) -> &[Converter] {
        &self.store_converters
    }

    /// Whether the store persists the given type natively.
    pub fn is_store_simple(&self, key: TypeKey) -> bool {
        self.simple_types.is_simple(key)
    }

    /// Expand a converter into one registration per declared pair.
    ///
    /// Composites are recursed into, registering each child under its own
    /// declared pairs and flags. A generic converter declaring no pairs is
    /// rejected: there is nothing to register it under.
    pub fn registrations_for(
        &self,
        converter: &Converter,
    ) -> Result<Vec<ConverterRegistration>, RegistrationError> {
        match converter {
            Converter::Composite(children) => {
                let mut registrations = Vec::new();
                for child in children.iter() {
                    registrations.extend(self.registrations_for(child)?);
                }
                Ok(registrations)
            }
            Converter::Generic(generic) => {
                if generic.pairs().is_empty() {
                    return Err(RegistrationError::NoConvertiblePairs {
                        converter: converter.describe(),
                    });
                }
                Ok(generic
                    .pairs()
                    .iter()
                    .map(|&pair| self.registration(converter.clone(), pair))
                    .collect())
            }
            Converter::Factory(factory) => {
                Ok(vec![self.registration(converter.clone(), factory.pair())])
            }
            Converter::Direct(direct) => {
                Ok(vec![self.registration(converter.clone(), direct.pair())])
            }
        }
    }

    fn registration(&self, converter: Converter, pair: ConvertiblePair) -> ConverterRegistration {
        let flags = converter.flags();
        ConverterRegistration::new(
            converter,
            pair,
            flags,
            self.is_store_simple(pair.source()),
            self.is_store_simple(pair.target()),
        )
    }
}

#[cfg(test)]
mod tests {
    use silo_core::{ConversionError, DirectConverter, GenericConverter};

    use super::*;

    #[test]
    fn none_has_no_simple_types() {
        let store = StoreConversions::none();
        assert!(store.simple_types().is_empty());
        assert!(store.store_converters().is_empty());
        assert!(!store.is_store_simple(TypeKey::of::<String>()));
    }

    #[test]
    fn direct_converter_yields_one_registration() {
        let store = StoreConversions::of(SimpleTypeHolder::base(), []);
        let converter: Converter = DirectConverter::new(|s: &String| s.len() as i64).into();

        let registrations = store.registrations_for(&converter).unwrap();
        assert_eq!(registrations.len(), 1);

        let registration = &registrations[0];
        assert_eq!(registration.pair(), ConvertiblePair::of::<String, i64>());
        assert!(registration.is_simple_source_type());
        assert!(registration.is_simple_target_type());
    }

    #[test]
    fn generic_converter_yields_one_registration_per_pair() {
        let store = StoreConversions::of(SimpleTypeHolder::base(), []);
        let pairs = [
            ConvertiblePair::of::<u32, String>(),
            ConvertiblePair::of::<bool, String>(),
        ];
        let converter: Converter = GenericConverter::new(pairs, |value, pair| {
            let _ = (value, pair);
            Err(ConversionError::TypeMismatch { expected: "n/a" })
        })
        .into();

        let registrations = store.registrations_for(&converter).unwrap();
        assert_eq!(registrations.len(), 2);
        assert_eq!(registrations[0].pair(), pairs[0]);
        assert_eq!(registrations[1].pair(), pairs[1]);
    }

    #[test]
    fn generic_converter_without_pairs_is_rejected() {
        let store = StoreConversions::none();
        let converter: Converter = GenericConverter::new([], |_, _| {
            Err(ConversionError::TypeMismatch { expected: "n/a" })
        })
        .into();

        let err = store.registrations_for(&converter).unwrap_err();
        assert!(matches!(err, RegistrationError::NoConvertiblePairs { .. }));
    }

    #[test]
    fn composite_recurses_into_children() {
        let store = StoreConversions::of(SimpleTypeHolder::base(), []);
        let composite = Converter::composite([
            DirectConverter::new(|s: &String| s.len() as i64).writing().into(),
            DirectConverter::new(|n: &i64| n.to_string()).reading().into(),
        ]);

        let registrations = store.registrations_for(&composite).unwrap();
        assert_eq!(registrations.len(), 2);
        assert!(registrations[0].is_writing());
        assert!(registrations[1].is_reading());
        // Each registration carries the child converter, not the composite.
        assert!(registrations[0].converter().as_direct().is_some());
    }

    #[test]
    fn composite_with_empty_generic_child_fails() {
        let store = StoreConversions::none();
        let composite = Converter::composite([
            DirectConverter::new(|s: &String| s.len() as i64).into(),
            GenericConverter::new([], |_, _| {
                Err(ConversionError::TypeMismatch { expected: "n/a" })
            })
            .into(),
        ]);

        assert!(store.registrations_for(&composite).is_err());
    }

    #[test]
    fn simple_flags_follow_the_holder() {
        let store = StoreConversions::none();
        let converter: Converter = DirectConverter::new(|s: &String| s.len() as i64).into();

        let registration = &store.registrations_for(&converter).unwrap()[0];
        assert!(!registration.is_simple_source_type());
        assert!(!registration.is_simple_target_type());
    }
}
