//! Registration configuration.

use std::sync::Arc;

use silo_core::{Converter, ConvertiblePair};

use crate::store::StoreConversions;
use crate::temporal;

/// Predicate deciding whether a framework-default pair gets registered.
pub type RegistrationPredicate = Arc<dyn Fn(&ConvertiblePair) -> bool + Send + Sync>;

/// Everything a conversion registry is built from: the store's conversions,
/// the user's converters, the framework-default converters, and a filter
/// over framework-default pairs.
///
/// The framework defaults are an explicit value of this configuration, not
/// global state; they default to the [`temporal`] codecs. User and store
/// converters are never subject to the default filter.
///
/// # Examples
///
/// ```
/// use silo_conversions::{ConverterConfiguration, StoreConversions};
///
/// let config = ConverterConfiguration::new(StoreConversions::none(), Vec::new())
///     .without_default_converters();
/// assert!(config.default_converters().is_empty());
/// ```
#[derive(Clone)]
pub struct ConverterConfiguration {
    store_conversions: StoreConversions,
    user_converters: Vec<Converter>,
    default_converters: Vec<Converter>,
    register_default: RegistrationPredicate,
}

impl ConverterConfiguration {
    /// Configuration with the temporal framework defaults and no filter.
    pub fn new(store_conversions: StoreConversions, user_converters: Vec<Converter>) -> Self {
        ConverterConfiguration {
            store_conversions,
            user_converters,
            default_converters: temporal::converters(),
            register_default: Arc::new(|_| true),
        }
    }

    /// Replace the framework-default converter list.
    pub fn with_default_converters(
        mut self,
        defaults: impl IntoIterator<Item = Converter>,
    ) -> Self {
        self.default_converters = defaults.into_iter().collect();
        self
    }

    /// Drop all framework defaults.
    pub fn without_default_converters(self) -> Self {
        self.with_default_converters([])
    }

    /// Suppress framework-default pairs the predicate rejects.
    pub fn with_default_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ConvertiblePair) -> bool + Send + Sync + 'static,
    {
        self.register_default = Arc::new(filter);
        self
    }

    /// The store's conversions.
    pub fn store_conversions(&self) -> &StoreConversions {
        &self.store_conversions
    }

    /// The user's converters, in registration order.
    pub fn user_converters(&self) -> &[Converter] {
        &self.user_converters
    }

    /// The framework-default converters.
    pub fn default_converters(&self) -> &[Converter] {
        &self.default_converters
    }

    /// Whether a framework-default pair shall be registered.
    pub fn should_register(&self, pair: &ConvertiblePair) -> bool {
        (self.register_default)(pair)
    }
}
