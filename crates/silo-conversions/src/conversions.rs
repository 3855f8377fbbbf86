//! Converter registration and conversion-target resolution.
//!
//! [`CustomConversions`] is built once per store configuration at bootstrap
//! and is read-only afterwards. Construction gathers converter candidates
//! from three streams in ascending precedence - framework defaults, store
//! defaults, user converters - filters them against the store's simple
//! types, records the surviving reading/writing pairs, and keeps the final
//! converter list in reverse registration order so that the most recently
//! registered converter is consulted first.
//!
//! Resolution answers "what store type should this domain type convert
//! to/from". A miss is not an error; callers fall back to their generic
//! default conversion. Results, including misses, are memoized per
//! (source, requested target).

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use silo_core::{
    Converter, ConverterSink, ConvertiblePair, RegistrationError, SimpleTypeHolder, TypeKey,
};

use crate::cache::ConversionTargetsCache;
use crate::config::ConverterConfiguration;
use crate::registration::{ConverterRegistration, ConverterRegistrationIntent};
use crate::store::StoreConversions;

/// Insertion-ordered set of convertible pairs.
///
/// Keeps first-insertion order for iteration while deduplicating; scanning
/// happens most-recent-first.
#[derive(Debug, Default)]
struct PairSet {
    order: Vec<ConvertiblePair>,
    seen: FxHashSet<ConvertiblePair>,
}

impl PairSet {
    fn insert(&mut self, pair: ConvertiblePair) {
        if self.seen.insert(pair) {
            self.order.push(pair);
        }
    }

    fn contains(&self, pair: &ConvertiblePair) -> bool {
        self.seen.contains(pair)
    }

    fn iter_recent_first(&self) -> impl Iterator<Item = &ConvertiblePair> {
        self.order.iter().rev()
    }
}

/// The custom conversions registered for one store configuration.
///
/// Immutable after construction and safe for unbounded concurrent readers;
/// the only post-construction mutable state is the two target caches, which
/// are concurrent and append-only.
///
/// # Examples
///
/// ```
/// use silo_core::{DirectConverter, SimpleTypeHolder, TypeKey};
/// use silo_conversions::{CustomConversions, StoreConversions};
///
/// let store = StoreConversions::of(SimpleTypeHolder::base(), []);
/// let conversions = CustomConversions::with_converters(
///     store,
///     vec![DirectConverter::new(|ip: &std::net::IpAddr| ip.to_string())
///         .writing()
///         .into()],
/// )
/// .unwrap();
///
/// let source = TypeKey::of::<std::net::IpAddr>();
/// assert!(conversions.has_custom_write_target(source));
/// assert_eq!(
///     conversions.custom_write_target(source),
///     Some(TypeKey::of::<String>())
/// );
/// ```
#[derive(Debug)]
pub struct CustomConversions {
    simple_types: SimpleTypeHolder,
    converters: Vec<Converter>,
    reading_pairs: PairSet,
    writing_pairs: PairSet,
    custom_simple_types: FxHashSet<TypeKey>,
    read_targets: ConversionTargetsCache,
    write_targets: ConversionTargetsCache,
}

impl CustomConversions {
    /// Build the conversions for a configuration.
    ///
    /// Fails when a candidate converter declares no pairs; everything else
    /// about registration is filtering, never failure.
    pub fn new(config: ConverterConfiguration) -> Result<Self, RegistrationError> {
        let mut reading_pairs = PairSet::default();
        let mut writing_pairs = PairSet::default();
        let mut custom_simple_types = FxHashSet::default();
        let mut registered = Vec::new();

        for intent in Self::collect_potential_registrations(&config)? {
            if !Self::is_supported(&intent) {
                continue;
            }
            if intent.is_default_converter() && !config.should_register(&intent.registration().pair())
            {
                continue;
            }
            let registration = intent.into_registration();
            Self::register(
                &registration,
                &mut reading_pairs,
                &mut writing_pairs,
                &mut custom_simple_types,
            );
            registered.push(registration.into_converter());
        }

        let mut seen = FxHashSet::default();
        registered.retain(|converter| seen.insert(converter.identity()));
        registered.reverse();

        let simple_types = config
            .store_conversions()
            .simple_types()
            .extended_with(custom_simple_types.iter().copied());

        Ok(CustomConversions {
            simple_types,
            converters: registered,
            reading_pairs,
            writing_pairs,
            custom_simple_types,
            read_targets: ConversionTargetsCache::new(),
            write_targets: ConversionTargetsCache::new(),
        })
    }

    /// Build the conversions for a store and user converters, with the
    /// framework defaults.
    pub fn with_converters(
        store_conversions: StoreConversions,
        converters: Vec<Converter>,
    ) -> Result<Self, RegistrationError> {
        Self::new(ConverterConfiguration::new(store_conversions, converters))
    }

    /// The simple types: the store's plus the sources of writing pairs.
    pub fn simple_type_holder(&self) -> &SimpleTypeHolder {
        &self.simple_types
    }

    /// Whether the type is simple - persistable without nested conversion.
    pub fn is_simple_type(&self, key: TypeKey) -> bool {
        self.simple_types.is_simple(key)
    }

    /// The retained converters, most recently registered first.
    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }

    /// The store type the given source type should be written as, if a
    /// writing converter is registered for it.
    pub fn custom_write_target(&self, source: TypeKey) -> Option<TypeKey> {
        self.write_targets.compute_if_absent(source, None, |s, t| {
            Self::custom_target(&self.writing_pairs, s, t)
        })
    }

    /// Like [`custom_write_target`](Self::custom_write_target), narrowed to
    /// a requested target type.
    pub fn custom_write_target_for(&self, source: TypeKey, target: TypeKey) -> Option<TypeKey> {
        self.write_targets
            .compute_if_absent(source, Some(target), |s, t| {
                Self::custom_target(&self.writing_pairs, s, t)
            })
    }

    /// Whether a writing converter is registered for the source type.
    pub fn has_custom_write_target(&self, source: TypeKey) -> bool {
        self.custom_write_target(source).is_some()
    }

    /// Whether a writing converter to the requested target is registered.
    pub fn has_custom_write_target_for(&self, source: TypeKey, target: TypeKey) -> bool {
        self.custom_write_target_for(source, target).is_some()
    }

    /// The domain type the given store type should be read as, narrowed to
    /// a requested target type.
    pub fn custom_read_target(&self, source: TypeKey, target: TypeKey) -> Option<TypeKey> {
        self.read_targets
            .compute_if_absent(source, Some(target), |s, t| {
                Self::custom_target(&self.reading_pairs, s, t)
            })
    }

    /// Whether a reading converter to the requested target is registered.
    pub fn has_custom_read_target(&self, source: TypeKey, target: TypeKey) -> bool {
        self.custom_read_target(source, target).is_some()
    }

    /// Push every retained converter into the sink, most recently
    /// registered first. Composites are flattened into their children.
    pub fn register_converters_in(&self, sink: &mut dyn ConverterSink) {
        for converter in &self.converters {
            Self::register_converter_in(converter, sink);
        }
    }

    fn register_converter_in(converter: &Converter, sink: &mut dyn ConverterSink) {
        match converter {
            Converter::Direct(direct) => sink.add_converter(direct.clone()),
            Converter::Factory(factory) => sink.add_converter_factory(factory.clone()),
            Converter::Generic(generic) => sink.add_generic_converter(generic.clone()),
            Converter::Composite(children) => {
                for child in children.iter() {
                    Self::register_converter_in(child, sink);
                }
            }
        }
    }

    /// Gather all candidates with origin information, in ascending
    /// precedence: framework defaults, store defaults, user converters.
    fn collect_potential_registrations(
        config: &ConverterConfiguration,
    ) -> Result<Vec<ConverterRegistrationIntent>, RegistrationError> {
        let store = config.store_conversions();
        let mut intents = Vec::new();

        for converter in config.default_converters() {
            intents.extend(
                store
                    .registrations_for(converter)?
                    .into_iter()
                    .map(ConverterRegistrationIntent::framework_default),
            );
        }
        for converter in store.store_converters() {
            intents.extend(
                store
                    .registrations_for(converter)?
                    .into_iter()
                    .map(ConverterRegistrationIntent::store),
            );
        }
        for converter in config.user_converters() {
            intents.extend(
                store
                    .registrations_for(converter)?
                    .into_iter()
                    .map(ConverterRegistrationIntent::user),
            );
        }

        Ok(intents)
    }

    /// User and store converters are always supported; framework defaults
    /// only when they read from or write to a store-simple type.
    fn is_supported(intent: &ConverterRegistrationIntent) -> bool {
        let register = intent.is_user_converter()
            || intent.is_store_converter()
            || (intent.is_reading() && intent.is_simple_source_type())
            || (intent.is_writing() && intent.is_simple_target_type());

        let direction = if intent.is_reading() { "reading" } else { "writing" };
        if register {
            debug!(
                source = %intent.source_type(),
                target = %intent.target_type(),
                origin = ?intent.origin(),
                "adding {direction} converter"
            );
        } else {
            debug!(
                source = %intent.source_type(),
                target = %intent.target_type(),
                "skipping {direction} converter; not a store-supported simple type"
            );
        }
        register
    }

    fn register(
        registration: &ConverterRegistration,
        reading_pairs: &mut PairSet,
        writing_pairs: &mut PairSet,
        custom_simple_types: &mut FxHashSet<TypeKey>,
    ) {
        let pair = registration.pair();

        if registration.is_reading() {
            reading_pairs.insert(pair);
            if !registration.is_simple_source_type() {
                warn!(
                    %pair,
                    "registering converter as reading converter although it does not convert \
                     from a store-supported type; check its flags"
                );
            }
        }

        if registration.is_writing() {
            writing_pairs.insert(pair);
            custom_simple_types.insert(pair.source());
            if !registration.is_simple_target_type() {
                warn!(
                    %pair,
                    "registering converter as writing converter although it does not convert \
                     to a store-supported type; check its flags"
                );
            }
        }
    }

    /// First structural match in reverse registration order; no
    /// most-specific tie-break is attempted.
    fn custom_target(
        pairs: &PairSet,
        source: TypeKey,
        requested: Option<TypeKey>,
    ) -> Option<TypeKey> {
        if let Some(target) = requested {
            if pairs.contains(&ConvertiblePair::new(source, target)) {
                return Some(target);
            }
        }

        pairs.iter_recent_first().find_map(|pair| {
            if pair.source() != source {
                return None;
            }
            match requested {
                Some(target) if pair.target() != target => None,
                _ => Some(pair.target()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use silo_core::{DirectConverter, GenericConversionService, GenericConverter};

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Json(String);

    fn base_store() -> StoreConversions {
        StoreConversions::of(SimpleTypeHolder::base(), [])
    }

    fn json_to_string() -> Converter {
        DirectConverter::new(|json: &Json| json.0.clone()).writing().into()
    }

    #[test]
    fn writing_converter_resolves_write_target() {
        let conversions =
            CustomConversions::with_converters(base_store(), vec![json_to_string()]).unwrap();

        let source = TypeKey::of::<Json>();
        assert!(conversions.has_custom_write_target(source));
        assert_eq!(
            conversions.custom_write_target(source),
            Some(TypeKey::of::<String>())
        );
        assert_eq!(
            conversions.custom_write_target_for(source, TypeKey::of::<String>()),
            Some(TypeKey::of::<String>())
        );
    }

    #[test]
    fn narrowing_to_an_unregistered_target_misses() {
        let conversions =
            CustomConversions::with_converters(base_store(), vec![json_to_string()]).unwrap();

        assert_eq!(
            conversions.custom_write_target_for(TypeKey::of::<Json>(), TypeKey::of::<i64>()),
            None
        );
        assert!(!conversions.has_custom_write_target_for(
            TypeKey::of::<Json>(),
            TypeKey::of::<i64>()
        ));
    }

    #[test]
    fn unregistered_source_misses() {
        let conversions =
            CustomConversions::with_converters(base_store(), vec![json_to_string()]).unwrap();

        assert!(!conversions.has_custom_write_target(TypeKey::of::<u128>()));
        assert_eq!(conversions.custom_write_target(TypeKey::of::<u128>()), None);
    }

    #[test]
    fn reading_converter_resolves_read_target() {
        let from_string: Converter = DirectConverter::new(|s: &String| Json(s.clone()))
            .reading()
            .into();
        let conversions =
            CustomConversions::with_converters(base_store(), vec![from_string]).unwrap();

        assert!(conversions.has_custom_read_target(TypeKey::of::<String>(), TypeKey::of::<Json>()));
        assert_eq!(
            conversions.custom_read_target(TypeKey::of::<String>(), TypeKey::of::<Json>()),
            Some(TypeKey::of::<Json>())
        );
        assert!(!conversions.has_custom_read_target(TypeKey::of::<String>(), TypeKey::of::<i64>()));
    }

    #[test]
    fn later_registered_converter_wins() {
        let to_string = json_to_string();
        let to_bytes: Converter = DirectConverter::new(|json: &Json| json.0.clone().into_bytes())
            .writing()
            .into();

        let conversions =
            CustomConversions::with_converters(base_store(), vec![to_string, to_bytes]).unwrap();

        // Both declare Json as source; the later registration is consulted
        // first when no target is requested.
        assert_eq!(
            conversions.custom_write_target(TypeKey::of::<Json>()),
            Some(TypeKey::of::<Vec<u8>>())
        );
        // The earlier one is still reachable by narrowing.
        assert_eq!(
            conversions.custom_write_target_for(TypeKey::of::<Json>(), TypeKey::of::<String>()),
            Some(TypeKey::of::<String>())
        );
    }

    #[test]
    fn user_converters_beat_framework_defaults() {
        use chrono::{DateTime, Utc};

        let user: Converter = DirectConverter::new(|dt: &DateTime<Utc>| dt.to_rfc3339())
            .writing()
            .into();
        let conversions = CustomConversions::with_converters(base_store(), vec![user]).unwrap();

        // The temporal defaults write DateTime<Utc> as bytes and millis; the
        // user converter writes it as String and must be consulted first.
        assert_eq!(
            conversions.custom_write_target(TypeKey::of::<DateTime<Utc>>()),
            Some(TypeKey::of::<String>())
        );
    }

    #[test]
    fn registering_the_same_converter_twice_dedups() {
        let converter = json_to_string();
        let conversions = CustomConversions::new(
            ConverterConfiguration::new(base_store(), vec![converter.clone(), converter])
                .without_default_converters(),
        )
        .unwrap();

        assert_eq!(conversions.converters().len(), 1);
    }

    #[test]
    fn unflagged_defaults_are_dropped_without_simple_types() {
        // Under a store with no simple types, an unflagged framework default
        // is neither reading nor writing, so the support filter drops it.
        let unflagged: Converter = DirectConverter::new(|n: &i64| n.to_string()).into();
        let conversions = CustomConversions::new(
            ConverterConfiguration::new(StoreConversions::none(), Vec::new())
                .with_default_converters([unflagged]),
        )
        .unwrap();

        assert!(conversions.converters().is_empty());
        assert!(!conversions.has_custom_write_target(TypeKey::of::<i64>()));
    }

    #[test]
    fn flagged_defaults_are_dropped_when_types_are_not_simple() {
        // Explicit flags classify the converter but do not exempt framework
        // defaults from the simple-type requirement.
        let conversions = CustomConversions::new(ConverterConfiguration::new(
            StoreConversions::none(),
            Vec::new(),
        ))
        .unwrap();

        assert!(conversions.converters().is_empty());
    }

    #[test]
    fn default_filter_suppresses_specific_pairs() {
        use chrono::{DateTime, Utc};

        let conversions = CustomConversions::new(
            ConverterConfiguration::new(base_store(), Vec::new())
                .with_default_filter(|pair| !pair.target().is::<i64>()),
        )
        .unwrap();

        let source = TypeKey::of::<DateTime<Utc>>();
        assert!(conversions.has_custom_write_target_for(source, TypeKey::of::<Vec<u8>>()));
        assert!(!conversions.has_custom_write_target_for(source, TypeKey::of::<i64>()));
    }

    #[test]
    fn user_converters_are_exempt_from_the_default_filter() {
        let conversions = CustomConversions::new(
            ConverterConfiguration::new(base_store(), vec![json_to_string()])
                .with_default_filter(|_| false),
        )
        .unwrap();

        assert!(conversions.has_custom_write_target(TypeKey::of::<Json>()));
    }

    #[test]
    fn writing_pair_sources_become_simple_types() {
        let conversions =
            CustomConversions::with_converters(base_store(), vec![json_to_string()]).unwrap();

        assert!(conversions.is_simple_type(TypeKey::of::<Json>()));
        assert!(conversions.is_simple_type(TypeKey::of::<i64>()));
        assert!(!conversions.is_simple_type(TypeKey::of::<Vec<u16>>()));
    }

    #[test]
    fn reading_only_converter_does_not_make_source_simple() {
        let from_string: Converter = DirectConverter::new(|s: &String| Json(s.clone()))
            .reading()
            .into();
        let conversions = CustomConversions::new(
            ConverterConfiguration::new(StoreConversions::none(), vec![from_string])
                .without_default_converters(),
        )
        .unwrap();

        assert!(!conversions.is_simple_type(TypeKey::of::<String>()));
        assert!(conversions.custom_simple_types.is_empty());
    }

    #[test]
    fn empty_generic_converter_fails_construction() {
        let empty: Converter = GenericConverter::new([], |_, _| {
            Err(silo_core::ConversionError::TypeMismatch { expected: "n/a" })
        })
        .into();

        let result = CustomConversions::with_converters(base_store(), vec![empty]);
        assert!(matches!(
            result,
            Err(RegistrationError::NoConvertiblePairs { .. })
        ));
    }

    #[test]
    fn registered_converters_drain_into_a_service() {
        let conversions = CustomConversions::new(
            ConverterConfiguration::new(base_store(), vec![json_to_string()])
                .without_default_converters(),
        )
        .unwrap();

        let mut service = GenericConversionService::new();
        conversions.register_converters_in(&mut service);

        let out: String = service.convert(&Json("{}".to_string())).unwrap();
        assert_eq!(out, "{}");
    }

    #[test]
    fn composite_children_drain_individually() {
        let composite = Converter::composite([
            DirectConverter::new(|json: &Json| json.0.clone()).writing().into(),
            DirectConverter::new(|s: &String| Json(s.clone())).reading().into(),
        ]);
        let conversions = CustomConversions::new(
            ConverterConfiguration::new(base_store(), vec![composite])
                .without_default_converters(),
        )
        .unwrap();

        let mut service = GenericConversionService::new();
        conversions.register_converters_in(&mut service);
        assert_eq!(service.pair_count(), 2);

        let json: Json = service.convert(&"[]".to_string()).unwrap();
        assert_eq!(json, Json("[]".to_string()));
    }

    #[test]
    fn conversions_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CustomConversions>();
    }
}
