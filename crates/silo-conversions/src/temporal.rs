//! Framework-default temporal codecs.
//!
//! Converters between `chrono` temporal types and the two store
//! representations stores commonly persist time as: ISO 8601 / RFC 3339
//! text encoded as UTF-8 bytes, and epoch milliseconds. Writing directions
//! are infallible; reading directions parse and fail on malformed input.
//!
//! These are the converters [`ConverterConfiguration::new`] installs as
//! framework defaults. Like every framework default, they only survive
//! registration when the store declares the corresponding representation
//! (`Vec<u8>`, `i64`) simple, and can be suppressed per pair through the
//! configuration's default filter.
//!
//! [`ConverterConfiguration::new`]: crate::ConverterConfiguration::new

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use silo_core::{ConversionError, Converter, DirectConverter};

/// The framework-default temporal converters, in registration order.
pub fn converters() -> Vec<Converter> {
    vec![
        datetime_to_bytes(),
        bytes_to_datetime(),
        naive_datetime_to_bytes(),
        bytes_to_naive_datetime(),
        naive_date_to_bytes(),
        bytes_to_naive_date(),
        datetime_to_epoch_millis(),
        epoch_millis_to_datetime(),
    ]
}

fn datetime_to_bytes() -> Converter {
    DirectConverter::new(|value: &DateTime<Utc>| value.to_rfc3339().into_bytes())
        .writing()
        .into()
}

fn bytes_to_datetime() -> Converter {
    DirectConverter::try_new(|value: &Vec<u8>| {
        let text = std::str::from_utf8(value)
            .map_err(|e| ConversionError::failed::<Vec<u8>, DateTime<Utc>>(e.to_string()))?;
        DateTime::parse_from_rfc3339(text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|e| ConversionError::failed::<Vec<u8>, DateTime<Utc>>(e.to_string()))
    })
    .reading()
    .into()
}

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn naive_datetime_to_bytes() -> Converter {
    DirectConverter::new(|value: &NaiveDateTime| {
        value.format(NAIVE_DATETIME_FORMAT).to_string().into_bytes()
    })
    .writing()
    .into()
}

fn bytes_to_naive_datetime() -> Converter {
    DirectConverter::try_new(|value: &Vec<u8>| {
        let text = std::str::from_utf8(value)
            .map_err(|e| ConversionError::failed::<Vec<u8>, NaiveDateTime>(e.to_string()))?;
        NaiveDateTime::parse_from_str(text, NAIVE_DATETIME_FORMAT)
            .map_err(|e| ConversionError::failed::<Vec<u8>, NaiveDateTime>(e.to_string()))
    })
    .reading()
    .into()
}

fn naive_date_to_bytes() -> Converter {
    DirectConverter::new(|value: &NaiveDate| value.to_string().into_bytes())
        .writing()
        .into()
}

fn bytes_to_naive_date() -> Converter {
    DirectConverter::try_new(|value: &Vec<u8>| {
        let text = std::str::from_utf8(value)
            .map_err(|e| ConversionError::failed::<Vec<u8>, NaiveDate>(e.to_string()))?;
        text.parse::<NaiveDate>()
            .map_err(|e| ConversionError::failed::<Vec<u8>, NaiveDate>(e.to_string()))
    })
    .reading()
    .into()
}

fn datetime_to_epoch_millis() -> Converter {
    DirectConverter::new(|value: &DateTime<Utc>| value.timestamp_millis())
        .writing()
        .into()
}

fn epoch_millis_to_datetime() -> Converter {
    DirectConverter::try_new(|value: &i64| {
        DateTime::from_timestamp_millis(*value).ok_or_else(|| {
            ConversionError::failed::<i64, DateTime<Utc>>(format!(
                "{value} is out of range for a timestamp"
            ))
        })
    })
    .reading()
    .into()
}
