//! Conversions between domain values and the TEXT columns they are stored in.
//!
//! Timestamps are written as RFC 3339 UTC with millisecond precision and a
//! `Z` suffix, so lexical order in SQL matches chronological order.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::str::FromStr;

pub fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid stored timestamp '{}'", value))?
        .with_timezone(&Utc))
}

pub fn encode_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub fn decode_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid stored date '{}'", value))
}

/// Parse a stored enum column
pub fn decode_enum<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("Invalid stored value '{}'", value))
}
