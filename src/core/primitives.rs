use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn f64_to_decimal(value: f64, field_name: &str) -> ChartResult<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as decimal"))
    })
}

#[must_use]
pub fn datetime_to_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

pub fn millis_to_datetime(millis: f64) -> ChartResult<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(ChartError::InvalidData(
            "timestamp must be finite".to_owned(),
        ));
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
        .ok_or_else(|| ChartError::InvalidData(format!("timestamp {millis} is out of range")))
}

/// Midnight UTC of the given calendar day. `month` is 1-based.
pub fn utc_date(year: i32, month: u32, day: u32) -> ChartResult<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ChartError::InvalidData(format!("invalid calendar date {year}-{month}-{day}"))
    })?;
    Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Parses `YYYY-MM-DD` or a full RFC 3339 timestamp as UTC.
pub fn parse_utc_date(input: &str) -> ChartResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)));
    }
    if let Ok(time) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&time));
    }
    DateTime::parse_from_rfc3339(input)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| ChartError::InvalidData(format!("invalid date `{input}`: {e}")))
}

/// ISO-8601 string with millisecond precision, e.g. `1994-01-01T00:00:00.000Z`.
#[must_use]
pub fn to_iso_string(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
