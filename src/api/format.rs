//! Label and tooltip formatters shared by the chart pages.

use chrono::{DateTime, Month, Utc};
use rust_decimal::RoundingStrategy;

use crate::core::primitives::f64_to_decimal;
use crate::error::{ChartError, ChartResult};

/// US-dollar amount with thousands separators and two decimals: `$18,064.70`.
pub fn currency(value: f64) -> ChartResult<String> {
    let rounded = f64_to_decimal(value, "currency value")?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    Ok(format!("{sign}${}.{fraction}", group_thousands(integer)))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// English month name for a zero-based month index.
pub fn month_name(month0: u32) -> ChartResult<&'static str> {
    u8::try_from(month0 + 1)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map(|month| month.name())
        .ok_or_else(|| ChartError::InvalidData(format!("month index {month0} out of range")))
}

/// `January 1947`.
pub fn month_year(year: i32, month0: u32) -> ChartResult<String> {
    Ok(format!("{} {year}", month_name(month0)?))
}

/// `January 1947` for a UTC timestamp.
#[must_use]
pub fn month_year_of(time: DateTime<Utc>) -> String {
    time.format("%B %Y").to_string()
}

/// Celsius with exactly one decimal: `7.5°C`.
#[must_use]
pub fn celsius(value: f64) -> String {
    format!("{value:.1}°C")
}

/// Fixed one-decimal number, as used by heat map legend ticks.
#[must_use]
pub fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

/// Rounded percentage: `12%`.
#[must_use]
pub fn rounded_percent(value: f64) -> String {
    format!("{}%", value.round())
}

/// Minutes and seconds of a timestamp: `36:50`.
#[must_use]
pub fn minutes_seconds(time: DateTime<Utc>) -> String {
    time.format("%M:%S").to_string()
}

/// Shortest decimal form of a number, the way it appears in `data-*` attributes.
#[must_use]
pub fn plain_number(value: f64) -> String {
    if value == 0.0 {
        // Avoids `-0`.
        return "0".to_owned();
    }
    value.to_string()
}
