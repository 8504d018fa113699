//! Lenient numeric coercion for form-style input.
//!
//! Input is read the way a number field reads a half-typed value: the
//! longest leading numeric prefix wins, anything unusable becomes zero.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

static DECIMAL_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid decimal regex")
});
static INTEGER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("valid integer regex"));

/// Coerces raw input into a non-negative finite amount.
///
/// `""`, `"abc"`, `"-5"` and `"1e999"` all yield `0.0`; `"12.5kg"` yields `12.5`.
pub fn parse_amount(raw: &str) -> f64 {
    DECIMAL_PREFIX_RE
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map_or(0.0, sanitize_amount)
}

/// Coerces raw input into a meal count.
///
/// Fractions are cut at the decimal point (`"7.9"` -> `7`); negative,
/// empty or overflowing input yields `0`.
pub fn parse_meals(raw: &str) -> u32 {
    INTEGER_PREFIX_RE
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

/// Clamps an already-parsed amount into the non-negative finite range.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Serde hook that applies [`sanitize_amount`] to persisted amounts.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(sanitize_amount)
}

/// Serde hook for persisted meal counts.
///
/// Any JSON number is accepted; negative, fractional or out-of-range
/// values load as `0` instead of failing the whole record.
pub fn deserialize_meals<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    Ok(number
        .as_u64()
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0))
}
