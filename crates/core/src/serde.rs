//! Serde helper functions for request deserialization.
//!
//! Request bodies arrive either as JSON or as multipart forms, where every
//! field is a string. These helpers accept both shapes and treat empty
//! strings as absent values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn non_empty(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        other => other,
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = non_empty(Option::deserialize(deserializer)?);
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
        None => None,
    })
}

/// Deserialize an optional NaiveDate, treating empty strings as None.
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_empty(Option::deserialize(deserializer)?) {
        Some(Value::String(s)) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid date: {other}"))),
        None => Ok(None),
    }
}

/// Deserialize an optional timestamp, treating empty strings as None.
/// A bare `YYYY-MM-DD` date is read as midnight UTC.
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_empty(Option::deserialize(deserializer)?) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid timestamp: {other}"))),
        None => Ok(None),
    }
}

/// Deserialize an optional integer from a number or a numeric string.
/// Values that do not parse are dropped rather than rejected.
pub fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(Option::deserialize(deserializer)?).and_then(|v| value_to_i64(&v)))
}

/// Deserialize an optional decimal from a number or a numeric string.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        non_empty(Option::deserialize(deserializer)?).and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }),
    )
}

/// Deserialize a checkbox-style flag.
///
/// `true`, `"true"`, `1` and `"1"` are true; any other present value is false.
pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }))
}

/// Deserialize a list of ids.
///
/// Accepts an array, a JSON-encoded array string, or a single value.
/// Entries that are not integers are dropped.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::Array(items) => items.iter().filter_map(value_to_i64).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => items.iter().filter_map(value_to_i64).collect(),
            _ => s.trim().parse().map(|id| vec![id]).unwrap_or_default(),
        },
        Value::Null => Vec::new(),
        other => value_to_i64(&other).into_iter().collect(),
    }))
}
