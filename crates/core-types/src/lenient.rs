// In crates/core-types/src/lenient.rs

//! Forgiving `deserialize_with` helpers for upstream market data.
//!
//! The upstream API is not trusted to keep its types stable, so every field
//! is read as a raw `serde_json::Value` first and only accepted when it has
//! the expected shape. Anything else becomes `None` instead of failing the
//! whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a finite JSON number. Strings, booleans, nulls and non-finite
/// values all map to `None`.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(finite))
}

/// Accepts a JSON string only.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Reads a `{ "price": [..] }` sparkline object into a price series.
///
/// Non-numeric samples are dropped; a missing or misshapen object yields an
/// empty series.
pub fn sparkline<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let prices = value
        .as_ref()
        .and_then(|v| v.get("price"))
        .and_then(Value::as_array)
        .map(|samples| samples.iter().filter_map(finite).collect())
        .unwrap_or_default();
    Ok(prices)
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|x| x.is_finite())
}
