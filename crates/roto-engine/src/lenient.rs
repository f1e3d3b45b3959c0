// Tolerant deserializers for ESPN payloads.
//
// A wrong-shaped field or list element is dropped with a warning instead of
// failing the surrounding document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Read an integer from a JSON number or numeric string.
pub(crate) fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Integer field that accepts numbers or numeric strings. Anything else, or a
/// value out of range for `T`, reads as `None`.
pub(crate) fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(int_from_value)
        .and_then(|n| T::try_from(n).ok()))
}

/// Optional list whose malformed elements are skipped. `null` reads as
/// `None`; a non-list value reads as `None` with a warning.
pub(crate) fn lenient_opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(None),
        other => {
            warn!("expected a list, found {}; ignoring it", kind(&other));
            return Ok(None);
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(parsed) => out.push(parsed),
            Err(err) => warn!("skipping malformed list element {index}: {err}"),
        }
    }
    Ok(Some(out))
}

/// List whose malformed elements are skipped. `null` or a non-list value
/// reads as empty.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    lenient_opt_list(deserializer).map(Option::unwrap_or_default)
}

/// A whole sub-document that falls back to its default when malformed.
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        warn!("malformed payload section, using defaults: {err}");
        T::default()
    }))
}
