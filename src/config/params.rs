//! Lenient decoding of editor-style plugin parameters
//!
//! Parameter editors store every value as a string: numbers as `"2"`,
//! booleans as `"true"`, struct lists as a JSON string holding an array of
//! JSON strings. These helpers accept both that encoding and plain JSON.

use crate::types::ids::CommonEventId;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, got {other}"))),
    }
}

pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = string(deserializer)?;
    Ok((!value.is_empty()).then_some(value))
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_u32(&value).map_err(D::Error::custom)
}

pub(crate) fn common_event_id<'de, D>(deserializer: D) -> Result<CommonEventId, D::Error>
where
    D: Deserializer<'de>,
{
    number(deserializer).map(CommonEventId::new)
}

pub(crate) fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim() {
            "" | "false" => Ok(false),
            "true" => Ok(true),
            other => Err(D::Error::custom(format!(
                "expected a boolean, got \"{other}\""
            ))),
        },
        other => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

/// A list of structs, each level optionally wrapped in a JSON string
pub(crate) fn struct_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = unwrap_json_string(Value::deserialize(deserializer)?).map_err(D::Error::custom)?;
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(D::Error::custom(format!("expected a list, got {other}")));
        }
    };

    items
        .into_iter()
        .map(|item| {
            let item = unwrap_json_string(item).map_err(D::Error::custom)?;
            T::deserialize(item).map_err(D::Error::custom)
        })
        .collect()
}

fn unwrap_json_string(value: Value) -> Result<Value, serde_json::Error> {
    match value {
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => serde_json::from_str(&s),
        other => Ok(other),
    }
}

fn parse_u32(value: &Value) -> Result<u32, String> {
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| format!("expected a non-negative integer, got {n}")),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("expected a non-negative integer, got \"{s}\"")),
        other => Err(format!("expected a non-negative integer, got {other}")),
    }
}
