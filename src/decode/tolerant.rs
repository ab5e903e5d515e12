//! Tolerant decoding of optional fields
//!
//! Use these with `#[serde(default, deserialize_with = "...")]` on `Option`
//! fields. A value that is present but malformed decodes to `None` instead of
//! failing the whole item. Required fields should stay plain so a mismatch
//! still surfaces as a decode error.
//!
//! XML leaves that carry attributes, such as `<Name Encoded="true">a</Name>`,
//! decode to `{"@Encoded": "true", "#text": "a"}`. Every helper here reads the
//! `#text` of such a leaf.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Try to decode a value as `T`, returning `None` on any mismatch
pub fn try_decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    T::deserialize(&value).ok().or_else(|| match value {
        Value::Object(mut map) => map.remove("#text").and_then(try_decode),
        _ => None,
    })
}

/// Try to decode a value that may arrive as text (XML) or as a native JSON value
pub fn try_parse<T>(value: Value) -> Option<T>
where
    T: FromStr + DeserializeOwned,
{
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(mut map) if map.contains_key("#text") => try_parse(map.remove("#text")?),
        other => try_decode(other),
    }
}

/// Text of a leaf, with or without attributes
pub fn into_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(mut map) => match map.remove("#text") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// Required text field that may carry XML attributes
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let kind = match &value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map without text",
    };
    into_text(value)
        .ok_or_else(|| D::Error::custom(format!("invalid type: {kind}, expected a string")))
}

/// Optional field decoded with serde; malformed values become `None`
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(try_decode(value))
}

/// Optional field parsed from text or a native value; malformed values become `None`
pub fn optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(try_parse(value))
}

/// Optional RFC 1123 timestamp (`Mon, 02 Jan 2023 15:04:05 GMT`)
pub fn optional_http_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(into_text(value)
        .and_then(|s| DateTime::parse_from_rfc2822(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Optional string map, keeping only entries whose values are text
///
/// XML metadata elements such as `<Metadata><env>prod</env></Metadata>` decode
/// to `{"env": "prod"}`.
pub fn optional_string_map<'de, D>(
    deserializer: D,
) -> Result<Option<std::collections::HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    Value::Null => Some((k, String::new())),
                    Value::Number(n) => Some((k, n.to_string())),
                    Value::Bool(b) => Some((k, b.to_string())),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
