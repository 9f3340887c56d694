//! Attribute value conversions
//!
//! Dump attributes are plain text. Integers are base-10, timestamps follow
//! one literal pattern, tag lists are packed into a single value.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;

use crate::error::FieldError;

/// `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds (up to 9 digits)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a base-10 integer
pub fn integer(field: &'static str, value: &str) -> Result<i64, FieldError> {
    value.parse().map_err(|source| FieldError::InvalidInteger {
        field,
        value: value.to_string(),
        source,
    })
}

/// Parse a timestamp; the unset value is `None`
pub fn timestamp(field: &'static str, value: &str) -> Result<Option<NaiveDateTime>, FieldError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(Some)
        .map_err(|source| FieldError::InvalidTimestamp {
            field,
            value: value.to_string(),
            source,
        })
}

/// Parse a boolean flag (`True`/`False`, `1`/`0`)
pub fn flag(field: &'static str, value: &str) -> Result<bool, FieldError> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(false)
    } else {
        Err(FieldError::InvalidFlag {
            field,
            value: value.to_string(),
        })
    }
}

/// Split a packed list into its tokens, preserving order
///
/// Two encodings exist: `<a><b><c>` and, in newer dumps, `|a|b|c|`. A
/// missing leading or trailing delimiter is tolerated; an empty value is
/// an empty list.
pub fn packed_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    if value.starts_with('|') {
        return value
            .split('|')
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();
    }

    let inner = value.strip_prefix('<').unwrap_or(value);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    if inner.is_empty() {
        return Vec::new();
    }
    inner.split("><").map(str::to_owned).collect()
}

/// Deserialize a JSON document stored in an attribute
pub fn json<T: DeserializeOwned>(field: &'static str, value: &str) -> Result<T, FieldError> {
    serde_json::from_str(value).map_err(|source| FieldError::InvalidJson { field, source })
}
