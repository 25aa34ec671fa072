//! Forgiving deserializers for query-string values.
//!
//! Storefronts send placeholders like `?page=&status=`; an empty or
//! unparseable value reads as absent so the endpoint falls back to its
//! defaults instead of rejecting the request.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// `None` for empty or unparseable values.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// Boolean flag accepting `1`/`0`, `t`/`f` and `true`/`false` in any case.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| parse_flag(value.trim())))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
