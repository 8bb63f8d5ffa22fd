//! Query string building from list options
//!
//! Any `Serialize` struct whose fields are scalars, options or lists of
//! scalars maps to a query string. `None` fields are skipped, lists repeat
//! the key.

use super::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Encode `opts` as `?k=v&...`, or an empty string when nothing is set
pub fn build_query<T: Serialize + ?Sized>(opts: &T) -> Result<String> {
    let value = serde_json::to_value(opts).map_err(|e| Error::Query(e.to_string()))?;

    let map = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(Error::Query(format!(
                "options must serialize to an object, got {}",
                kind(&other)
            )))
        },
    };

    let mut pairs = Vec::new();
    for (key, value) in &map {
        match value {
            Value::Null => {},
            Value::Array(items) => {
                for item in items {
                    pairs.push(encode_pair(key, &scalar(key, item)?));
                }
            },
            other => pairs.push(encode_pair(key, &scalar(key, other)?)),
        }
    }

    if pairs.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("?{}", pairs.join("&")))
    }
}

/// Append the encoded options to `url`
pub fn with_query<T: Serialize + ?Sized>(url: &str, opts: &T) -> Result<String> {
    let query = build_query(opts)?;
    if query.is_empty() {
        return Ok(url.to_string());
    }
    if url.contains('?') {
        Ok(format!("{}&{}", url, &query[1..]))
    } else {
        Ok(format!("{}{}", url, query))
    }
}

fn scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::Query(format!(
            "field {} cannot be a query value ({})",
            key,
            kind(other)
        ))),
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
