//! Result extraction
//!
//! Responses nest their payload under one envelope key per resource type
//! (`{"public_ip": {...}}`, `{"fic_gateways": [...]}`). The extractor keeps
//! the raw body and decodes only when asked.

use crate::ecl::http::ApiResponse;
use crate::ecl::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Where a resource's payload lives in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Nested under this key
    Key(&'static str),
    /// The body itself is the payload
    Root,
}

/// Lazily decoded response body
#[derive(Debug, Clone)]
pub struct Extractor {
    raw: String,
}

impl Extractor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn from_response(response: ApiResponse) -> Self {
        Self::new(response.body)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parse the whole body
    pub fn body(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.raw)?)
    }

    /// Decode the value under `key`
    pub fn extract_key<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let mut body = self.body()?;
        let value = body
            .as_object_mut()
            .and_then(|map| map.remove(key))
            .ok_or_else(|| Error::MissingEnvelopeKey {
                key: key.to_string(),
            })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Decode the payload addressed by `envelope`
    pub fn extract<T: DeserializeOwned>(&self, envelope: Envelope) -> Result<T> {
        match envelope {
            Envelope::Key(key) => self.extract_key(key),
            Envelope::Root => Ok(serde_json::from_str(&self.raw)?),
        }
    }
}

/// Walk a dot-notation path (`links.next`, `items.0.id`) through a JSON value
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(idx) if current.is_array() => current.get(idx)?,
            _ => current.get(part)?,
        };
    }
    Some(current)
}
