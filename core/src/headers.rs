//! Ordered header storage and well-known header names.
//!
//! Names are stored exactly as provided and compared case-insensitively.
//! `Request::content_type` and `Request::user_agent` read and write through
//! the same storage, so the typed shortcuts and the generic lookup can never
//! disagree.
//!
//! Storage accepts any strings; `validate` checks names and values against
//! the HTTP grammar before anything reaches the wire.

use ::http::{HeaderName, HeaderValue};

use crate::error::RequestError;

pub const ACCEPT: &str = "Accept";
pub const CACHE_CONTROL: &str = "Cache-Control";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const USER_AGENT: &str = "User-Agent";

/// Content-type values produced by parameter encoding.
pub mod content_type {
    pub const FORM_ENCODED: &str = "application/x-www-form-urlencoded";
    pub const JSON: &str = "application/json";
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header. An existing entry with the same name in any case is
    /// overwritten in place, taking the new spelling of the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self
            .entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_vec(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }

    /// Check every entry with [`validate`].
    pub fn validate(&self) -> Result<(), RequestError> {
        self.iter().try_for_each(|(name, value)| validate(name, value))
    }
}

/// Reject a header name that is not an HTTP token, or a value carrying
/// control characters. CR and LF would otherwise split the header block.
pub fn validate(name: &str, value: &str) -> Result<(), RequestError> {
    let invalid = |reason: String| RequestError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    HeaderValue::from_bytes(value.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    Ok(())
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.set(k, v);
        }
        headers
    }
}
