//! Configuration for `WebService`.
//!
//! Loaded from JSON so hosts can ship it as a bundled resource or pass it
//! across the FFI boundary as a string. Only `base_url` is required.
//!
//! ```json
//! {
//!   "base_url": "https://api.example.com/v1",
//!   "user_agent": "example-app/2.3",
//!   "headers": { "Accept": "application/json" },
//!   "parameter_encoding": "json"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoding::ParameterEncoding;
use crate::error::RequestError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebServiceConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Headers added to every request, in name order.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub parameter_encoding: ParameterEncoding,
}

impl WebServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: None,
            headers: BTreeMap::new(),
            parameter_encoding: ParameterEncoding::default(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RequestError> {
        serde_json::from_str(raw).map_err(|e| RequestError::InvalidConfig(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RequestError::InvalidConfig(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded web service config");
        Self::from_json_str(&raw)
    }
}
