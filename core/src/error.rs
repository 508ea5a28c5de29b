//! Error type for request construction and finalization.
//!
//! # Design
//! Every failure in the core is local to a single call: there is no I/O and
//! no retry. A URL that cannot be parsed is rejected before a `Request`
//! exists, dynamic parameters are checked when they are set, and body
//! encoding failures surface from `finalize` without producing a partial
//! body.

use thiserror::Error;

/// Errors returned while building or finalizing a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The base or target URL could not be parsed as an absolute URL.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A parameter value is not a string, integer or boolean.
    #[error("parameter {key:?} has unsupported {kind} value")]
    UnsupportedParameter { key: String, kind: &'static str },

    /// Dynamic parameters were supplied as something other than a JSON object.
    #[error("parameters must be a JSON object, got {kind}")]
    ParametersNotObject { kind: &'static str },

    /// The request body could not be encoded.
    #[error("body encoding failed: {0}")]
    BodyEncoding(String),

    /// A header name is not a valid token, or its value contains control
    /// characters such as CR or LF.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A `WebServiceConfig` could not be read or parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RequestError {
    pub(crate) fn invalid_url(url: &str, err: url::ParseError) -> Self {
        RequestError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
