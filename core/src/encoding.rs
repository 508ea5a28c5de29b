//! Parameter encoding into URL queries and request bodies.
//!
//! # Design
//! `ParameterEncoding` is a plain selector that `Request::finalize` consumes
//! on every call; nothing derived from it is cached, so switching modes on a
//! request is never sticky.
//!
//! Percent encoding leaves only ASCII alphanumerics and the unreserved marks
//! `-` `.` `_` `~` as-is. Everything else, including space, is emitted as an
//! uppercase `%XX` sequence of its UTF-8 bytes. Space becomes `%20`, never
//! `+`. Query strings are always percent encoded regardless of mode since
//! JSON has no query representation.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RequestError;
use crate::headers::content_type;
use crate::parameters::Parameters;

/// Characters escaped in query and form keys and values.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How parameters are serialized into a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterEncoding {
    #[default]
    Percent,
    Json,
}

impl ParameterEncoding {
    /// Content-type declared for a body encoded in this mode.
    pub fn content_type(self) -> &'static str {
        match self {
            ParameterEncoding::Percent => content_type::FORM_ENCODED,
            ParameterEncoding::Json => content_type::JSON,
        }
    }

    pub fn encode_body(self, parameters: &Parameters) -> Result<Option<EncodedBody>, RequestError> {
        encode_body(parameters, self)
    }
}

/// An encoded body together with the content-type it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// `key=value` pairs joined with `&`, in insertion order.
pub fn percent_encode(parameters: &Parameters) -> String {
    parameters
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, COMPONENT),
                utf8_percent_encode(&value.to_query_string(), COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Return a copy of `url` whose query is replaced by the percent-encoded
/// parameters. Empty parameters leave no query component at all.
pub fn encode_url(url: &Url, parameters: &Parameters) -> Url {
    let mut encoded = url.clone();
    if parameters.is_empty() {
        encoded.set_query(None);
    } else {
        let query = percent_encode(parameters);
        tracing::trace!(%query, "encoded parameters into URL query");
        encoded.set_query(Some(&query));
    }
    encoded
}

/// Encode parameters as a request body. Empty parameters produce no body.
pub fn encode_body(
    parameters: &Parameters,
    encoding: ParameterEncoding,
) -> Result<Option<EncodedBody>, RequestError> {
    if parameters.is_empty() {
        return Ok(None);
    }

    let bytes = match encoding {
        ParameterEncoding::Percent => percent_encode(parameters).into_bytes(),
        ParameterEncoding::Json => serde_json::to_vec(parameters)
            .map_err(|e| RequestError::BodyEncoding(e.to_string()))?,
    };
    tracing::trace!(?encoding, len = bytes.len(), "encoded parameters into body");

    Ok(Some(EncodedBody {
        bytes,
        content_type: encoding.content_type(),
    }))
}
