//! The caller-assembled description of an outgoing request.
//!
//! # Design
//! `Request` is mutated freely while it is being configured and projected
//! into an `HttpRequest` by `finalize`. The projection is pure: it reads the
//! current method, parameters, encoding and body override every time and
//! never writes anything back, so calling it twice yields identical output
//! and a mode switch between calls is always honoured.
//!
//! Precedence inside `finalize`:
//! 1. A raw body override is sent verbatim and parameters stay out of the body.
//! 2. Otherwise non-empty parameters go to the URL query for URL-routed
//!    methods, or to the body (with an inferred content-type) for POST, PUT
//!    and PATCH.
//! 3. A content-type set explicitly in the headers always beats the inferred
//!    one.

use url::Url;

use crate::encoding::{encode_body, encode_url, ParameterEncoding};
use crate::error::RequestError;
use crate::headers::{self, Headers};
use crate::http::{HttpRequest, Method};
use crate::parameters::Parameters;

#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    pub headers: Headers,
    pub parameters: Parameters,
    pub parameter_encoding: ParameterEncoding,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Parse `url` and start a request. Fails if `url` is not absolute.
    pub fn new(method: Method, url: &str) -> Result<Self, RequestError> {
        let parsed = Url::parse(url).map_err(|e| RequestError::invalid_url(url, e))?;
        Ok(Self::from_url(method, parsed))
    }

    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            parameters: Parameters::new(),
            parameter_encoding: ParameterEncoding::default(),
            body: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(headers::CONTENT_TYPE)
    }

    pub fn set_content_type(&mut self, value: impl Into<String>) {
        self.headers.set(headers::CONTENT_TYPE, value);
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(headers::USER_AGENT)
    }

    pub fn set_user_agent(&mut self, value: impl Into<String>) {
        self.headers.set(headers::USER_AGENT, value);
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Set a raw body. It replaces any parameter-derived body at finalize time.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Some(body.into());
    }

    pub fn clear_body(&mut self) {
        self.body = None;
    }

    /// Replace the parameters with the entries of a JSON object.
    ///
    /// On error the existing parameters are left untouched.
    pub fn set_json_parameters(&mut self, value: serde_json::Value) -> Result<(), RequestError> {
        self.parameters = Parameters::from_json(value)?;
        Ok(())
    }

    /// Project the current configuration into a wire-ready request.
    ///
    /// Fails with `InvalidHeader` if any header would not survive on the wire.
    pub fn finalize(&self) -> Result<HttpRequest, RequestError> {
        self.headers.validate()?;

        let mut url = self.url.clone();
        let mut wire_headers = self.headers.clone();
        let mut body = None;

        if let Some(raw) = &self.body {
            body = Some(raw.clone());
        } else if !self.parameters.is_empty() {
            if self.method.encodes_parameters_in_url() {
                url = encode_url(&self.url, &self.parameters);
            } else if let Some(encoded) = encode_body(&self.parameters, self.parameter_encoding)? {
                if !wire_headers.contains(headers::CONTENT_TYPE) {
                    wire_headers.set(headers::CONTENT_TYPE, encoded.content_type);
                }
                body = Some(encoded.bytes);
            }
        }

        tracing::debug!(
            method = %self.method,
            url = %url,
            headers = wire_headers.len(),
            body_len = body.as_ref().map_or(0, Vec::len),
            "finalized request"
        );

        Ok(HttpRequest {
            method: self.method,
            url: url.into(),
            headers: wire_headers.to_vec(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::content_type;

    fn test_request() -> Request {
        let mut request = Request::new(Method::Get, "http://httpbin.org/get").unwrap();
        request.headers.set("Test-Header-Name", "testValue");
        request
    }

    fn post() -> Request {
        Request::new(Method::Post, "http://httpbin.org/").unwrap()
    }

    fn body_text(req: &HttpRequest) -> &str {
        std::str::from_utf8(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = Request::new(Method::Get, "not a url").unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl { .. }));
    }

    #[test]
    fn finalize_copies_method_and_headers() {
        let request = test_request();
        let req = request.finalize().unwrap();

        assert_eq!(req.method.as_str(), "GET");
        for (name, value) in request.headers.iter() {
            assert_eq!(req.header(name), Some(value));
        }
    }

    #[test]
    fn empty_parameters_leave_url_without_query() {
        let mut request = Request::new(Method::Get, "http://httpbin.org/").unwrap();
        request.parameter_encoding = ParameterEncoding::Json;
        let req = request.finalize().unwrap();
        assert_eq!(req.url, "http://httpbin.org/");
        assert!(!req.url.contains('?'));
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_parameters_keep_existing_query() {
        let request = Request::new(Method::Get, "http://httpbin.org/get?page=2").unwrap();
        let req = request.finalize().unwrap();
        assert_eq!(req.url, "http://httpbin.org/get?page=2");
    }

    #[test]
    fn content_type_shortcut_writes_header() {
        let mut request = test_request();
        request.set_content_type(content_type::JSON);
        request.set_user_agent("user agent value");

        assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(request.headers.get("User-Agent"), Some("user agent value"));
    }

    #[test]
    fn content_type_shortcut_reads_header() {
        let mut request = test_request();
        request.headers.set("Content-Type", "application/json");
        request.headers.set("user-agent", "user agent value");

        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(request.user_agent(), Some("user agent value"));
    }

    #[test]
    fn get_parameters_are_encoded_in_url() {
        let mut request = test_request();
        request.parameters = Parameters::from([
            ("foo", "bar"),
            ("paramName", "paramValue"),
            ("percentEncoded", "this needs percent encoded"),
        ]);
        request.parameter_encoding = ParameterEncoding::Percent;

        let req = request.finalize().unwrap();
        let url = Url::parse(&req.url).unwrap();
        let items: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(items.len(), request.parameters.len());
        for (name, value) in items {
            let original = request.parameters.get(&name).unwrap();
            assert_eq!(value, original.to_query_string());
        }
        assert!(req.body.is_none());
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn get_with_json_mode_still_uses_query() {
        let mut request = test_request();
        request.parameters = Parameters::from([("x", "1")]);
        request.parameter_encoding = ParameterEncoding::Json;

        let req = request.finalize().unwrap();
        assert_eq!(req.url, "http://httpbin.org/get?x=1");
        assert!(req.body.is_none());
    }

    #[test]
    fn post_parameters_are_percent_encoded_in_body() {
        let mut request = post();
        request.parameters = Parameters::from([("percentEncoded", "this needs percent encoded")]);
        request.parameter_encoding = ParameterEncoding::Percent;

        let req = request.finalize().unwrap();
        let components: Vec<&str> = body_text(&req).split('=').collect();
        assert_eq!(components[0], "percentEncoded");
        assert_eq!(components[1], "this%20needs%20percent%20encoded");
        assert_eq!(req.header("Content-Type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.url, "http://httpbin.org/");
    }

    #[test]
    fn post_parameters_are_json_encoded_in_body() {
        let mut request = post();
        request.parameters = Parameters::from([("x", "1")]);
        request.parameter_encoding = ParameterEncoding::Json;

        let req = request.finalize().unwrap();
        assert_eq!(body_text(&req), r#"{"x":"1"}"#);
        assert_eq!(req.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn parameter_encoding_can_be_set_back_to_percent() {
        let mut request = post();
        request.parameters = Parameters::from([("x", "1")]);

        request.parameter_encoding = ParameterEncoding::Json;
        let _ = request.finalize().unwrap();
        request.parameter_encoding = ParameterEncoding::Percent;

        let req = request.finalize().unwrap();
        assert_eq!(body_text(&req), "x=1");
        assert_eq!(req.header("Content-Type"), Some("application/x-www-form-urlencoded"));
    }

    #[test]
    fn explicit_content_type_overrides_inferred() {
        let mut request = post();
        request.parameters = Parameters::from([("Percent Encoded", "this needs percent encoded (%&=)")]);
        request.parameter_encoding = ParameterEncoding::Percent;
        request.set_content_type(content_type::JSON);

        let req = request.finalize().unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(
            req.headers
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .count(),
            1
        );
    }

    #[test]
    fn raw_body_overwrites_parameter_body() {
        let mut request = post();
        request.parameters = Parameters::from([("percentEncoded", "this needs percent encoded")]);
        request.parameter_encoding = ParameterEncoding::Percent;
        request.set_body("newBody");

        let req = request.finalize().unwrap();
        assert_eq!(req.body.as_deref(), Some(&b"newBody"[..]));
        assert_eq!(body_text(&req).split('=').count(), 1);
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn raw_body_survives_mode_switch() {
        let mut request = post();
        request.parameters = Parameters::from([("x", "1")]);
        request.set_body(b"raw".to_vec());
        request.parameter_encoding = ParameterEncoding::Json;

        let req = request.finalize().unwrap();
        assert_eq!(body_text(&req), "raw");
    }

    #[test]
    fn clearing_body_restores_parameter_body() {
        let mut request = post();
        request.parameters = Parameters::from([("x", "1")]);
        request.set_body("raw");
        request.clear_body();

        let req = request.finalize().unwrap();
        assert_eq!(body_text(&req), "x=1");
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut request = post();
        request.parameters = Parameters::from([("a", "1"), ("b", "two words")]);
        request.set_user_agent("ua");

        let first = request.finalize().unwrap();
        let second = request.finalize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn finalize_does_not_touch_stored_headers() {
        let mut request = post();
        request.parameters = Parameters::from([("x", "1")]);
        let _ = request.finalize().unwrap();
        assert_eq!(request.content_type(), None);
    }

    #[test]
    fn set_json_parameters_rejects_non_scalars_and_keeps_previous() {
        let mut request = post();
        request.parameters = Parameters::from([("keep", "me")]);

        let err = request
            .set_json_parameters(serde_json::json!({"nested": [1]}))
            .unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedParameter { .. }));
        assert_eq!(request.parameters, Parameters::from([("keep", "me")]));

        request
            .set_json_parameters(serde_json::json!({"n": 5, "ok": true}))
            .unwrap();
        let req = request.finalize().unwrap();
        assert_eq!(body_text(&req), "n=5&ok=1");
    }

    #[test]
    fn header_injection_fails_finalize() {
        let mut request = test_request();
        request.headers.set("X-Trace", "a\r\nInjected: 1");

        let err = request.finalize().unwrap_err();
        assert!(matches!(err, RequestError::InvalidHeader { ref name, .. } if name == "X-Trace"));

        request.set_user_agent("ua\nInjected: 1");
        request.headers.remove("X-Trace");
        assert!(request.finalize().is_err());

        request.set_user_agent("ua");
        let req = request.finalize().unwrap();
        assert!(req.headers.iter().all(|(k, _)| k != "Injected"));
    }

    #[test]
    fn request_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Request>();
    }
}
