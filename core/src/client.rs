//! Base-URL-bound request factory.
//!
//! # Design
//! `WebService` holds a validated base URL plus the defaults every request
//! should start from (headers, user agent, parameter encoding). It carries no
//! mutable state between calls: each method returns a fresh `Request` that
//! the caller configures and finalizes. The caller executes the actual HTTP
//! round-trip, keeping the core deterministic and free of I/O dependencies.

use url::Url;

use crate::config::WebServiceConfig;
use crate::encoding::ParameterEncoding;
use crate::error::RequestError;
use crate::headers::{self, Headers};
use crate::http::Method;
use crate::request::Request;

#[derive(Debug, Clone)]
pub struct WebService {
    base_url: Url,
    default_headers: Headers,
    parameter_encoding: ParameterEncoding,
}

impl WebService {
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        let parsed = Url::parse(base_url).map_err(|e| RequestError::invalid_url(base_url, e))?;
        Ok(Self {
            base_url: parsed,
            default_headers: Headers::new(),
            parameter_encoding: ParameterEncoding::default(),
        })
    }

    pub fn from_config(config: &WebServiceConfig) -> Result<Self, RequestError> {
        let mut service = Self::new(&config.base_url)?;
        for (name, value) in &config.headers {
            service.default_headers.set(name.as_str(), value.as_str());
        }
        if let Some(user_agent) = &config.user_agent {
            service.default_headers.set(headers::USER_AGENT, user_agent.as_str());
        }
        service.parameter_encoding = config.parameter_encoding;
        Ok(service)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.set(name, value);
        self
    }

    pub fn with_user_agent(self, value: impl Into<String>) -> Self {
        self.with_default_header(headers::USER_AGENT, value)
    }

    pub fn with_parameter_encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.parameter_encoding = encoding;
        self
    }

    /// Resolve `path` against the base URL.
    ///
    /// An absolute URL with a host is used as is. Anything else is appended
    /// to the base path with exactly one `/` between them, keeping any path
    /// prefix the base URL carries. The base query and fragment are dropped;
    /// a query on `path` itself is kept.
    pub fn absolute_url(&self, path: &str) -> Result<Url, RequestError> {
        if let Ok(absolute) = Url::parse(path) {
            if absolute.has_host() {
                return Ok(absolute);
            }
        }

        let mut base = self.base_url.clone();
        base.set_query(None);
        base.set_fragment(None);
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| RequestError::invalid_url(&joined, e))
    }

    pub fn request(&self, method: Method, path: &str) -> Result<Request, RequestError> {
        let mut request = Request::from_url(method, self.absolute_url(path)?);
        request.headers = self.default_headers.clone();
        request.parameter_encoding = self.parameter_encoding;
        Ok(request)
    }

    pub fn get(&self, path: &str) -> Result<Request, RequestError> {
        self.request(Method::Get, path)
    }

    pub fn head(&self, path: &str) -> Result<Request, RequestError> {
        self.request(Method::Head, path)
    }

    pub fn post(&self, path: &str) -> Result<Request, RequestError> {
        self.request(Method::Post, path)
    }

    pub fn put(&self, path: &str) -> Result<Request, RequestError> {
        self.request(Method::Put, path)
    }

    pub fn patch(&self, path: &str) -> Result<Request, RequestError> {
        self.request(Method::Patch, path)
    }

    pub fn delete(&self, path: &str) -> Result<Request, RequestError> {
        self.request(Method::Delete, path)
    }
}
