//! Request-building core for the web service client.
//!
//! # Overview
//! Builds wire-ready `HttpRequest` values without touching the network
//! (host-does-IO pattern). The caller configures a `Request`, calls
//! `finalize`, and executes the result with its own transport.
//!
//! # Design
//! - `Parameters` holds scalar values only; dynamic JSON input is checked
//!   when it is set.
//! - `ParameterEncoding` selects percent or JSON body encoding and is read
//!   on every `finalize`, so changing it is never sticky.
//! - Header shortcuts (`content_type`, `user_agent`) are views over the same
//!   ordered `Headers` storage as generic lookups.
//! - `WebService` resolves paths against a base URL and applies defaults.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod headers;
pub mod http;
pub mod parameters;
pub mod request;

pub use client::WebService;
pub use config::WebServiceConfig;
pub use encoding::{encode_body, encode_url, EncodedBody, ParameterEncoding};
pub use error::RequestError;
pub use headers::Headers;
pub use http::{HttpRequest, Method};
pub use parameters::{ParameterValue, Parameters};
pub use request::Request;
pub use url::Url;
