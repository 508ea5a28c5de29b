//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, boxed slices instead of `Vec`, and
//! enums with explicit discriminants. Enums arrive from C as plain `u32`
//! and are checked here, so an out-of-range value is an error rather than
//! undefined behavior. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use webservice_core::{HttpRequest, Method, ParameterEncoding, Request, RequestError, WebService};

/// Opaque handle to a `WebService`.
pub struct FfiWebService {
    pub(crate) inner: WebService,
}

/// Opaque handle to a `Request` being configured.
pub struct FfiRequest {
    pub(crate) inner: Request,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Head = 1,
    Post = 2,
    Put = 3,
    Patch = 4,
    Delete = 5,
    Options = 6,
    Trace = 7,
    Connect = 8,
}

impl From<Method> for FfiHttpMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => FfiHttpMethod::Get,
            Method::Head => FfiHttpMethod::Head,
            Method::Post => FfiHttpMethod::Post,
            Method::Put => FfiHttpMethod::Put,
            Method::Patch => FfiHttpMethod::Patch,
            Method::Delete => FfiHttpMethod::Delete,
            Method::Options => FfiHttpMethod::Options,
            Method::Trace => FfiHttpMethod::Trace,
            Method::Connect => FfiHttpMethod::Connect,
        }
    }
}

/// Decode a raw `FfiHttpMethod` discriminant.
pub(crate) fn method_from_raw(raw: u32) -> Option<Method> {
    let method = match raw {
        0 => Method::Get,
        1 => Method::Head,
        2 => Method::Post,
        3 => Method::Put,
        4 => Method::Patch,
        5 => Method::Delete,
        6 => Method::Options,
        7 => Method::Trace,
        8 => Method::Connect,
        _ => return None,
    };
    Some(method)
}

/// Parameter encoding as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiParameterEncoding {
    Percent = 0,
    Json = 1,
}

/// Decode a raw `FfiParameterEncoding` discriminant.
pub(crate) fn encoding_from_raw(raw: u32) -> Option<ParameterEncoding> {
    match raw {
        0 => Some(ParameterEncoding::Percent),
        1 => Some(ParameterEncoding::Json),
        _ => None,
    }
}

/// Error codes returned by setters and in `FfiFinalizeResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    UnsupportedParameter = 2,
    InvalidParameters = 3,
    BodyEncoding = 4,
    InvalidConfig = 5,
    InvalidUtf8 = 6,
    InvalidEnum = 7,
    InteriorNul = 8,
    NullArg = 9,
    Panic = 10,
    InvalidHeader = 11,
}

impl From<&RequestError> for FfiErrorCode {
    fn from(err: &RequestError) -> Self {
        match err {
            RequestError::InvalidUrl { .. } => FfiErrorCode::InvalidUrl,
            RequestError::UnsupportedParameter { .. } => FfiErrorCode::UnsupportedParameter,
            RequestError::ParametersNotObject { .. } => FfiErrorCode::InvalidParameters,
            RequestError::BodyEncoding(_) => FfiErrorCode::BodyEncoding,
            RequestError::InvalidConfig(_) => FfiErrorCode::InvalidConfig,
            RequestError::InvalidHeader { .. } => FfiErrorCode::InvalidHeader,
        }
    }
}

// ---------------------------------------------------------------------------
// Finalized request
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A finalized HTTP request described as C-compatible plain data.
///
/// `body` points at `body_len` bytes and is only meaningful when `has_body`
/// is true; a present body may be empty.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub has_body: bool,
    pub body: *mut u8,
    pub body_len: usize,
}

fn c_string(s: String) -> Result<*mut c_char, FfiErrorCode> {
    CString::new(s)
        .map(CString::into_raw)
        .map_err(|_| FfiErrorCode::InteriorNul)
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Fails if the URL or a header contains an interior NUL byte; nothing is
    /// leaked in that case.
    pub(crate) fn from_core(req: HttpRequest) -> Result<*mut Self, FfiErrorCode> {
        let mut ffi_headers = Vec::with_capacity(req.headers.len());
        for (k, v) in req.headers {
            let pair = c_string(k).and_then(|key| match c_string(v) {
                Ok(value) => Ok(FfiHeader { key, value }),
                Err(e) => {
                    drop(unsafe { CString::from_raw(key) });
                    Err(e)
                }
            });
            match pair {
                Ok(h) => ffi_headers.push(h),
                Err(e) => {
                    free_headers(ffi_headers);
                    return Err(e);
                }
            }
        }

        let url = match c_string(req.url) {
            Ok(url) => url,
            Err(e) => {
                free_headers(ffi_headers);
                return Err(e);
            }
        };

        let headers_len = ffi_headers.len();
        let headers = if ffi_headers.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        let (has_body, body, body_len) = match req.body {
            Some(bytes) => {
                let len = bytes.len();
                (true, Box::into_raw(bytes.into_boxed_slice()) as *mut u8, len)
            }
            None => (false, std::ptr::null_mut(), 0),
        };

        Ok(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            has_body,
            body,
            body_len,
        })))
    }

    /// Release everything owned by a pointer returned from `from_core`.
    ///
    /// # Safety
    /// `ptr` must come from `from_core` and not have been freed.
    pub(crate) unsafe fn free(ptr: *mut Self) {
        let req = unsafe { Box::from_raw(ptr) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len);
            free_headers(unsafe { Box::from_raw(slice) }.into_vec());
        }
        if req.has_body {
            let slice = std::ptr::slice_from_raw_parts_mut(req.body, req.body_len);
            drop(unsafe { Box::from_raw(slice) });
        }
    }
}

fn free_headers(headers: Vec<FfiHeader>) {
    for h in headers {
        if !h.key.is_null() {
            drop(unsafe { CString::from_raw(h.key) });
        }
        if !h.value.is_null() {
            drop(unsafe { CString::from_raw(h.value) });
        }
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Result of `ws_request_finalize`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `request`
/// points at the finalized request. On failure `request` is null and
/// `error_message` is a human-readable C string.
#[repr(C)]
pub struct FfiFinalizeResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub request: *mut FfiHttpRequest,
}

impl FfiFinalizeResult {
    pub(crate) fn ok(request: *mut FfiHttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiFinalizeResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            request,
        }))
    }

    pub(crate) fn error(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiFinalizeResult {
            error_code,
            error_message: CString::new(msg.replace('\0', "")).unwrap_or_default().into_raw(),
            request: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: &RequestError) -> *mut Self {
        Self::error(err.into(), &err.to_string())
    }
}
