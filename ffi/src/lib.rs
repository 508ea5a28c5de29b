//! C-ABI wrapper around `webservice-core`.
//!
//! # Overview
//! Lets a mobile host build and finalize requests through `extern "C"`
//! functions without linking serde or url directly. The host executes the
//! finalized request with its native networking stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Setters return an `FfiErrorCode`; `ws_request_finalize` returns an
//!   `FfiFinalizeResult` envelope carrying either the request or an error.
//! - Parameters cross the boundary as a JSON object string, so non-scalar
//!   values are rejected by the core at the point they are set.
//! - The C caller owns all returned pointers and must call the matching
//!   `ws_*_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use webservice_core::{headers, Request, WebService, WebServiceConfig};

use types::*;

/// Borrow a C string as UTF-8.
///
/// # Safety
/// `ptr` must be null or point at a NUL-terminated string that outlives `'a`.
unsafe fn c_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiErrorCode> {
    if ptr.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiErrorCode::InvalidUtf8)
}

// ---------------------------------------------------------------------------
// Web service lifecycle
// ---------------------------------------------------------------------------

/// Create a `WebService` bound to `base_url`.
///
/// Returns null if `base_url` is null, not UTF-8, or not an absolute URL.
/// The caller must free the returned pointer with `ws_service_free`.
#[unsafe(no_mangle)]
pub extern "C" fn ws_service_new(base_url: *const c_char) -> *mut FfiWebService {
    catch_unwind(move || {
        let Ok(url) = (unsafe { c_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        match WebService::new(url) {
            Ok(inner) => Box::into_raw(Box::new(FfiWebService { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a `WebService` from a JSON configuration string.
///
/// Returns null if the configuration cannot be parsed or its base URL is
/// invalid.
#[unsafe(no_mangle)]
pub extern "C" fn ws_service_from_config_json(config_json: *const c_char) -> *mut FfiWebService {
    catch_unwind(move || {
        let Ok(raw) = (unsafe { c_str(config_json) }) else {
            return std::ptr::null_mut();
        };
        let service = WebServiceConfig::from_json_str(raw).and_then(|c| WebService::from_config(&c));
        match service {
            Ok(inner) => Box::into_raw(Box::new(FfiWebService { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `WebService` created by `ws_service_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ws_service_free(service: *mut FfiWebService) {
    if !service.is_null() {
        let _ = catch_unwind(move || {
            drop(unsafe { Box::from_raw(service) });
        });
    }
}

/// Start a request for `path` relative to the service base URL.
///
/// `method` is an `FfiHttpMethod` value. Returns null on a null argument,
/// an unknown method, or a path that does not resolve to a valid URL.
#[unsafe(no_mangle)]
pub extern "C" fn ws_service_request(
    service: *const FfiWebService,
    method: u32,
    path: *const c_char,
) -> *mut FfiRequest {
    catch_unwind(move || {
        if service.is_null() {
            return std::ptr::null_mut();
        }
        let service = unsafe { &*service };
        let (Some(method), Ok(path)) = (types::method_from_raw(method), unsafe { c_str(path) }) else {
            return std::ptr::null_mut();
        };
        match service.inner.request(method, path) {
            Ok(inner) => Box::into_raw(Box::new(FfiRequest { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Request lifecycle
// ---------------------------------------------------------------------------

/// Create a request for an absolute `url`.
///
/// Returns null on a null argument, an unknown method or an invalid URL.
/// The caller must free the returned pointer with `ws_request_free`.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_new(method: u32, url: *const c_char) -> *mut FfiRequest {
    catch_unwind(move || {
        let (Some(method), Ok(url)) = (types::method_from_raw(method), unsafe { c_str(url) }) else {
            return std::ptr::null_mut();
        };
        match Request::new(method, url) {
            Ok(inner) => Box::into_raw(Box::new(FfiRequest { inner })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a request created by `ws_request_new` or `ws_service_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_free(request: *mut FfiRequest) {
    if !request.is_null() {
        let _ = catch_unwind(move || {
            drop(unsafe { Box::from_raw(request) });
        });
    }
}

/// Run `f` against a request handle, mapping null pointers and panics to
/// error codes.
fn with_request(
    request: *mut FfiRequest,
    f: impl FnOnce(&mut Request) -> Result<(), FfiErrorCode> + std::panic::UnwindSafe,
) -> FfiErrorCode {
    if request.is_null() {
        return FfiErrorCode::NullArg;
    }
    catch_unwind(move || {
        let request = unsafe { &mut *request };
        match f(&mut request.inner) {
            Ok(()) => FfiErrorCode::Ok,
            Err(code) => code,
        }
    })
    .unwrap_or(FfiErrorCode::Panic)
}

// ---------------------------------------------------------------------------
// Setters
// ---------------------------------------------------------------------------

/// Reject a header the core would refuse at finalize, so the caller hears
/// about it from the setter that introduced it.
fn checked_header(name: &str, value: &str) -> Result<(), FfiErrorCode> {
    headers::validate(name, value).map_err(|e| FfiErrorCode::from(&e))
}

/// Set a header, replacing any existing header with the same name in any case.
///
/// Returns `InvalidHeader` and leaves the request unchanged if the name is
/// not a valid token or the value contains control characters such as CR/LF.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_set_header(
    request: *mut FfiRequest,
    name: *const c_char,
    value: *const c_char,
) -> FfiErrorCode {
    with_request(request, move |req| {
        let name = unsafe { c_str(name) }?;
        let value = unsafe { c_str(value) }?;
        checked_header(name, value)?;
        req.headers.set(name, value);
        Ok(())
    })
}

/// Set the `Content-Type` header. An explicit value always wins over the
/// content-type implied by parameter encoding.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_set_content_type(
    request: *mut FfiRequest,
    value: *const c_char,
) -> FfiErrorCode {
    with_request(request, move |req| {
        let value = unsafe { c_str(value) }?;
        checked_header(headers::CONTENT_TYPE, value)?;
        req.set_content_type(value);
        Ok(())
    })
}

/// Set the `User-Agent` header.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_set_user_agent(
    request: *mut FfiRequest,
    value: *const c_char,
) -> FfiErrorCode {
    with_request(request, move |req| {
        let value = unsafe { c_str(value) }?;
        checked_header(headers::USER_AGENT, value)?;
        req.set_user_agent(value);
        Ok(())
    })
}

/// Replace the parameters with the entries of a JSON object string.
///
/// Values must be strings, integers or booleans. On error the previous
/// parameters are kept.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_set_parameters_json(
    request: *mut FfiRequest,
    json: *const c_char,
) -> FfiErrorCode {
    with_request(request, move |req| {
        let raw = unsafe { c_str(json) }?;
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| FfiErrorCode::InvalidParameters)?;
        req.set_json_parameters(value)
            .map_err(|e| FfiErrorCode::from(&e))
    })
}

/// Select the parameter encoding. `encoding` is an `FfiParameterEncoding` value.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_set_parameter_encoding(
    request: *mut FfiRequest,
    encoding: u32,
) -> FfiErrorCode {
    with_request(request, move |req| {
        req.parameter_encoding = types::encoding_from_raw(encoding).ok_or(FfiErrorCode::InvalidEnum)?;
        Ok(())
    })
}

/// Set a raw body that replaces any parameter-derived body.
///
/// The bytes are copied. `data` may be null only when `len` is zero.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_set_body(
    request: *mut FfiRequest,
    data: *const u8,
    len: usize,
) -> FfiErrorCode {
    with_request(request, move |req| {
        if data.is_null() {
            if len != 0 {
                return Err(FfiErrorCode::NullArg);
            }
            req.set_body(Vec::new());
        } else {
            req.set_body(unsafe { std::slice::from_raw_parts(data, len) });
        }
        Ok(())
    })
}

/// Drop the raw body so parameters are encoded into the body again.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_clear_body(request: *mut FfiRequest) -> FfiErrorCode {
    with_request(request, |req| {
        req.clear_body();
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Finalize
// ---------------------------------------------------------------------------

/// Finalize a request into method, URL, headers and body.
///
/// The request handle stays valid and may be finalized again. The caller
/// must free the result with `ws_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn ws_request_finalize(request: *const FfiRequest) -> *mut FfiFinalizeResult {
    catch_unwind(move || {
        if request.is_null() {
            return FfiFinalizeResult::error(FfiErrorCode::NullArg, "null argument: request");
        }
        let request = unsafe { &*request };
        match request.inner.finalize() {
            Ok(req) => match FfiHttpRequest::from_core(req) {
                Ok(ptr) => FfiFinalizeResult::ok(ptr),
                Err(code) => FfiFinalizeResult::error(code, "header or URL contains a NUL byte"),
            },
            Err(e) => FfiFinalizeResult::from_error(&e),
        }
    })
    .unwrap_or_else(|_| FfiFinalizeResult::error(FfiErrorCode::Panic, "panic in ws_request_finalize"))
}

/// Free an `FfiFinalizeResult` and the request it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn ws_free_result(result: *mut FfiFinalizeResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(move || {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(result.error_message) });
        }
        if !result.request.is_null() {
            unsafe { FfiHttpRequest::free(result.request) };
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
