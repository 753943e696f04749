//! C-ABI wrapper around `easyhttp-core`.
//!
//! # Overview
//! Exposes the blocking GET/POST/PUT helpers through `extern "C"` functions
//! so any language with a C FFI can make JSON HTTP calls without linking to
//! Rust directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One `FfiHttpResult` envelope carries status, headers and body on
//!   success, or an error code and message on failure, for all three verbs.
//! - The C caller owns all returned pointers and must call
//!   `easyhttp_free_result` to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use types::*;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Install a stderr log subscriber filtered by `RUST_LOG`, or at info level
/// when `RUST_LOG` is unset.
///
/// Returns false if a subscriber was already installed. Safe to call more
/// than once.
#[unsafe(no_mangle)]
pub extern "C" fn easyhttp_init_logging() -> bool {
    catch_unwind(|| {
        let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
        tracing_subscriber::fmt()
            .with_env_filter(log_filter(&directives))
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

/// Log a fixed greeting; confirms the library is loaded.
#[unsafe(no_mangle)]
pub extern "C" fn easyhttp_hello() {
    let _ = catch_unwind(easyhttp_core::hello);
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Borrow a caller-supplied URL, or describe why it cannot be used.
fn url_arg<'a>(url: *const c_char) -> Result<&'a str, *mut FfiHttpResult> {
    if url.is_null() {
        warn!("rejected null url");
        return Err(FfiHttpResult::null_arg("url"));
    }
    unsafe { CStr::from_ptr(url) }.to_str().map_err(|_| {
        warn!("rejected url that is not valid UTF-8");
        FfiHttpResult::failure(FfiErrorCode::InvalidRequest, "url is not valid UTF-8")
    })
}

/// Borrow a caller-supplied body. A null pointer is accepted only with a
/// zero length.
fn body_arg<'a>(body: *const u8, body_len: usize) -> Result<&'a [u8], *mut FfiHttpResult> {
    if body.is_null() {
        if body_len == 0 {
            return Ok(&[]);
        }
        warn!(body_len, "rejected null body with non-zero length");
        return Err(FfiHttpResult::null_arg("body"));
    }
    Ok(unsafe { std::slice::from_raw_parts(body, body_len) })
}

fn into_result(result: Result<easyhttp_core::HttpResponse, easyhttp_core::HttpError>) -> *mut FfiHttpResult {
    match result {
        Ok(resp) => FfiHttpResult::from_response(resp),
        Err(e) => FfiHttpResult::from_error(&e),
    }
}

/// Perform a blocking GET of `url`.
///
/// Never returns null. The caller must free the result with
/// `easyhttp_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn easyhttp_get(url: *const c_char) -> *mut FfiHttpResult {
    catch_unwind(|| {
        let url = match url_arg(url) {
            Ok(u) => u,
            Err(result) => return result,
        };
        into_result(easyhttp_core::get(url))
    })
    .unwrap_or_else(|_| FfiHttpResult::panic("panic in easyhttp_get"))
}

/// Perform a blocking POST of `body_len` bytes at `body` to `url`.
///
/// `body` may be null when `body_len` is 0.
#[unsafe(no_mangle)]
pub extern "C" fn easyhttp_post(
    url: *const c_char,
    body: *const u8,
    body_len: usize,
) -> *mut FfiHttpResult {
    catch_unwind(|| {
        let url = match url_arg(url) {
            Ok(u) => u,
            Err(result) => return result,
        };
        let body = match body_arg(body, body_len) {
            Ok(b) => b,
            Err(result) => return result,
        };
        into_result(easyhttp_core::post(url, body))
    })
    .unwrap_or_else(|_| FfiHttpResult::panic("panic in easyhttp_post"))
}

/// Perform a blocking PUT of `body_len` bytes at `body` to `url`.
///
/// The result carries the response headers as well as status and body.
#[unsafe(no_mangle)]
pub extern "C" fn easyhttp_put(
    url: *const c_char,
    body: *const u8,
    body_len: usize,
) -> *mut FfiHttpResult {
    catch_unwind(|| {
        let url = match url_arg(url) {
            Ok(u) => u,
            Err(result) => return result,
        };
        let body = match body_arg(body, body_len) {
            Ok(b) => b,
            Err(result) => return result,
        };
        into_result(easyhttp_core::put(url, body))
    })
    .unwrap_or_else(|_| FfiHttpResult::panic("panic in easyhttp_put"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpResult` returned by any request function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn easyhttp_free_result(result: *mut FfiHttpResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.headers.is_null() && result.headers_len > 0 {
            let headers = unsafe { from_raw_slice(result.headers, result.headers_len) };
            for h in headers.iter() {
                if !h.name.is_null() {
                    drop(unsafe { CString::from_raw(h.name) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
        if !result.body.is_null() && result.body_len > 0 {
            drop(unsafe { from_raw_slice(result.body, result.body_len) });
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
