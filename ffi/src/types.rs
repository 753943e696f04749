//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! `FfiHttpResult` mirrors `Result<HttpResponse, HttpError>` using
//! C-compatible representations: raw pointer + length pairs instead of
//! `Vec`, `*mut c_char` instead of `String`, and an error code enum with
//! explicit discriminants. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use easyhttp_core::{ErrorKind, HttpError, HttpResponse};

/// Error codes returned in `FfiHttpResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidRequest = 1,
    Transport = 2,
    Timeout = 3,
    BodyRead = 4,
    NullArg = 5,
    Panic = 6,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidRequest => FfiErrorCode::InvalidRequest,
            ErrorKind::Transport => FfiErrorCode::Transport,
            ErrorKind::Timeout => FfiErrorCode::Timeout,
            ErrorKind::BodyRead => FfiErrorCode::BodyRead,
        }
    }
}

/// A single response header as a name/value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

/// Result envelope for `easyhttp_get`, `easyhttp_post` and `easyhttp_put`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `status`,
/// `headers` and `body` describe the response. `body` is raw bytes (it may
/// contain NULs) and is null when `body_len` is 0.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `status` is 0 and `headers`/`body` are null.
#[repr(C)]
pub struct FfiHttpResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub status: u16,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpResult {
    /// Build a success result owning copies of the response parts.
    pub(crate) fn from_response(resp: HttpResponse) -> *mut Self {
        let headers: Vec<FfiHeader> = resp
            .headers
            .into_iter()
            .map(|(name, value)| FfiHeader {
                name: c_string(&name),
                value: c_bytes(&value),
            })
            .collect();
        let (headers, headers_len) = into_raw_slice(headers);
        let (body, body_len) = into_raw_slice(resp.body);

        Box::into_raw(Box::new(FfiHttpResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            status: resp.status,
            headers,
            headers_len,
            body,
            body_len,
        }))
    }

    pub(crate) fn from_error(err: &HttpError) -> *mut Self {
        Self::failure(err.kind().into(), &err.to_string())
    }

    /// Build an error result for a null or unusable argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    pub(crate) fn failure(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiHttpResult {
            error_code,
            error_message: c_string(msg),
            status: 0,
            headers: std::ptr::null_mut(),
            headers_len: 0,
            body: std::ptr::null_mut(),
            body_len: 0,
        }))
    }
}

/// Allocate a C string, dropping interior NULs rather than failing.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    c_bytes(s.as_bytes())
}

/// Like `c_string`, for byte strings that need not be UTF-8 (header values).
pub(crate) fn c_bytes(bytes: &[u8]) -> *mut c_char {
    let bytes: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Hand a `Vec` to C as pointer + length. Empty vectors become null.
fn into_raw_slice<T>(items: Vec<T>) -> (*mut T, usize) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len();
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Reclaim a slice produced by `into_raw_slice`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_slice` and not have been freed.
pub(crate) unsafe fn from_raw_slice<T>(ptr: *mut T, len: usize) -> Box<[T]> {
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)) }
}
