//! Blocking JSON-flavoured HTTP helpers.
//!
//! # Overview
//! Three one-shot operations, [`get`], [`post`] and [`put`], each performing
//! a single synchronous round trip with a 60 second total timeout and a
//! `Content-Type: application/json` header, and returning the whole response
//! body in memory together with the status and headers.
//!
//! # Design
//! - `HttpClient` is stateless apart from its `ClientConfig`; the free
//!   functions use `ClientConfig::default()`.
//! - Request bodies are forwarded as raw bytes; nothing is serialized or
//!   validated.
//! - All three verbs return the same `HttpResponse`, so PUT callers get the
//!   same status and headers as everyone else.
//! - Non-2xx statuses are returned as data. Only failures to obtain a
//!   complete response are errors.

pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::{ErrorKind, HttpError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};

/// GET `url` with the default configuration.
pub fn get(url: &str) -> Result<HttpResponse, HttpError> {
    HttpClient::default().get(url)
}

/// POST `body` verbatim to `url` with the default configuration.
pub fn post(url: &str, body: &[u8]) -> Result<HttpResponse, HttpError> {
    HttpClient::default().post(url, body)
}

/// PUT `body` verbatim to `url` with the default configuration.
pub fn put(url: &str, body: &[u8]) -> Result<HttpResponse, HttpError> {
    HttpClient::default().put(url, body)
}

/// Log a fixed greeting. Lets foreign hosts check that the library loaded
/// and that logging is wired up.
pub fn hello() {
    tracing::info!("Exported Hello");
}
