//! Error types for the HTTP helpers.
//!
//! # Design
//! Every failure ends the call: no partial body or status is ever returned
//! alongside an error. Variants follow the stage that failed (building the
//! request, the network round trip, reading the body) with timeouts split out
//! because callers commonly retry those. Problems releasing the response
//! stream are logged by the client and never become an `HttpError`.

use std::io;

use thiserror::Error;

/// Errors returned by `HttpClient` and the `get`/`post`/`put` helpers.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The URL or a header could not be turned into a valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No response was obtained: connection refused, DNS failure, TLS
    /// failure and the like.
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured total-call timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body could not be read to the end.
    #[error("failed to read response body: {0}")]
    BodyRead(String),
}

/// Field-less discriminant of `HttpError`, used where only the category
/// matters (e.g. C error codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Transport,
    Timeout,
    BodyRead,
}

impl HttpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HttpError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            HttpError::Transport(_) => ErrorKind::Transport,
            HttpError::Timeout(_) => ErrorKind::Timeout,
            HttpError::BodyRead(_) => ErrorKind::BodyRead,
        }
    }

    /// Classify an error raised while sending the request and waiting for
    /// the response head.
    pub(crate) fn from_send(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(t) => HttpError::Timeout(t.to_string()),
            ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
                HttpError::Timeout(e.to_string())
            }
            e @ (ureq::Error::Http(_) | ureq::Error::BadUri(_)) => {
                HttpError::InvalidRequest(e.to_string())
            }
            e => HttpError::Transport(e.to_string()),
        }
    }

    /// Classify an error raised while draining the response body.
    pub(crate) fn from_body_read(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(t) => HttpError::Timeout(t.to_string()),
            ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
                HttpError::Timeout(e.to_string())
            }
            e => HttpError::BodyRead(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_refused_is_transport() {
        let err = HttpError::from_send(ureq::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn io_timeout_is_timeout_in_both_stages() {
        let send = HttpError::from_send(ureq::Error::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "slow",
        )));
        let read = HttpError::from_body_read(ureq::Error::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "slow",
        )));
        assert_eq!(send.kind(), ErrorKind::Timeout);
        assert_eq!(read.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn bad_uri_is_invalid_request() {
        let err = HttpError::from_send(ureq::Error::BadUri("no scheme".to_string()));
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn truncated_body_is_body_read() {
        let err = HttpError::from_body_read(ureq::Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "closed early",
        )));
        assert_eq!(err.kind(), ErrorKind::BodyRead);
        assert!(err.to_string().starts_with("failed to read response body"));
    }

    #[test]
    fn body_limit_is_body_read() {
        let err = HttpError::from_body_read(ureq::Error::BodyExceedsLimit(16));
        assert_eq!(err.kind(), ErrorKind::BodyRead);
    }
}
