//! Logging around release of the response stream.
//!
//! A stream dropped before its body was read to the end must be reported at
//! warn level, while the error returned to the caller stays the body-read
//! failure that caused it.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, OnceLock};

use easyhttp_core::{ClientConfig, ErrorKind, HttpClient};

const EARLY_RELEASE: &str = "response stream released before it was fully read";

fn server() -> SocketAddr {
    static ADDR: OnceLock<SocketAddr> = OnceLock::new();
    *ADDR.get_or_init(|| mock_server::spawn().expect("failed to start mock server"))
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return its result plus every
/// line logged meanwhile.
fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&captured.0.lock().unwrap()).into_owned();
    (out, logs)
}

#[test]
fn over_limit_body_logs_early_release() {
    let client = HttpClient::new(ClientConfig::default().with_max_body_bytes(100));
    let url = format!("http://{}/bytes/1000", server());

    let (result, logs) = with_captured_logs(|| client.get(&url));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BodyRead);
    assert!(err.to_string().starts_with("failed to read response body"));
    let line = logs
        .lines()
        .find(|l| l.contains(EARLY_RELEASE))
        .expect("early release was not logged");
    assert!(line.contains("WARN"), "unexpected level: {line}");
}

#[test]
fn truncated_body_logs_early_release() {
    let addr = mock_server::spawn_raw(
        b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\nhello".to_vec(),
    )
    .unwrap();
    let url = format!("http://{addr}/");

    let (result, logs) = with_captured_logs(|| HttpClient::default().get(&url));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BodyRead);
    assert!(err.to_string().starts_with("failed to read response body"));
    assert!(logs.contains(EARLY_RELEASE), "logs were: {logs}");
}

#[test]
fn complete_body_logs_plain_release() {
    let url = format!("http://{}/ok", server());

    let (result, logs) = with_captured_logs(|| easyhttp_core::get(&url));

    assert_eq!(result.unwrap().status, 200);
    assert!(logs.contains("response stream released"), "logs were: {logs}");
    assert!(!logs.contains(EARLY_RELEASE), "logs were: {logs}");
    assert!(logs.contains("request completed"));
}
