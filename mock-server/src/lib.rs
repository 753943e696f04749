use std::{
    collections::BTreeMap,
    io::{Read, Write},
    net::SocketAddr,
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use tokio::net::TcpListener;

/// Body served by `GET /ok`.
pub const OK_BODY: &str = r#"{"k":"v"}"#;

/// Response header on `/echo` carrying the request's content type.
pub const ECHO_CONTENT_TYPE: &str = "x-echo-content-type";

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/echo", post(echo).put(echo))
        .route("/headers", any(request_headers))
        .route("/status/{code}", get(status))
        .route("/slow/{millis}", get(slow))
        .route("/bytes/{n}", get(bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Start the server on a random local port in a background thread and
/// return its address. The listener is bound before this returns, so
/// requests can be sent immediately.
pub fn spawn() -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run(listener).await
        })
    });

    Ok(addr)
}

/// Start a bare TCP server that answers every request with `response`
/// verbatim and then closes the connection.
///
/// Used for replies axum refuses to produce: a body shorter than its
/// `content-length`, header values that are not UTF-8.
pub fn spawn_raw(response: Vec<u8>) -> std::io::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            if read_request_head(&mut stream).is_err() {
                continue;
            }
            let _ = stream.write_all(&response);
            let _ = stream.flush();
        }
    });

    Ok(addr)
}

/// Consume bytes up to the blank line ending the request head.
fn read_request_head(stream: &mut std::net::TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(())
}

/// Deterministic payload served by `GET /bytes/{n}`.
pub fn payload(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

async fn ok() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        OK_BODY,
    )
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let status = if method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    (status, [(ECHO_CONTENT_TYPE, content_type)], body)
}

async fn request_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let map = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(map)
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn slow(Path(millis): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "slow"
}

async fn bytes(Path(n): Path<usize>) -> Vec<u8> {
    payload(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_has_requested_length() {
        assert_eq!(payload(0).len(), 0);
        assert_eq!(payload(1000).len(), 1000);
    }

    #[test]
    fn payload_wraps_below_byte_range() {
        let data = payload(300);
        assert_eq!(data[0], 0);
        assert_eq!(data[250], 250);
        assert_eq!(data[251], 0);
    }

    #[test]
    fn raw_server_replies_verbatim() {
        let addr = spawn_raw(b"HTTP/1.1 204 No Content\r\n\r\n".to_vec()).unwrap();
        let mut stream = std::net::TcpStream::connect(addr).unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\nhost: x\r\n\r\n").unwrap();
        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).unwrap();
        assert_eq!(reply, b"HTTP/1.1 204 No Content\r\n\r\n".to_vec());
    }

    #[test]
    fn ok_body_is_json() {
        let value: serde_json::Value = serde_json::from_str(OK_BODY).unwrap();
        assert_eq!(value["k"], "v");
    }
}
