//! Blocking HTTP client that buffers whole responses.
//!
//! # Design
//! `HttpClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each verb is split into a `build_*` method producing an
//! `HttpRequest` and `execute`, which performs the round trip. A fresh ureq
//! agent is created per call, so concurrent callers share nothing.

use tracing::{debug, trace, warn};
use ureq::{Agent, Body, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::HttpError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Synchronous client for one-shot GET, POST and PUT calls.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_get(&self, url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: self.default_headers(),
            body: None,
        }
    }

    pub fn build_post(&self, url: &str, body: &[u8]) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: self.default_headers(),
            body: Some(body.to_vec()),
        }
    }

    pub fn build_put(&self, url: &str, body: &[u8]) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            url: url.to_string(),
            headers: self.default_headers(),
            body: Some(body.to_vec()),
        }
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.execute(&self.build_get(url))
    }

    pub fn post(&self, url: &str, body: &[u8]) -> Result<HttpResponse, HttpError> {
        self.execute(&self.build_post(url, body))
    }

    pub fn put(&self, url: &str, body: &[u8]) -> Result<HttpResponse, HttpError> {
        self.execute(&self.build_put(url, body))
    }

    /// Run `request` to completion and return the fully read response.
    ///
    /// Blocks until the body has been read, the configured timeout elapses,
    /// or the transport fails. Any status code, including 4xx and 5xx, is a
    /// successful call.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        // Status codes are data here, not errors.
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(self.config.timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();

        let body = request.body.as_deref().unwrap_or_default();
        let result = match request.method {
            HttpMethod::Get => with_headers(agent.get(&request.url), &request.headers).call(),
            HttpMethod::Post => with_headers(agent.post(&request.url), &request.headers).send(body),
            HttpMethod::Put => with_headers(agent.put(&request.url), &request.headers).send(body),
        };
        let response = result.map_err(HttpError::from_send)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();

        let mut stream = ResponseStream::new(response.into_body(), &request.url);
        let body = stream.read_all(self.config.max_body_bytes)?;
        drop(stream);

        debug!(status, bytes = body.len(), url = %request.url, "request completed");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![("content-type".to_string(), self.config.content_type.clone())]
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Owns the response body until the call returns.
///
/// Dropping it releases the underlying connection on every exit path. A
/// stream dropped before it was read to the end (body read error, size
/// limit) is logged; the call's result is already decided by then.
struct ResponseStream<'a> {
    body: Body,
    url: &'a str,
    drained: bool,
}

impl<'a> ResponseStream<'a> {
    fn new(body: Body, url: &'a str) -> Self {
        Self {
            body,
            url,
            drained: false,
        }
    }

    fn read_all(&mut self, limit: u64) -> Result<Vec<u8>, HttpError> {
        let bytes = self
            .body
            .with_config()
            .limit(limit)
            .read_to_vec()
            .map_err(HttpError::from_body_read)?;
        self.drained = true;
        Ok(bytes)
    }
}

impl Drop for ResponseStream<'_> {
    fn drop(&mut self) {
        if self.drained {
            trace!(url = %self.url, "response stream released");
        } else {
            warn!(url = %self.url, "response stream released before it was fully read");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client() -> HttpClient {
        HttpClient::default()
    }

    #[test]
    fn build_get_has_json_header_and_no_body() {
        let req = client().build_get("http://example.test/ok");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://example.test/ok");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_post_copies_body_verbatim() {
        let payload = b"not json at all \x00\xff";
        let req = client().build_post("http://example.test/echo", payload);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(&payload[..]));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn build_put_uses_put_method() {
        let req = client().build_put("http://example.test/echo", b"{}");
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn build_post_with_empty_body_keeps_empty_entity() {
        let req = client().build_post("http://example.test/echo", b"");
        assert_eq!(req.body, Some(Vec::new()));
    }

    #[test]
    fn configured_content_type_is_used() {
        let client = HttpClient::new(ClientConfig::default().with_content_type("text/plain"));
        let req = client.build_get("http://example.test/");
        assert_eq!(req.headers[0].1, "text/plain");
    }

    #[test]
    fn url_is_passed_through_untouched() {
        let req = client().build_get("http://example.test/a/?q=1");
        assert_eq!(req.url, "http://example.test/a/?q=1");
    }

    #[test]
    fn config_accessor_reflects_construction() {
        let client = HttpClient::new(ClientConfig::default().with_timeout(Duration::from_secs(3)));
        assert_eq!(client.config().timeout, Duration::from_secs(3));
    }
}
