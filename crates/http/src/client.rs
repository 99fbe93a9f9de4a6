//! Blocking reqwest transport
//!
//! reqwest hands back a structured response; the transport writes it back out
//! as a raw HTTP message so swc-core parses every reply the same way.

use std::time::Instant;

use reqwest::blocking::{Body as HttpBody, Client};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::redirect::Policy;
use reqwest::Version;
use swc_core::http::{Body, RequestParts};
use swc_core::{Error, RawResponse, Request, Result, Transport, TransportInfo};

use crate::config::TransportConfig;

/// Tracing target for transport operations.
pub const TRACING_TARGET: &str = "swc_http::client";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// [`Transport`] backed by a blocking reqwest client
///
/// Timeouts and TLS settings are fixed at construction. Redirects are not
/// followed and failed calls are not retried.
pub struct HttpTransport {
    http: Client,
    config: TransportConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialized.
    pub fn new(config: TransportConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            connect_timeout_ms = config.effective_connect_timeout().as_millis(),
            timeout_ms = config.effective_timeout().as_millis(),
            insecure = config.insecure,
            "Creating HTTP transport"
        );

        if config.insecure {
            tracing::warn!(
                target: TRACING_TARGET,
                "TLS certificate verification is disabled"
            );
        }

        let http = Client::builder()
            .connect_timeout(config.effective_connect_timeout())
            .timeout(config.effective_timeout())
            .danger_accept_invalid_certs(config.insecure)
            .redirect(Policy::none())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(Error::transport)?;

        Ok(Self { http, config })
    }

    /// Creates a transport with default timeouts and TLS verification on.
    pub fn with_defaults() -> Result<Self> {
        Self::new(TransportConfig::default())
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> Result<RawResponse> {
        let RequestParts {
            method,
            url,
            headers,
            body,
        } = request.into_parts();

        let verb = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .map_err(|e| Error::General(format!("Invalid HTTP method '{method}': {e}")))?;

        let mut builder = self.http.request(verb, url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            Body::Empty => builder,
            Body::Form(form) => builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(form),
            Body::Payload(payload) => {
                let (reader, length) = payload.into_inner();
                builder.body(HttpBody::sized(reader, length))
            }
        };

        let started = Instant::now();
        let response = builder.send().map_err(Error::transport)?;

        let status = response.status();
        let version = response.version();
        let effective_url = response.url().to_string();
        let response_headers = response.headers().clone();
        let content = response.bytes().map_err(Error::transport)?;
        let total_time = started.elapsed();

        tracing::trace!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            elapsed_ms = total_time.as_millis(),
            "Response read"
        );

        Ok(RawResponse {
            message: write_message(
                version,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &response_headers,
                &content,
            ),
            info: TransportInfo {
                status: Some(status.as_u16()),
                effective_url: Some(effective_url),
                http_version: Some(version_label(version)),
                total_time: Some(total_time),
            },
        })
    }
}

fn version_label(version: Version) -> String {
    format!("{version:?}")
}

/// Status line, headers, blank line, body
fn write_message(
    version: Version,
    status: u16,
    reason: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Vec<u8> {
    let mut message = format!("{} {status} {reason}\r\n", version_label(version)).into_bytes();
    for (name, value) in headers {
        message.extend_from_slice(name.as_str().as_bytes());
        message.extend_from_slice(b": ");
        message.extend_from_slice(value.as_bytes());
        message.extend_from_slice(b"\r\n");
    }
    message.extend_from_slice(b"\r\n");
    message.extend_from_slice(body);
    message
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use swc_core::Response;

    use super::*;

    #[test]
    fn test_write_message_layout() {
        let mut headers = HeaderMap::new();
        headers.insert("x-storage-url", HeaderValue::from_static("https://s.example.com/"));

        let message = write_message(Version::HTTP_11, 204, "No Content", &headers, b"");
        assert_eq!(
            message,
            b"HTTP/1.1 204 No Content\r\nx-storage-url: https://s.example.com/\r\n\r\n"
        );
    }

    #[test]
    fn test_written_message_parses() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("etag", HeaderValue::from_static("abc"));

        let message = write_message(Version::HTTP_2, 200, "OK", &headers, b"[]\r\n\r\n");
        let response = Response::parse(&message).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("ETag"), Some("abc"));
        assert_eq!(response.body(), b"[]\r\n\r\n");
    }

    #[test]
    fn test_missing_reason_phrase() {
        let message = write_message(Version::HTTP_11, 299, "", &HeaderMap::new(), b"x");
        let response = Response::parse(&message).unwrap();
        assert_eq!(response.status(), 299);
        assert_eq!(response.body(), b"x");
    }

    #[test]
    fn test_transport_builds_with_defaults() {
        let transport = HttpTransport::with_defaults().unwrap();
        assert!(!transport.config().insecure);
        assert!(format!("{transport:?}").contains("HttpTransport"));
    }
}
