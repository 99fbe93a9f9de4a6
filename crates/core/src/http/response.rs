//! Raw HTTP response parsing
//!
//! Transports hand back the response exactly as it came off the wire: status
//! line, CRLF-separated headers, a blank line, then the body. [`Response::parse`]
//! turns that into status, headers and body.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Response headers keyed by lower-cased name
pub type Headers = BTreeMap<String, String>;

const BOUNDARY: &[u8] = b"\r\n\r\n";

/// Low-level metrics reported by the transport for one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportInfo {
    /// Status code as seen by the transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// URL the request was finally sent to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_url: Option<String>,

    /// Negotiated protocol version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_version: Option<String>,

    /// Time from sending the request to reading the full body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<Duration>,
}

/// A parsed HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: Vec<u8>,
    info: TransportInfo,
}

impl Response {
    /// Parse a raw HTTP message.
    ///
    /// The first blank line separates headers from body; everything after it,
    /// later blank lines included, is body. Interim `1xx` header blocks that
    /// precede the final response are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedResponse`] when there is no blank-line boundary or the
    /// status line carries no numeric code.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut rest = raw;
        loop {
            let split = find(rest, BOUNDARY).ok_or_else(|| {
                Error::MalformedResponse("no blank line between headers and body".into())
            })?;
            let head = String::from_utf8_lossy(&rest[..split]);
            let body = &rest[split + BOUNDARY.len()..];

            let mut lines = head.split("\r\n");
            let status = parse_status_line(lines.next().unwrap_or_default())?;

            if (100..200).contains(&status) && body.starts_with(b"HTTP/") && find(body, BOUNDARY).is_some() {
                rest = body;
                continue;
            }

            let mut headers = Headers::new();
            for (name, value) in lines.filter_map(parse_header_line) {
                headers.insert(name, value.to_string());
            }

            return Ok(Self {
                status,
                headers,
                body: body.to_vec(),
                info: TransportInfo::default(),
            });
        }
    }

    /// Attach transport metrics
    pub fn with_info(mut self, info: TransportInfo) -> Self {
        self.info = info;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// All headers whose name starts with `prefix` (case-insensitive)
    pub fn headers_with_prefix(&self, prefix: &str) -> Headers {
        let prefix = prefix.to_ascii_lowercase();
        self.headers
            .iter()
            .filter(|(name, _)| name.starts_with(&prefix))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn info(&self) -> &TransportInfo {
        &self.info
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// `HTTP/1.1 204 No Content` -> 204
fn parse_status_line(line: &str) -> Result<u16> {
    let trimmed = line.trim();
    let rest = if trimmed.starts_with("HTTP/") {
        trimmed
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest)
    } else {
        trimmed
    };

    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    digits
        .parse()
        .map_err(|_| Error::MalformedResponse(format!("invalid status line: {line:?}")))
}

/// `Name: value` with a name of letters and hyphens
fn parse_header_line(line: &str) -> Option<(String, &str)> {
    let (name, value) = line.split_once(':')?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-') {
        return None;
    }
    Some((name.to_ascii_lowercase(), value.trim()))
}
