//! Per-call request value
//!
//! A [`Request`] is built fresh for every call and consumed by
//! [`Executor::execute`](super::Executor::execute). Nothing survives between
//! calls, so the executor can be shared freely.

use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;

use url::Url;

use crate::error::{Error, Result};

/// HTTP method of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    /// Swift server-side copy
    Copy,
    /// Any other verb, sent literally
    Other(String),
}

impl Method {
    /// The verb as sent on the request line
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Copy => "COPY",
            Method::Other(verb) => verb,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body source with its exact byte length
pub struct Payload {
    reader: Box<dyn Read + Send>,
    length: u64,
}

impl Payload {
    /// Wrap a reader that yields exactly `length` bytes
    pub fn new(reader: impl Read + Send + 'static, length: u64) -> Self {
        Self {
            reader: Box::new(reader),
            length,
        }
    }

    /// Payload backed by an in-memory buffer
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let length = bytes.len() as u64;
        Self::new(Cursor::new(bytes), length)
    }

    /// Payload streamed from a local file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let length = file.metadata()?.len();
        Ok(Self::new(file, length))
    }

    /// Zero-length payload
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Number of bytes the reader will yield
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Split into the reader and its length
    pub fn into_inner(self) -> (Box<dyn Read + Send>, u64) {
        (self.reader, self.length)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Encoded body of a prepared request
#[derive(Debug)]
pub enum Body {
    Empty,
    /// `application/x-www-form-urlencoded` parameters
    Form(String),
    Payload(Payload),
}

/// A request after method-specific parameter encoding
#[derive(Debug)]
pub struct RequestParts {
    pub method: Method,
    pub url: Url,
    /// Headers to send, in order. Suppressed (empty) entries are already removed.
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

/// A single HTTP call against the storage service
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
    payload: Option<Payload>,
}

impl Request {
    /// Create a request. The header list starts with an empty `Expect`
    /// entry so no `100-continue` handshake is ever requested.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: vec![("Expect".to_string(), String::new())],
            params: Vec::new(),
            payload: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn head(url: Url) -> Self {
        Self::new(Method::Head, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Append a header. Later entries win over earlier ones with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append several headers in order
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a query or form parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Add a parameter only when a value is present
    pub fn with_optional_param(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with_param(name, value),
            None => self,
        }
    }

    /// Attach a request body
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Effective value of a header (case-insensitive, last entry wins)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Encode parameters according to the method and produce what goes on the wire.
    ///
    /// GET, HEAD and PUT carry parameters in the query string, POST as a form
    /// body. Other verbs get no automatic parameter encoding. A PUT without a
    /// payload sends an empty body.
    pub fn into_parts(self) -> RequestParts {
        let Request {
            method,
            mut url,
            headers,
            params,
            payload,
        } = self;

        let body = match method {
            Method::Get | Method::Head => {
                append_query(&mut url, &params);
                Body::Empty
            }
            Method::Put => {
                append_query(&mut url, &params);
                Body::Payload(payload.unwrap_or_else(Payload::empty))
            }
            Method::Post if !params.is_empty() => {
                let form = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&params)
                    .finish();
                Body::Form(form)
            }
            _ => {
                if !params.is_empty() {
                    tracing::debug!(%method, "Ignoring parameters for method without parameter encoding");
                }
                payload.map_or(Body::Empty, Body::Payload)
            }
        };

        let headers = headers.into_iter().filter(|(_, v)| !v.is_empty()).collect();

        RequestParts {
            method,
            url,
            headers,
            body,
        }
    }
}

fn append_query(url: &mut Url, params: &[(String, String)]) {
    if params.is_empty() {
        return;
    }
    url.query_pairs_mut().extend_pairs(params);
}

/// Append a path (which may contain `/`) to a base URL, percent-encoding each segment
pub(crate) fn join_path(base: &Url, path: &str, trailing_slash: bool) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::InvalidPath(format!("Cannot append a path to '{base}'")))?;
        segments.pop_if_empty();
        segments.extend(path.split('/'));
        if trailing_slash && !path.ends_with('/') {
            segments.push("");
        }
    }
    Ok(url)
}
