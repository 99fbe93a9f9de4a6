//! Transport trait definition
//!
//! This trait defines the seam between the storage client and the HTTP
//! library that carries its requests. It allows the core to be decoupled
//! from any specific client implementation and mocked in tests.

use crate::error::Result;
use crate::http::{Request, TransportInfo};

/// A response exactly as delivered by the transport
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// Status line, headers, blank line and body, CRLF separated
    pub message: Vec<u8>,

    /// Metrics collected while performing the call
    pub info: TransportInfo,
}

impl RawResponse {
    /// Raw message without transport metrics
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
            info: TransportInfo::default(),
        }
    }
}

/// Carries one request to the service and returns the raw reply
///
/// Implementations block until the full response has been read or a
/// timeout fires. Connection, TLS and timeout failures are reported as
/// [`Error::Transport`](crate::Error::Transport) and are never retried.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Send the request and return the complete raw response
    fn send(&self, request: Request) -> Result<RawResponse>;
}
