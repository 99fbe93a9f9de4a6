//! Request execution

use std::sync::Arc;

use crate::error::Result;
use crate::http::{Request, Response};
use crate::traits::Transport;

/// Tracing target for request execution.
pub const TRACING_TARGET: &str = "swc_core::http";

/// Sends requests through a [`Transport`] and parses the replies.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Share an existing transport
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send one request and parse the raw response.
    ///
    /// # Errors
    ///
    /// Transport failures are passed through unchanged; an unparsable reply
    /// yields [`Error::MalformedResponse`](crate::Error::MalformedResponse).
    /// Status codes are not interpreted here.
    pub fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(target: TRACING_TARGET, %method, %path, "Sending request");

        let raw = self.transport.send(request)?;
        let response = Response::parse(&raw.message)?.with_info(raw.info);

        tracing::debug!(
            target: TRACING_TARGET,
            %method,
            %path,
            status = response.status(),
            body_bytes = response.body().len(),
            "Received response"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::error::Error;
    use crate::http::{Method, TransportInfo};
    use crate::traits::{MockTransport, RawResponse};

    #[test]
    fn test_execute_parses_and_attaches_info() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method() == &Method::Get && req.url().path() == "/c/")
            .times(1)
            .returning(|_| {
                Ok(RawResponse {
                    message: b"HTTP/1.1 200 OK\r\nX-Trans-Id: tx\r\n\r\nbody".to_vec(),
                    info: TransportInfo {
                        status: Some(200),
                        effective_url: Some("https://s.example.com/c/".into()),
                        ..Default::default()
                    },
                })
            });

        let executor = Executor::new(transport);
        let response = executor
            .execute(Request::get(Url::parse("https://s.example.com/c/").unwrap()))
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), b"body");
        assert_eq!(response.info().status, Some(200));
        assert_eq!(
            response.info().effective_url.as_deref(),
            Some("https://s.example.com/c/")
        );
    }

    #[test]
    fn test_execute_passes_transport_error() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| {
            Err(Error::Transport {
                message: "connection refused".into(),
                source: None,
            })
        });

        let executor = Executor::new(transport);
        let result = executor.execute(Request::get(Url::parse("https://s.example.com/").unwrap()));
        assert!(matches!(result, Err(Error::Transport { .. })));
    }

    #[test]
    fn test_execute_reports_malformed() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(RawResponse::new("HTTP/1.1 200 OK\r\n")));

        let executor = Executor::new(transport);
        let result = executor.execute(Request::get(Url::parse("https://s.example.com/").unwrap()));
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }
}
