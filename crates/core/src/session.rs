//! Authentication and session handling
//!
//! One credential exchange against the auth endpoint yields a [`Session`]:
//! the storage endpoint plus the token every later request carries.

use url::Url;

use crate::error::{Error, Result};
use crate::headers;
use crate::http::{Executor, Request};

/// Tracing target for authentication.
pub const TRACING_TARGET: &str = "swc_core::session";

/// Account credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    key: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            key: key.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Storage endpoint and auth token from a successful authentication
///
/// Immutable once created. Expiry is not tracked: a stale token makes
/// subsequent calls fail with the service's status.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    storage_url: Url,
    token: String,
}

impl Session {
    /// Create a session. The storage URL is normalized to end with `/`.
    pub fn new(mut storage_url: Url, token: impl Into<String>) -> Self {
        if !storage_url.path().ends_with('/') {
            let path = format!("{}/", storage_url.path());
            storage_url.set_path(&path);
        }
        Self {
            storage_url,
            token: token.into(),
        }
    }

    pub fn storage_url(&self) -> &Url {
        &self.storage_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Attach the auth token header to a request
    pub fn authorize(&self, request: Request) -> Request {
        request.with_header(headers::AUTH_TOKEN, self.token.as_str())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("storage_url", &self.storage_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Exchange credentials for a session.
///
/// # Errors
///
/// - [`Error::AuthenticationFailed`] when the endpoint answers 403
/// - [`Error::ConnectionFailed`] for any other status than 204
/// - [`Error::MalformedResponse`] when the storage headers are missing
pub fn authenticate(executor: &Executor, auth_url: &Url, credentials: &Credentials) -> Result<Session> {
    let host = match (auth_url.host_str(), auth_url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => {
            return Err(Error::Config(format!("Auth URL '{auth_url}' has no host")));
        }
    };

    tracing::debug!(
        target: TRACING_TARGET,
        %host,
        user = credentials.user(),
        "Authenticating"
    );

    let request = Request::get(auth_url.clone())
        .with_header("Host", host)
        .with_header(headers::AUTH_USER, credentials.user())
        .with_header(headers::AUTH_KEY, credentials.key());

    let response = executor.execute(request)?;

    match response.status() {
        204 => {}
        403 => {
            return Err(Error::AuthenticationFailed(format!(
                "credentials for user '{}' were rejected",
                credentials.user()
            )));
        }
        status => {
            return Err(Error::ConnectionFailed {
                status,
                message: format!("unexpected response from auth endpoint {auth_url}"),
            });
        }
    }

    let storage_url = response.header(headers::STORAGE_URL).ok_or_else(|| {
        Error::MalformedResponse(format!("auth response lacks {}", headers::STORAGE_URL))
    })?;
    let token = response.header(headers::STORAGE_TOKEN).ok_or_else(|| {
        Error::MalformedResponse(format!("auth response lacks {}", headers::STORAGE_TOKEN))
    })?;

    let session = Session::new(Url::parse(storage_url)?, token);

    tracing::debug!(
        target: TRACING_TARGET,
        storage_url = %session.storage_url(),
        "Authenticated"
    );

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockTransport, RawResponse};

    fn auth_url() -> Url {
        Url::parse("https://auth.example.com/").unwrap()
    }

    fn executor_replying(message: &'static str) -> Executor {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(move |_| Ok(RawResponse::new(message)));
        Executor::new(transport)
    }

    #[test]
    fn test_authenticate_success() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.header("Host") == Some("auth.example.com")
                    && req.header("X-Auth-User") == Some("12345")
                    && req.header("X-Auth-Key") == Some("secret")
                    && req.header("X-Auth-Token").is_none()
                    && req.payload().is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(RawResponse::new(
                    "HTTP/1.1 204 No Content\r\nX-Storage-Url: https://12345.selcdn.ru/\r\nX-Storage-Token: tok-abc\r\n\r\n",
                ))
            });

        let session = authenticate(
            &Executor::new(transport),
            &auth_url(),
            &Credentials::new("12345", "secret"),
        )
        .unwrap();

        assert_eq!(session.storage_url().as_str(), "https://12345.selcdn.ru/");
        assert_eq!(session.token(), "tok-abc");
    }

    #[test]
    fn test_authenticate_forbidden() {
        let executor = executor_replying("HTTP/1.1 403 Forbidden\r\n\r\n");
        let result = authenticate(&executor, &auth_url(), &Credentials::new("u", "wrong"));
        assert!(matches!(result, Err(Error::AuthenticationFailed(_))));
    }

    #[test]
    fn test_authenticate_unexpected_status() {
        let executor = executor_replying("HTTP/1.1 500 Internal Server Error\r\n\r\n");
        let result = authenticate(&executor, &auth_url(), &Credentials::new("u", "k"));
        assert!(matches!(
            result,
            Err(Error::ConnectionFailed { status: 500, .. })
        ));
    }

    #[test]
    fn test_authenticate_missing_token() {
        let executor =
            executor_replying("HTTP/1.1 204 No Content\r\nX-Storage-Url: https://s.example.com/\r\n\r\n");
        let result = authenticate(&executor, &auth_url(), &Credentials::new("u", "k"));
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_host_header_keeps_port() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.header("Host") == Some("127.0.0.1:8080"))
            .returning(|_| Ok(RawResponse::new("HTTP/1.1 403 Forbidden\r\n\r\n")));

        let url = Url::parse("http://127.0.0.1:8080/auth/v1.0").unwrap();
        let result = authenticate(&Executor::new(transport), &url, &Credentials::new("u", "k"));
        assert!(matches!(result, Err(Error::AuthenticationFailed(_))));
    }

    #[test]
    fn test_session_normalizes_trailing_slash() {
        let session = Session::new(Url::parse("https://s.example.com/v1/AUTH_x").unwrap(), "t");
        assert_eq!(session.storage_url().path(), "/v1/AUTH_x/");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let session = Session::new(Url::parse("https://s.example.com/").unwrap(), "tok-secret");
        assert!(!format!("{session:?}").contains("tok-secret"));

        let credentials = Credentials::new("user", "key-secret");
        assert!(!format!("{credentials:?}").contains("key-secret"));
    }

    #[test]
    fn test_authorize_adds_token() {
        let session = Session::new(Url::parse("https://s.example.com/").unwrap(), "tok");
        let request = session.authorize(Request::get(session.storage_url().clone()));
        assert_eq!(request.header("x-auth-token"), Some("tok"));
    }
}
