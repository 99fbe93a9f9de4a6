//! Error types for swc-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for swc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for swc-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Profile already exists
    #[error("Profile already exists: {0}")]
    ProfileExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, TLS or timeout failure below the HTTP layer
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The raw HTTP message could not be parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The auth endpoint rejected the credentials (403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The service answered with a status the operation does not accept
    #[error("Connection failed with status {status}: {message}")]
    ConnectionFailed { status: u16, message: String },

    /// Upload was rejected
    #[error("Failed to upload '{name}' (status {status})")]
    UploadFailed { status: u16, name: String },

    /// Upload was rejected because the supplied ETag did not match (422)
    #[error("Integrity check failed for '{name}': ETag does not match uploaded data")]
    IntegrityCheckFailed { name: String },

    /// Server-side copy was rejected
    #[error("Failed to copy '{source_name}' to '{destination}' (status {status})")]
    CopyFailed {
        status: u16,
        source_name: String,
        destination: String,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Build a transport error that keeps the underlying cause
    pub fn transport(err: impl Into<BoxError>) -> Self {
        let source = err.into();
        Error::Transport {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Status code reported by the service, if the error carries one
    pub const fn status(&self) -> Option<u16> {
        match self {
            Error::ConnectionFailed { status, .. }
            | Error::UploadFailed { status, .. }
            | Error::CopyFailed { status, .. } => Some(*status),
            Error::IntegrityCheckFailed { .. } => Some(422),
            _ => None,
        }
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::Config(_) => 2, // UsageError
            Error::Transport { .. } => 3,                  // NetworkError
            Error::AuthenticationFailed(_) => 4,           // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            Error::ProfileExists(_) | Error::IntegrityCheckFailed { .. } => 6, // Conflict
            _ => 1,                                        // GeneralError
        }
    }
}
