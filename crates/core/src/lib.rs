//! swc-core: Core library for the swc Swift storage client
//!
//! This crate provides:
//! - Configuration and profile management
//! - Path parsing
//! - The HTTP core: per-call requests, raw response parsing and the
//!   [`Transport`] seam
//! - Authentication, the container catalog and per-container object operations
//!
//! It does not depend on any HTTP library; `swc-http` supplies the transport.

pub mod catalog;
pub mod config;
pub mod container;
pub mod error;
pub mod headers;
pub mod http;
pub mod path;
pub mod profile;
pub mod session;
pub mod traits;
pub mod types;

pub use catalog::{ContainerCatalog, DEFAULT_CONTAINER_LIMIT};
pub use config::{Config, ConfigManager};
pub use container::ContainerHandle;
pub use error::{Error, Result};
pub use http::{Executor, Method, Payload, Request, Response, TransportInfo};
pub use path::{ParsedPath, RemotePath, RemoteTarget, parse_path, parse_remote};
pub use profile::{DEFAULT_AUTH_URL, Profile, ProfileManager, TimeoutConfig};
pub use session::{Credentials, Session, authenticate};
pub use traits::{RawResponse, Transport};
pub use types::{
    ContainerInfo, ContainerType, DEFAULT_OBJECT_LIMIT, DeleteOutcome, ListOptions, ObjectInfo,
    ObjectListing, UploadResult,
};
