//! Minimal HTTP layer
//!
//! Builds per-call [`Request`] values, sends them through a
//! [`Transport`](crate::traits::Transport) and parses the raw reply into a
//! [`Response`].

mod executor;
mod request;
mod response;

pub use executor::{Executor, TRACING_TARGET};
pub use request::{Body, Method, Payload, Request, RequestParts};
pub use response::{Headers, Response, TransportInfo};

pub(crate) use request::join_path;
