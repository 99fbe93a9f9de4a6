//! swc-http: reqwest transport for the swc client
//!
//! Implements the [`Transport`](swc_core::Transport) trait from swc-core with
//! a blocking reqwest client. It is the only crate that depends on an HTTP
//! library.

pub mod client;
pub mod config;

pub use client::HttpTransport;
pub use config::TransportConfig;
