//! Container catalog
//!
//! Account-level operations: list, select, create and delete containers.

use url::Url;

use crate::container::ContainerHandle;
use crate::error::{Error, Result};
use crate::headers;
use crate::http::{Executor, Headers, Request, join_path};
use crate::session::{self, Credentials, Session};
use crate::types::{ContainerInfo, ContainerType, DeleteOutcome};

/// Tracing target for catalog operations.
pub const TRACING_TARGET: &str = "swc_core::catalog";

/// Default page size for container listings
pub const DEFAULT_CONTAINER_LIMIT: u32 = 100;

/// Containers of one storage account
#[derive(Debug, Clone)]
pub struct ContainerCatalog {
    executor: Executor,
    session: Session,
}

impl ContainerCatalog {
    pub fn new(executor: Executor, session: Session) -> Self {
        Self { executor, session }
    }

    /// Authenticate and open the catalog of the account
    pub fn connect(executor: Executor, auth_url: &Url, credentials: &Credentials) -> Result<Self> {
        let session = session::authenticate(&executor, auth_url, credentials)?;
        Ok(Self::new(executor, session))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// List containers, `limit` entries after `marker`
    pub fn list(&self, limit: u32, marker: &str) -> Result<Vec<ContainerInfo>> {
        let request = self
            .session
            .authorize(Request::get(self.session.storage_url().clone()))
            .with_param("limit", limit)
            .with_param("marker", marker)
            .with_param("format", "json");

        let response = self.executor.execute(request)?;
        match response.status() {
            204 => Ok(Vec::new()),
            200 if response.body().is_empty() => Ok(Vec::new()),
            200 => response.json(),
            status => Err(Error::ConnectionFailed {
                status,
                message: "failed to list containers".into(),
            }),
        }
    }

    /// Account metadata (`x-*` headers: container count, bytes used, ...)
    pub fn account_info(&self) -> Result<Headers> {
        let request = self
            .session
            .authorize(Request::head(self.session.storage_url().clone()));

        let response = self.executor.execute(request)?;
        if !response.is_success() {
            return Err(Error::ConnectionFailed {
                status: response.status(),
                message: "failed to read account metadata".into(),
            });
        }
        Ok(response.headers_with_prefix("x-"))
    }

    /// Open an existing container, optionally attaching a CDN base URL
    pub fn select(&self, name: &str, cdn: Option<&str>) -> Result<ContainerHandle> {
        let url = self.container_url(name)?;
        let request = self.session.authorize(Request::head(url));

        let response = self.executor.execute(request)?;
        match response.status() {
            200 | 204 => {}
            // NotFound rather than ConnectionFailed so callers can tell a missing container apart
            404 => return Err(Error::NotFound(format!("container '{name}'"))),
            status => {
                return Err(Error::ConnectionFailed {
                    status,
                    message: format!("failed to select container '{name}'"),
                });
            }
        }

        let handle = ContainerHandle::new(
            self.executor.clone(),
            self.session.clone(),
            name,
            response.headers_with_prefix("x-"),
        )?;
        Ok(handle.with_cdn(cdn.map(str::to_string)))
    }

    /// Create a container of the given access type
    pub fn create(&self, name: &str, container_type: ContainerType) -> Result<ContainerHandle> {
        let url = self.container_url(name)?;
        let request = self
            .session
            .authorize(Request::put(url))
            .with_header(headers::CONTAINER_META_TYPE, container_type.as_str());

        let response = self.executor.execute(request)?;
        if !matches!(response.status(), 201 | 202) {
            return Err(Error::ConnectionFailed {
                status: response.status(),
                message: format!("failed to create container '{name}'"),
            });
        }

        tracing::debug!(
            target: TRACING_TARGET,
            container = name,
            %container_type,
            status = response.status(),
            "Container created"
        );

        let mut metadata = response.headers_with_prefix("x-");
        metadata.insert(
            headers::CONTAINER_META_TYPE.to_ascii_lowercase(),
            container_type.to_string(),
        );
        ContainerHandle::new(self.executor.clone(), self.session.clone(), name, metadata)
    }

    /// Delete a container. 204 and 404 both mean the container is gone;
    /// anything else (409 for a non-empty container) is logged and returned.
    pub fn delete(&self, name: &str) -> Result<DeleteOutcome> {
        let url = self.container_url(name)?;
        let response = self.executor.execute(self.session.authorize(Request::delete(url)))?;

        let succeeded = matches!(response.status(), 204 | 404);
        if !succeeded {
            tracing::warn!(
                target: TRACING_TARGET,
                container = name,
                status = response.status(),
                "Container was not deleted"
            );
        }

        Ok(DeleteOutcome {
            name: name.to_string(),
            succeeded,
            response,
        })
    }

    fn container_url(&self, name: &str) -> Result<Url> {
        validate_container_name(name)?;
        join_path(self.session.storage_url(), name, false)
    }
}

pub(crate) fn validate_container_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidPath("Container name cannot be empty".into()));
    }
    if name.contains('/') {
        return Err(Error::InvalidPath(format!(
            "Container name '{name}' cannot contain '/'"
        )));
    }
    Ok(())
}
