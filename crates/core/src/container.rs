//! Object operations within one container

use std::path::Path;

use url::Url;

use crate::catalog::validate_container_name;
use crate::error::{Error, Result};
use crate::headers;
use crate::http::{Executor, Headers, Method, Payload, Request, Response, join_path};
use crate::session::Session;
use crate::types::{DeleteOutcome, ListOptions, ObjectInfo, ObjectListing, UploadResult};

/// Tracing target for object operations.
pub const TRACING_TARGET: &str = "swc_core::container";

/// A selected or freshly created container
///
/// Holds the session it was opened with; every call carries its token.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    name: String,
    url: Url,
    session: Session,
    executor: Executor,
    cdn: Option<String>,
    metadata: Headers,
}

impl ContainerHandle {
    pub fn new(
        executor: Executor,
        session: Session,
        name: &str,
        metadata: Headers,
    ) -> Result<Self> {
        validate_container_name(name)?;
        let url = join_path(session.storage_url(), name, true)?;
        Ok(Self {
            name: name.to_string(),
            url,
            session,
            executor,
            cdn: None,
            metadata,
        })
    }

    /// Attach a CDN base URL used to build public object links
    pub fn with_cdn(mut self, cdn: Option<String>) -> Self {
        self.cdn = cdn;
        self
    }

    pub fn set_cdn(&mut self, cdn: Option<String>) {
        self.cdn = cdn;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Container URL, always ending with `/`
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cdn(&self) -> Option<&str> {
        self.cdn.as_deref()
    }

    /// `x-*` headers reported when the container was opened
    pub fn info(&self) -> &Headers {
        &self.metadata
    }

    /// Storage URL of an object
    pub fn object_url(&self, name: &str) -> Result<Url> {
        validate_object_name(name)?;
        join_path(&self.url, name, false)
    }

    /// Public URL of an object, when a CDN base is configured
    pub fn cdn_url(&self, name: &str) -> Option<String> {
        self.cdn.as_ref().map(|cdn| format!("{cdn}{name}"))
    }

    /// List objects.
    ///
    /// With `limit <= 1` the listing is [`ObjectListing::Single`], otherwise
    /// [`ObjectListing::Many`].
    pub fn list(&self, options: &ListOptions) -> Result<ObjectListing> {
        let request = self
            .session
            .authorize(Request::get(self.url.clone()))
            .with_param("limit", options.limit)
            .with_param("marker", options.marker.as_deref().unwrap_or_default())
            .with_optional_param("prefix", options.prefix.as_deref())
            .with_optional_param("delimiter", options.delimiter.as_deref())
            .with_optional_param("path", options.path.as_deref())
            .with_param("format", "json");

        let response = self.executor.execute(request)?;
        let objects: Vec<ObjectInfo> = match response.status() {
            204 => Vec::new(),
            200 if response.body().is_empty() => Vec::new(),
            200 => response.json()?,
            status => {
                return Err(Error::ConnectionFailed {
                    status,
                    message: format!("failed to list objects in '{}'", self.name),
                });
            }
        };

        if options.limit <= 1 {
            Ok(ObjectListing::Single(objects.into_iter().next()))
        } else {
            Ok(ObjectListing::Many(objects))
        }
    }

    /// Server-side copy within this container
    pub fn copy(&self, source: &str, destination: &str) -> Result<Response> {
        validate_object_name(destination)?;
        let request = self
            .session
            .authorize(Request::new(Method::Copy, self.object_url(source)?))
            .with_header(headers::DESTINATION, self.destination_path(destination)?);

        let response = self.executor.execute(request)?;
        if response.status() != 201 {
            return Err(Error::CopyFailed {
                status: response.status(),
                source_name: source.to_string(),
                destination: destination.to_string(),
            });
        }
        Ok(response)
    }

    /// `/{container}/{object}`, each segment percent-encoded like the request path
    fn destination_path(&self, destination: &str) -> Result<String> {
        let root = Url::parse("http://localhost/")?;
        let container = join_path(&root, &self.name, true)?;
        Ok(join_path(&container, destination, false)?.path().to_string())
    }

    /// Create a virtual directory marker
    pub fn create_directory(&self, name: &str) -> Result<Response> {
        let request = self
            .session
            .authorize(Request::put(self.object_url(name)?))
            .with_header(headers::CONTENT_TYPE, headers::DIRECTORY_CONTENT_TYPE)
            .with_payload(Payload::empty());

        let response = self.executor.execute(request)?;
        if response.status() != 201 {
            return Err(Error::UploadFailed {
                status: response.status(),
                name: name.to_string(),
            });
        }
        Ok(response)
    }

    /// Upload a local file.
    ///
    /// The object is named after the file unless `destination` is given.
    /// `extra_headers` are sent as is; see [`headers`] for expiry and
    /// checksum helpers.
    pub fn upload(
        &self,
        local_path: &Path,
        destination: Option<&str>,
        extra_headers: &[(String, String)],
    ) -> Result<UploadResult> {
        if !local_path.is_file() {
            return Err(Error::NotFound(format!("local file '{}'", local_path.display())));
        }

        let name = match destination {
            Some(name) => name.to_string(),
            None => local_path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::InvalidPath(format!(
                        "Cannot derive an object name from '{}'",
                        local_path.display()
                    ))
                })?,
        };

        self.put_object(&name, Payload::from_file(local_path)?, extra_headers)
    }

    /// Upload an in-memory buffer
    pub fn upload_content(
        &self,
        destination: &str,
        content: impl Into<Vec<u8>>,
        extra_headers: &[(String, String)],
    ) -> Result<UploadResult> {
        self.put_object(destination, Payload::from_bytes(content), extra_headers)
    }

    fn put_object(
        &self,
        name: &str,
        payload: Payload,
        extra_headers: &[(String, String)],
    ) -> Result<UploadResult> {
        let url = self.object_url(name)?;
        let length = payload.len();
        let request = self
            .session
            .authorize(Request::put(url.clone()))
            .with_headers(extra_headers.iter().cloned())
            .with_payload(payload);

        let response = self.executor.execute(request)?;
        match response.status() {
            201 => {}
            422 if headers::contains(extra_headers, headers::ETAG) => {
                return Err(Error::IntegrityCheckFailed {
                    name: name.to_string(),
                });
            }
            status => {
                return Err(Error::UploadFailed {
                    status,
                    name: name.to_string(),
                });
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            container = %self.name,
            object = name,
            bytes = length,
            "Object uploaded"
        );

        Ok(UploadResult {
            name: name.to_string(),
            url,
            cdn_url: self.cdn_url(name),
            response,
        })
    }

    /// Fetch the content of an object
    pub fn download(&self, name: &str) -> Result<Vec<u8>> {
        let request = self.session.authorize(Request::get(self.object_url(name)?));

        let response = self.executor.execute(request)?;
        match response.status() {
            200 => Ok(response.into_body()),
            404 => Err(Error::NotFound(format!("object '{}/{name}'", self.name))),
            status => Err(Error::ConnectionFailed {
                status,
                message: format!("failed to download '{}/{name}'", self.name),
            }),
        }
    }

    /// Delete an object. Any status other than 204, a missing object
    /// included, is logged and reported in the outcome.
    pub fn delete(&self, name: &str) -> Result<DeleteOutcome> {
        let request = self.session.authorize(Request::delete(self.object_url(name)?));

        let response = self.executor.execute(request)?;
        let succeeded = response.status() == 204;
        if !succeeded {
            tracing::warn!(
                target: TRACING_TARGET,
                container = %self.name,
                object = name,
                status = response.status(),
                "Object was not deleted"
            );
        }

        Ok(DeleteOutcome {
            name: name.to_string(),
            succeeded,
            response,
        })
    }
}

fn validate_object_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidPath("Object name cannot be empty".into()));
    }
    Ok(())
}
