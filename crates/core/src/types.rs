//! Records and results returned by catalog and container operations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::Error;
use crate::http::Response;

/// One entry of a container listing, as returned by the service
///
/// The record is kept exactly as decoded. Numbers keep their full
/// precision, so counters beyond 64 bits survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerInfo(Map<String, Value>);

impl ContainerInfo {
    pub fn name(&self) -> &str {
        str_field(&self.0, "name").unwrap_or_default()
    }

    /// Number of objects
    pub fn count(&self) -> Option<u64> {
        self.0.get("count").and_then(Value::as_u64)
    }

    /// Bytes used
    pub fn bytes(&self) -> Option<u64> {
        self.0.get("bytes").and_then(Value::as_u64)
    }

    /// Any field of the record
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ContainerInfo {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One entry of an object listing, as returned by the service
///
/// With a delimiter the service also returns pseudo-directory entries
/// that only carry `subdir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectInfo(Map<String, Value>);

impl ObjectInfo {
    pub fn name(&self) -> Option<&str> {
        str_field(&self.0, "name")
    }

    /// Pseudo-directory prefix
    pub fn subdir(&self) -> Option<&str> {
        str_field(&self.0, "subdir")
    }

    /// Object name, or the subdir for pseudo-directory entries
    pub fn key(&self) -> &str {
        self.name().or_else(|| self.subdir()).unwrap_or_default()
    }

    /// Whether the entry is a pseudo-directory or a directory marker
    pub fn is_dir(&self) -> bool {
        self.subdir().is_some()
            || self.content_type() == Some(crate::headers::DIRECTORY_CONTENT_TYPE)
    }

    pub fn bytes(&self) -> Option<u64> {
        self.0.get("bytes").and_then(Value::as_u64)
    }

    /// MD5 of the object content
    pub fn hash(&self) -> Option<&str> {
        str_field(&self.0, "hash")
    }

    pub fn content_type(&self) -> Option<&str> {
        str_field(&self.0, "content_type")
    }

    pub fn last_modified(&self) -> Option<&str> {
        str_field(&self.0, "last_modified")
    }

    /// Any field of the record
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ObjectInfo {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn str_field<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    map.get(field).and_then(Value::as_str)
}

/// Result of an object listing
///
/// A listing limited to a single entry yields that entry (or nothing)
/// instead of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectListing {
    Single(Option<ObjectInfo>),
    Many(Vec<ObjectInfo>),
}

impl ObjectListing {
    /// Flatten into a vector regardless of shape
    pub fn into_vec(self) -> Vec<ObjectInfo> {
        match self {
            ObjectListing::Single(item) => item.into_iter().collect(),
            ObjectListing::Many(items) => items,
        }
    }
}

/// Default page size for object listings
pub const DEFAULT_OBJECT_LIMIT: u32 = 10_000;

/// Options for object listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Return objects nested directly under this virtual folder
    pub path: Option<String>,

    /// Maximum number of entries
    pub limit: u32,

    /// Return entries after this name
    pub marker: Option<String>,

    /// Return entries whose name starts with this prefix
    pub prefix: Option<String>,

    /// Group names up to this delimiter into pseudo-directories
    pub delimiter: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            path: None,
            limit: DEFAULT_OBJECT_LIMIT,
            marker: None,
            prefix: None,
            delimiter: None,
        }
    }
}

/// Access type of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    #[default]
    Private,
    Public,
    Gallery,
}

impl ContainerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContainerType::Private => "private",
            ContainerType::Public => "public",
            ContainerType::Gallery => "gallery",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "private" => Ok(ContainerType::Private),
            "public" => Ok(ContainerType::Public),
            "gallery" => Ok(ContainerType::Gallery),
            other => Err(Error::General(format!(
                "Unknown container type '{other}'. Expected private, public or gallery"
            ))),
        }
    }
}

/// Outcome of a successful upload
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Object name inside the container
    pub name: String,

    /// Storage URL of the object
    pub url: Url,

    /// Public URL when the container has a CDN base configured
    pub cdn_url: Option<String>,

    pub response: Response,
}

impl UploadResult {
    /// ETag reported by the service
    pub fn etag(&self) -> Option<&str> {
        self.response.header("etag")
    }
}

/// Outcome of a delete call
///
/// Deletes never fail on status. An unexpected status is logged as a
/// warning and reported here with `succeeded == false`.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub name: String,
    pub succeeded: bool,
    pub response: Response,
}

impl DeleteOutcome {
    pub fn status(&self) -> u16 {
        self.response.status()
    }
}
