//! Command-line path parsing
//!
//! Remote paths look like `profile/container[/object]`. A bare `profile`
//! names the whole account. Anything else is a local path.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// A location inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    pub profile: String,
    pub container: String,
    /// Object name or prefix; empty for the container itself
    pub key: String,
    /// Trailing slash or empty key: the path names a virtual directory
    pub is_dir: bool,
}

impl RemotePath {
    pub fn new(
        profile: impl Into<String>,
        container: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let is_dir = key.is_empty() || key.ends_with('/');
        Self {
            profile: profile.into(),
            container: container.into(),
            key,
            is_dir,
        }
    }

    /// A path below this one. `child` is appended to the key.
    pub fn join(&self, child: &str) -> Self {
        let base = self.key.trim_end_matches('/');
        let key = if base.is_empty() {
            child.to_string()
        } else {
            format!("{base}/{child}")
        };
        Self::new(self.profile.clone(), self.container.clone(), key)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}/{}", self.profile, self.container)
        } else {
            write!(f, "{}/{}/{}", self.profile, self.container, self.key)
        }
    }
}

/// A path given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    Local(PathBuf),
    Remote(RemotePath),
}

impl ParsedPath {
    pub fn is_remote(&self) -> bool {
        matches!(self, ParsedPath::Remote(_))
    }

    pub fn as_remote(&self) -> Option<&RemotePath> {
        match self {
            ParsedPath::Remote(p) => Some(p),
            ParsedPath::Local(_) => None,
        }
    }
}

/// What a remote command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    /// The whole account of a profile
    Account(String),
    Container(RemotePath),
}

/// Parse a path that may be local or remote.
///
/// Absolute and `./` or `../` relative paths are local, as are paths whose
/// first segment is not a valid profile name. A single segment is local only
/// when it looks like a file name (contains a dot).
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    if path.starts_with('/') || path.starts_with("./") || path.starts_with("../") {
        return Ok(ParsedPath::Local(PathBuf::from(path)));
    }

    #[cfg(windows)]
    if path.len() >= 2 && path.chars().nth(1) == Some(':') {
        return Ok(ParsedPath::Local(PathBuf::from(path)));
    }

    let mut parts = path.splitn(3, '/');
    let profile = parts.next().unwrap_or_default();
    let container = parts.next();
    let key = parts.next().unwrap_or_default();

    let Some(container) = container else {
        if profile.contains('.') || profile.contains('\\') {
            return Ok(ParsedPath::Local(PathBuf::from(path)));
        }
        return Err(Error::InvalidPath(format!(
            "Path '{path}' is incomplete. Use format: profile/container[/object]"
        )));
    };

    if !is_valid_profile_name(profile) {
        return Ok(ParsedPath::Local(PathBuf::from(path)));
    }
    if container.is_empty() {
        return Err(Error::InvalidPath("Container name cannot be empty".into()));
    }

    Ok(ParsedPath::Remote(RemotePath::new(profile, container, key)))
}

/// Parse a path that must be remote; a bare profile name selects the account
pub fn parse_remote(path: &str) -> Result<RemoteTarget> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if is_valid_profile_name(trimmed) {
        return Ok(RemoteTarget::Account(trimmed.to_string()));
    }

    match parse_path(path)? {
        ParsedPath::Remote(remote) => Ok(RemoteTarget::Container(remote)),
        ParsedPath::Local(_) => Err(Error::InvalidPath(format!(
            "'{path}' is not a remote path. Use format: profile[/container[/object]]"
        ))),
    }
}

/// Profile names are ASCII letters, digits, `_` and `-`
pub fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_path() {
        let path = parse_path("selectel/photos/2024/cat.jpg").unwrap();
        let remote = path.as_remote().unwrap();
        assert_eq!(remote.profile, "selectel");
        assert_eq!(remote.container, "photos");
        assert_eq!(remote.key, "2024/cat.jpg");
        assert!(!remote.is_dir);
    }

    #[test]
    fn test_parse_container_path() {
        let path = parse_path("selectel/photos").unwrap();
        let remote = path.as_remote().unwrap();
        assert_eq!(remote.key, "");
        assert!(remote.is_dir);
        assert_eq!(remote.to_string(), "selectel/photos");
    }

    #[test]
    fn test_parse_directory_path() {
        let remote = parse_path("s/c/dir/").unwrap();
        assert!(remote.as_remote().unwrap().is_dir);
    }

    #[test]
    fn test_local_paths() {
        for local in ["/tmp/a.txt", "./a.txt", "../a.txt", "a.txt", "my.dir/file"] {
            assert!(!parse_path(local).unwrap().is_remote(), "{local}");
        }
    }

    #[test]
    fn test_incomplete_and_empty() {
        assert!(parse_path("").is_err());
        assert!(parse_path("selectel").is_err());
        assert!(matches!(
            parse_path("selectel//obj"),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_parse_remote_account() {
        assert_eq!(
            parse_remote("selectel").unwrap(),
            RemoteTarget::Account("selectel".into())
        );
        assert_eq!(
            parse_remote("selectel/").unwrap(),
            RemoteTarget::Account("selectel".into())
        );
        assert!(matches!(
            parse_remote("selectel/photos").unwrap(),
            RemoteTarget::Container(_)
        ));
        assert!(parse_remote("./local").is_err());
    }

    #[test]
    fn test_join() {
        let base = RemotePath::new("s", "c", "");
        let dir = base.join("dir/");
        assert!(dir.is_dir);
        let file = dir.join("x.bin");
        assert_eq!(file.key, "dir/x.bin");
        assert!(!file.is_dir);
    }
}
