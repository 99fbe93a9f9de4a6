//! Profile management
//!
//! Profiles are named references to Swift-compatible storage accounts,
//! including the auth endpoint, credentials and transport options.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Auth endpoint used when a profile does not name one
pub const DEFAULT_AUTH_URL: &str = "https://auth.selcdn.ru/";

/// Timeout configuration for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Total request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5_000
}

fn default_request_timeout() -> u64 {
    120_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            request_ms: default_request_timeout(),
        }
    }
}

/// A profile names one storage account
#[derive(Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Auth endpoint URL
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Account user (sent as X-Auth-User)
    pub user: String,

    /// Account key (sent as X-Auth-Key)
    pub key: String,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// CDN base URL used to compute public object URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn: Option<String>,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("auth_url", &self.auth_url)
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("cdn", &self.cdn)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(name: impl Into<String>, user: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auth_url: default_auth_url(),
            user: user.into(),
            key: key.into(),
            insecure: false,
            cdn: None,
            timeout: None,
        }
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }

    /// Credentials for the auth exchange
    pub fn credentials(&self) -> crate::session::Credentials {
        crate::session::Credentials::new(&self.user, &self.key)
    }

    /// The auth endpoint as a URL
    pub fn auth_endpoint(&self) -> Result<url::Url> {
        url::Url::parse(&self.auth_url)
            .map_err(|e| Error::Config(format!("Invalid auth URL '{}': {e}", self.auth_url)))
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_profile_manager() -> (ProfileManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        (ProfileManager::with_config_manager(config_manager), temp_dir)
    }

    #[test]
    fn test_profile_new() {
        let profile = Profile::new("sel", "12345", "secret");
        assert_eq!(profile.name, "sel");
        assert_eq!(profile.auth_url, DEFAULT_AUTH_URL);
        assert!(!profile.insecure);
        assert!(profile.cdn.is_none());
        assert_eq!(profile.timeout_config(), TimeoutConfig::default());
    }

    #[test]
    fn test_profile_debug_redacts_key() {
        let profile = Profile::new("sel", "12345", "top-secret");
        let debug = format!("{profile:?}");
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("12345"));
    }

    #[test]
    fn test_auth_endpoint() {
        let mut profile = Profile::new("sel", "12345", "secret");
        assert_eq!(
            profile.auth_endpoint().unwrap().as_str(),
            "https://auth.selcdn.ru/"
        );

        profile.auth_url = "not a url".into();
        assert!(matches!(profile.auth_endpoint(), Err(Error::Config(_))));
    }

    #[test]
    fn test_timeout_defaults() {
        let timeout = TimeoutConfig::default();
        assert_eq!(timeout.connect_ms, 5_000);
        assert_eq!(timeout.request_ms, 120_000);
    }

    #[test]
    fn test_profile_manager_set_and_get() {
        let (manager, _temp_dir) = temp_profile_manager();

        let mut profile = Profile::new("sel", "12345", "secret");
        profile.cdn = Some("https://cdn.example.com/".to_string());
        manager.set(profile).unwrap();

        let retrieved = manager.get("sel").unwrap();
        assert_eq!(retrieved.user, "12345");
        assert_eq!(retrieved.cdn.as_deref(), Some("https://cdn.example.com/"));
    }

    #[test]
    fn test_profile_manager_list() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::new("a", "a", "a")).unwrap();
        manager.set(Profile::new("b", "b", "b")).unwrap();

        assert_eq!(manager.list().unwrap().len(), 2);
    }

    #[test]
    fn test_profile_manager_remove() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::new("test", "a", "b")).unwrap();
        assert!(manager.exists("test").unwrap());

        manager.remove("test").unwrap();
        assert!(!manager.exists("test").unwrap());
    }

    #[test]
    fn test_profile_manager_remove_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.remove("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::ProfileNotFound(_)));
    }

    #[test]
    fn test_profile_update_existing() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::new("test", "old", "b")).unwrap();
        manager.set(Profile::new("test", "new", "d")).unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].user, "new");
    }
}
