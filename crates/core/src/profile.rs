//! Profile management
//!
//! Profiles are named storage endpoints: which backend to use, where it
//! lives, and how to authenticate against it. Every CLI path starts with
//! a profile name and the library opens locations from a `Profile`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Default number of entries per listing page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Which adapter a profile addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local filesystem directory tree
    Fs,
    /// S3-compatible object store
    S3,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Fs => f.write_str("fs"),
            BackendKind::S3 => f.write_str("s3"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fs" => Ok(BackendKind::Fs),
            "s3" => Ok(BackendKind::S3),
            other => Err(Error::Config(format!(
                "unknown backend '{other}' (expected 'fs' or 's3')"
            ))),
        }
    }
}

/// A profile names a storage endpoint and how to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Backend kind
    pub backend: BackendKind,

    /// Backend target: root directory for fs, endpoint URL for s3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Access key ID (s3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Secret access key (s3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// AWS region (s3)
    #[serde(default = "default_region")]
    pub region: String,

    /// Address buckets by path rather than virtual host (s3)
    #[serde(default = "default_path_style")]
    pub force_path_style: bool,

    /// Entries per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_path_style() -> bool {
    true
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Profile {
    /// Create a filesystem profile rooted at `root`
    pub fn fs(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend: BackendKind::Fs,
            target: Some(root.into()),
            access_key: None,
            secret_key: None,
            region: default_region(),
            force_path_style: default_path_style(),
            page_size: default_page_size(),
        }
    }

    /// Create an S3 profile for `endpoint` with static credentials
    pub fn s3(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend: BackendKind::S3,
            target: Some(endpoint.into()),
            access_key: Some(access_key.into()),
            secret_key: Some(secret_key.into()),
            region: default_region(),
            force_path_style: default_path_style(),
            page_size: default_page_size(),
        }
    }

    /// The backend target, required for every backend
    ///
    /// Fails with a configuration error naming this profile when the
    /// target was never set.
    pub fn target(&self) -> Result<&str> {
        self.target.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "profile '{}' has no target configured ({})",
                self.name,
                match self.backend {
                    BackendKind::Fs => "root directory",
                    BackendKind::S3 => "endpoint URL",
                }
            ))
        })
    }

    /// Static credentials, required for s3 profiles
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let access = self.access_key.as_deref().ok_or_else(|| {
            Error::Config(format!("profile '{}' has no access_key configured", self.name))
        })?;
        let secret = self.secret_key.as_deref().ok_or_else(|| {
            Error::Config(format!("profile '{}' has no secret_key configured", self.name))
        })?;
        Ok((access, secret))
    }

    /// Page size, validated to be usable
    pub fn validated_page_size(&self) -> Result<usize> {
        if self.page_size == 0 {
            return Err(Error::Config(format!(
                "profile '{}' has page_size 0 (must be at least 1)",
                self.name
            )));
        }
        Ok(self.page_size)
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
            .ok_or_else(|| Error::NotFound(format!("profile '{name}'")))
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        let mut config = self.config_manager.load()?;

        // Remove existing profile with same name
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
            return Err(Error::NotFound(format!("profile '{name}'")));
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
        let profile_manager = ProfileManager::with_config_manager(config_manager);
        (profile_manager, temp_dir)
    }

    #[test]
    fn test_profile_fs() {
        let profile = Profile::fs("local", "/srv/depot");
        assert_eq!(profile.name, "local");
        assert_eq!(profile.backend, BackendKind::Fs);
        assert_eq!(profile.target().unwrap(), "/srv/depot");
        assert_eq!(profile.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_profile_s3() {
        let profile = Profile::s3("minio", "http://localhost:9000", "access", "secret");
        assert_eq!(profile.backend, BackendKind::S3);
        assert_eq!(profile.target().unwrap(), "http://localhost:9000");
        assert_eq!(profile.credentials().unwrap(), ("access", "secret"));
        assert_eq!(profile.region, "us-east-1");
        assert!(profile.force_path_style);
    }

    #[test]
    fn test_profile_missing_target() {
        let mut profile = Profile::fs("broken", "/tmp");
        profile.target = None;

        let err = profile.target().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("broken")));
    }

    #[test]
    fn test_profile_missing_credentials() {
        let mut profile = Profile::s3("m", "http://localhost:9000", "a", "s");
        profile.secret_key = None;

        let err = profile.credentials().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("secret_key")));
    }

    #[test]
    fn test_profile_zero_page_size() {
        let mut profile = Profile::fs("local", "/srv/depot");
        profile.page_size = 0;

        assert!(matches!(
            profile.validated_page_size(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("fs".parse::<BackendKind>().unwrap(), BackendKind::Fs);
        assert_eq!("s3".parse::<BackendKind>().unwrap(), BackendKind::S3);
        assert!("gcs".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_profile_manager_set_and_get() {
        let (manager, _temp_dir) = temp_profile_manager();

        let profile = Profile::s3("minio", "http://localhost:9000", "minioadmin", "minioadmin");
        manager.set(profile).unwrap();

        let retrieved = manager.get("minio").unwrap();
        assert_eq!(retrieved.name, "minio");
        assert_eq!(retrieved.target().unwrap(), "http://localhost:9000");
    }

    #[test]
    fn test_profile_manager_list() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::fs("a", "/srv/a")).unwrap();
        manager
            .set(Profile::s3("b", "http://b:9000", "b", "b"))
            .unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 2);
    }

    #[test]
    fn test_profile_manager_remove() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::fs("test", "/srv/test")).unwrap();
        assert!(manager.exists("test").unwrap());

        manager.remove("test").unwrap();
        assert!(!manager.exists("test").unwrap());
    }

    #[test]
    fn test_profile_manager_remove_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.remove("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::NotFound(_)));
    }

    #[test]
    fn test_profile_manager_get_not_found() {
        let (manager, _temp_dir) = temp_profile_manager();

        let result = manager.get("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::NotFound(_)));
    }

    #[test]
    fn test_profile_update_existing() {
        let (manager, _temp_dir) = temp_profile_manager();

        manager.set(Profile::fs("test", "/old/root")).unwrap();
        manager.set(Profile::fs("test", "/new/root")).unwrap();

        let profiles = manager.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].target().unwrap(), "/new/root");
    }
}
