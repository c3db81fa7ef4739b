//! Path parsing and resolution
//!
//! Handles parsing of store paths in the format: profile[/container[/key]]
//! The key part may itself contain slashes; only the first two separators
//! split components.

use crate::error::{Error, Result};

/// A parsed store path addressing a profile, container, or item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePath {
    /// Profile name
    pub profile: String,
    /// Container name, if the path goes deeper than the profile
    pub container: Option<String>,
    /// Item key or key prefix, if the path goes deeper than the container
    pub key: Option<String>,
}

impl StorePath {
    /// Parse a path string
    ///
    /// `profile` lists containers, `profile/container` addresses one
    /// container, `profile/container/key` addresses one item (or a key
    /// prefix for listings).
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidPath("Path cannot be empty".into()));
        }

        let parts: Vec<&str> = path.splitn(3, '/').collect();

        let profile = parts[0];
        if !is_valid_profile_name(profile) {
            return Err(Error::InvalidPath(format!(
                "'{profile}' is not a valid profile name. Use format: profile[/container[/key]]"
            )));
        }

        let container = match parts.get(1) {
            None => None,
            Some(c) if c.is_empty() => {
                return Err(Error::InvalidPath("Container name cannot be empty".into()));
            }
            Some(c) => Some(c.to_string()),
        };

        let key = match parts.get(2) {
            None => None,
            Some(k) if k.is_empty() => None,
            Some(k) => Some(k.to_string()),
        };

        Ok(Self {
            profile: profile.to_string(),
            container,
            key,
        })
    }

    /// The container component, required by commands that address one
    pub fn require_container(&self) -> Result<&str> {
        self.container.as_deref().ok_or_else(|| {
            Error::InvalidPath(format!(
                "'{self}' has no container. Use format: profile/container"
            ))
        })
    }

    /// The key component, required by commands that address an item
    pub fn require_key(&self) -> Result<&str> {
        self.key.as_deref().ok_or_else(|| {
            Error::InvalidPath(format!(
                "'{self}' has no key. Use format: profile/container/key"
            ))
        })
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.profile)?;
        if let Some(container) = &self.container {
            write!(f, "/{container}")?;
        }
        if let Some(key) = &self.key {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

/// Check if a string is a valid profile name
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
    fn test_parse_full_path() {
        let path = StorePath::parse("minio/bucket/file.txt").unwrap();
        assert_eq!(path.profile, "minio");
        assert_eq!(path.container.as_deref(), Some("bucket"));
        assert_eq!(path.key.as_deref(), Some("file.txt"));
    }

    #[test]
    fn test_parse_key_keeps_inner_slashes() {
        let path = StorePath::parse("minio/bucket/logs/2024/app.log").unwrap();
        assert_eq!(path.key.as_deref(), Some("logs/2024/app.log"));
    }

    #[test]
    fn test_parse_container_only() {
        let path = StorePath::parse("minio/bucket").unwrap();
        assert_eq!(path.container.as_deref(), Some("bucket"));
        assert_eq!(path.key, None);
    }

    #[test]
    fn test_parse_profile_only() {
        let path = StorePath::parse("minio").unwrap();
        assert_eq!(path.profile, "minio");
        assert_eq!(path.container, None);
        assert_eq!(path.key, None);
    }

    #[test]
    fn test_parse_trailing_slash_is_prefixless() {
        let path = StorePath::parse("minio/bucket/").unwrap();
        assert_eq!(path.container.as_deref(), Some("bucket"));
        assert_eq!(path.key, None);
    }

    #[test]
    fn test_parse_prefix_with_trailing_slash() {
        let path = StorePath::parse("minio/bucket/logs/").unwrap();
        assert_eq!(path.key.as_deref(), Some("logs/"));
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(StorePath::parse("").is_err());
    }

    #[test]
    fn test_parse_empty_container() {
        let result = StorePath::parse("minio//key");
        assert!(matches!(result.unwrap_err(), Error::InvalidPath(_)));
    }

    #[test]
    fn test_parse_invalid_profile_name() {
        assert!(StorePath::parse("bad name/bucket").is_err());
        assert!(StorePath::parse("/absolute/path").is_err());
    }

    #[test]
    fn test_require_container() {
        let path = StorePath::parse("minio").unwrap();
        assert!(matches!(
            path.require_container(),
            Err(Error::InvalidPath(_))
        ));

        let path = StorePath::parse("minio/bucket").unwrap();
        assert_eq!(path.require_container().unwrap(), "bucket");
    }

    #[test]
    fn test_require_key() {
        let path = StorePath::parse("minio/bucket").unwrap();
        assert!(matches!(path.require_key(), Err(Error::InvalidPath(_))));

        let path = StorePath::parse("minio/bucket/file.txt").unwrap();
        assert_eq!(path.require_key().unwrap(), "file.txt");
    }

    #[test]
    fn test_display_roundtrip() {
        for input in ["minio", "minio/bucket", "minio/bucket/a/b/c.txt"] {
            let path = StorePath::parse(input).unwrap();
            assert_eq!(path.to_string(), input);
        }
    }

    #[test]
    fn test_valid_profile_names() {
        assert!(is_valid_profile_name("minio"));
        assert!(is_valid_profile_name("local_fs-2"));
        assert!(!is_valid_profile_name(""));
        assert!(!is_valid_profile_name("has space"));
        assert!(!is_valid_profile_name("dot.name"));
    }
}
