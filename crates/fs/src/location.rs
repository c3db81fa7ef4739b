//! Filesystem-backed location
//!
//! A location is a directory tree rooted at the profile's target. Each
//! direct subdirectory of the root is a container. Container identifiers
//! are absolute canonical paths so they survive round-trips through
//! listings, URLs, and fresh location handles.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use depot_core::{
    BackendKind, Container, Error, Item, Location, Page, Profile, Result, cursor,
};

use crate::container::FsContainer;
use crate::item::FsItem;

/// A location rooted at a local directory
#[derive(Debug)]
pub struct FsLocation {
    root: PathBuf,
    page_size: usize,
}

impl FsLocation {
    /// Open a location for an fs profile
    ///
    /// The profile's target must name an existing directory; it is
    /// canonicalized once here and every identifier this location hands
    /// out is anchored under it.
    pub async fn open(profile: &Profile) -> Result<Self> {
        if profile.backend != BackendKind::Fs {
            return Err(Error::Config(format!(
                "profile '{}' is not an fs profile",
                profile.name
            )));
        }
        let page_size = profile.validated_page_size()?;
        let target = profile.target()?;

        let root = tokio::fs::canonicalize(target).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::Config(format!(
                    "profile '{}': root directory '{target}' does not exist",
                    profile.name
                ))
            } else {
                Error::Io(e)
            }
        })?;
        let metadata = tokio::fs::metadata(&root).await?;
        if !metadata.is_dir() {
            return Err(Error::Config(format!(
                "profile '{}': target '{target}' is not a directory",
                profile.name
            )));
        }

        Ok(Self { root, page_size })
    }

    /// Resolve a container identifier to a directory under the root.
    ///
    /// Accepts the absolute identifiers handed out by listings as well as
    /// root-relative names. The root itself and anything outside it are
    /// rejected.
    fn resolve_container(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() {
            return Err(Error::InvalidPath(
                "container identifier cannot be empty".into(),
            ));
        }
        let raw = PathBuf::from(id);
        let path = if raw.is_absolute() {
            raw
        } else {
            self.root.join(raw)
        };
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Error::InvalidPath(format!(
                "'{id}' contains parent directory components"
            )));
        }
        if !path.starts_with(&self.root) || path == self.root {
            return Err(Error::InvalidPath(format!(
                "'{id}' is outside this location"
            )));
        }
        Ok(path)
    }

    fn container_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }

    fn make_container(&self, path: PathBuf) -> FsContainer {
        let name = self.container_name(&path);
        FsContainer::new(path, name, self.page_size)
    }
}

#[async_trait]
impl Location for FsLocation {
    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn create_container(&self, name: &str) -> Result<Box<dyn Container>> {
        validate_container_name(name)?;
        let path = self.root.join(name);
        tokio::fs::create_dir(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                Error::AlreadyExists(format!("container '{name}'"))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Box::new(self.make_container(path)))
    }

    async fn container(&self, id: &str) -> Result<Box<dyn Container>> {
        let path = self.resolve_container(id)?;
        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound(format!("container '{id}'"))
            } else {
                Error::Io(e)
            }
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotFound(format!("container '{id}'")));
        }
        Ok(Box::new(self.make_container(path)))
    }

    async fn containers(
        &self,
        prefix: &str,
        cursor_token: Option<&str>,
    ) -> Result<Page<Box<dyn Container>>> {
        let pattern = self
            .root
            .join(format!("{}*", glob::Pattern::escape(prefix)))
            .to_string_lossy()
            .into_owned();

        let mut entries: Vec<Box<dyn Container>> = Vec::new();
        for candidate in glob::glob(&pattern).map_err(|e| Error::Backend(e.to_string()))? {
            let path = candidate.map_err(|e| Error::Backend(e.to_string()))?;
            let metadata = tokio::fs::metadata(&path).await?;
            if !metadata.is_dir() {
                continue;
            }
            entries.push(Box::new(self.make_container(path)));
        }
        debug!(total = entries.len(), "materialized container listing");

        cursor::take_page(entries, cursor_token, self.page_size, |c| c.id())
    }

    /// Removes the container directory and everything under it. Removing
    /// an absent container succeeds.
    async fn remove_container(&self, id: &str) -> Result<()> {
        let path = self.resolve_container(id)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    async fn item_by_url(&self, url: &Url) -> Result<Box<dyn Item>> {
        if url.scheme() != "file" {
            return Err(Error::InvalidPath(format!(
                "expected a file:// URL, got '{url}'"
            )));
        }
        let requested = url
            .to_file_path()
            .map_err(|_| Error::InvalidPath(format!("'{url}' is not a usable file path")))?;

        let path = tokio::fs::canonicalize(&requested).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound(format!("item '{}'", requested.display()))
            } else {
                Error::Io(e)
            }
        })?;
        let rel = path
            .strip_prefix(&self.root)
            .map_err(|_| Error::InvalidPath(format!("'{url}' is outside this location")))?;

        let mut components = rel.components();
        match components.next() {
            Some(Component::Normal(_)) => {}
            _ => {
                return Err(Error::InvalidPath(format!(
                    "'{url}' does not address an item inside a container"
                )));
            }
        }
        let item_rel = components.as_path();
        if item_rel.as_os_str().is_empty() {
            return Err(Error::InvalidPath(format!(
                "'{url}' addresses a container, not an item"
            )));
        }
        let name = item_rel
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");

        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(Error::NotFound(format!("item '{}'", path.display())));
        }
        Ok(Box::new(FsItem::from_metadata(path, name, &metadata)))
    }
}

/// Validate a name for `create_container`: one plain path segment
fn validate_container_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidPath(format!(
            "'{name}' is not a valid container name"
        )))
    }
}
