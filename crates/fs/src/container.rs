//! Filesystem-backed containers
//!
//! A container is a directory directly under the location root. Items are
//! the regular files anywhere below it; nested directories only contribute
//! path segments to item names, they are not containers of their own.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};
use walkdir::WalkDir;

use depot_core::{Container, Content, Error, Item, Page, Result, cursor};

use crate::item::FsItem;

/// A container backed by a directory
#[derive(Debug)]
pub struct FsContainer {
    id: String,
    name: String,
    path: PathBuf,
    page_size: usize,
}

impl FsContainer {
    pub(crate) fn new(path: PathBuf, name: String, page_size: usize) -> Self {
        Self {
            id: path.to_string_lossy().into_owned(),
            name,
            path,
            page_size,
        }
    }

    /// Resolve an item identifier to a path under this container.
    ///
    /// Accepts the absolute identifiers handed out by listings as well as
    /// container-relative names. Anything that would land outside the
    /// container directory is rejected.
    fn resolve(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() {
            return Err(Error::InvalidPath("item identifier cannot be empty".into()));
        }
        let raw = PathBuf::from(id);
        let path = if raw.is_absolute() {
            raw
        } else {
            self.path.join(raw)
        };
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Error::InvalidPath(format!(
                "'{id}' contains parent directory components"
            )));
        }
        if !path.starts_with(&self.path) {
            return Err(Error::InvalidPath(format!(
                "'{id}' is outside container '{}'",
                self.name
            )));
        }
        Ok(path)
    }

    /// Item name relative to this container, with `/` separators
    fn relative_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.path)
            .unwrap_or(path)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }

    async fn stat_file(&self, id: &str) -> Result<(PathBuf, std::fs::Metadata)> {
        let path = self.resolve(id)?;
        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound(format!("item '{id}'"))
            } else {
                Error::Io(e)
            }
        })?;
        if !metadata.is_file() {
            return Err(Error::NotFound(format!("item '{id}'")));
        }
        Ok((path, metadata))
    }
}

#[async_trait]
impl Container for FsContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn item(&self, id: &str) -> Result<Box<dyn Item>> {
        let (path, metadata) = self.stat_file(id).await?;
        let name = self.relative_name(&path);
        Ok(Box::new(FsItem::from_metadata(path, name, &metadata)))
    }

    async fn items(&self, prefix: &str, cursor_token: Option<&str>) -> Result<Page<Box<dyn Item>>> {
        let mut entries: Vec<Box<dyn Item>> = Vec::new();
        for entry in WalkDir::new(&self.path).min_depth(1) {
            let entry = entry.map_err(|e| walk_error(e, &self.name))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = self.relative_name(entry.path());
            if !name.starts_with(prefix) {
                continue;
            }
            let metadata = entry.metadata().map_err(|e| walk_error(e, &self.name))?;
            entries.push(Box::new(FsItem::from_metadata(
                entry.into_path(),
                name,
                &metadata,
            )));
        }
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        debug!(
            container = %self.name,
            total = entries.len(),
            "materialized item listing"
        );

        cursor::take_page(entries, cursor_token, self.page_size, |item| item.id())
    }

    async fn put(&self, name: &str, content: Content, size: u64) -> Result<Box<dyn Item>> {
        validate_item_name(name)?;
        let dest = self.path.join(name);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Read one byte past the declared size so an overlong stream is
        // caught instead of silently truncated.
        let mut file = tokio::fs::File::create(&dest).await?;
        let mut limited = content.take(size.saturating_add(1));
        let written = tokio::io::copy(&mut limited, &mut file).await?;
        file.flush().await?;
        drop(file);

        if written != size {
            if let Err(e) = tokio::fs::remove_file(&dest).await {
                warn!(path = %dest.display(), error = %e, "could not remove partial write");
            }
            return Err(Error::SizeMismatch {
                declared: size,
                actual: written,
            });
        }

        let metadata = tokio::fs::metadata(&dest).await?;
        let item_name = self.relative_name(&dest);
        Ok(Box::new(FsItem::from_metadata(dest, item_name, &metadata)))
    }

    /// Fails with [`Error::NotFound`] when the item is already absent.
    async fn remove_item(&self, id: &str) -> Result<()> {
        let (path, _) = self.stat_file(id).await?;
        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound(format!("item '{id}'"))
            } else {
                Error::Io(e)
            }
        })
    }
}

/// Validate a name for `put`: relative, and never escaping the container
fn validate_item_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidPath("item name cannot be empty".into()));
    }
    let path = Path::new(name);
    if path.is_absolute() {
        return Err(Error::InvalidPath(format!(
            "item name '{name}' must be relative"
        )));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(Error::InvalidPath(format!(
            "item name '{name}' contains parent directory components"
        )));
    }
    Ok(())
}

fn walk_error(err: walkdir::Error, container: &str) -> Error {
    let root_missing = err.depth() == 0
        && err
            .io_error()
            .is_some_and(|io| io.kind() == ErrorKind::NotFound);
    if root_missing {
        Error::NotFound(format!("container '{container}'"))
    } else {
        Error::Backend(err.to_string())
    }
}
