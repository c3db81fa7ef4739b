//! Filesystem-backed items
//!
//! An item is a regular file somewhere under its container's directory.
//! Its identifier is the absolute path, its name is the path relative to
//! the container with `/` separators.

use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use depot_core::{Content, Error, Item, ItemMeta, Result};

/// An item backed by a regular file
#[derive(Debug)]
pub struct FsItem {
    id: String,
    name: String,
    path: PathBuf,
    meta: ItemMeta,
}

impl FsItem {
    pub(crate) fn from_metadata(path: PathBuf, name: String, metadata: &std::fs::Metadata) -> Self {
        let meta = ItemMeta {
            size: Some(metadata.len()),
            last_modified: metadata
                .modified()
                .ok()
                .and_then(|t| jiff::Timestamp::try_from(t).ok()),
            etag: None,
            storage_class: None,
        };
        Self {
            id: path.to_string_lossy().into_owned(),
            name,
            path,
            meta,
        }
    }
}

#[async_trait]
impl Item for FsItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn meta(&self) -> &ItemMeta {
        &self.meta
    }

    fn url(&self) -> Url {
        Url::from_file_path(&self.path).expect("item paths are absolute")
    }

    async fn open(&self) -> Result<Content> {
        let file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("item '{}'", self.id))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Content::new(file))
    }
}
