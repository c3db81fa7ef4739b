//! Storage contract traits
//!
//! These traits define the backend-neutral view of a storage endpoint: a
//! `Location` holds `Container`s, a `Container` holds `Item`s. The CLI and
//! library callers program against these traits only, so a filesystem tree
//! and an S3-compatible service are interchangeable behind them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::content::Content;
use crate::error::Result;

/// Metadata describing a stored item
///
/// Every field is optional because backends differ in what they report.
/// For any single item the populated fields are stable across repeated
/// metadata fetches as long as the item itself is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads), stored without quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Storage class, for backends that report one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// One page of a listing
///
/// `cursor` is `None` when the listing is exhausted, otherwise an opaque
/// token that resumes the traversal when passed back to the same listing
/// call. Tokens are only meaningful for the listing they came from.
#[derive(Debug)]
pub struct Page<T> {
    /// Entries in this page, at most the location's configured page size
    pub entries: Vec<T>,

    /// Resume token for the next page, `None` at the end
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// Map the entries of this page, keeping the cursor
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            entries: self.entries.into_iter().map(f).collect(),
            cursor: self.cursor,
        }
    }
}

/// A storage endpoint holding containers
///
/// Implementations are cheap to share behind `Box<dyn Location>`; all
/// methods take `&self` and may be called concurrently.
#[async_trait]
pub trait Location: Send + Sync {
    /// Page size applied to every listing made through this location
    fn page_size(&self) -> usize;

    /// Create a container named `name`
    ///
    /// Fails with [`Error::AlreadyExists`](crate::Error::AlreadyExists)
    /// when the name is taken, or a backend error when the name is
    /// rejected outright.
    async fn create_container(&self, name: &str) -> Result<Box<dyn Container>>;

    /// Fetch a single container by its identifier
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when no such
    /// container exists.
    async fn container(&self, id: &str) -> Result<Box<dyn Container>>;

    /// List containers whose names start with `prefix`
    ///
    /// Pass `cursor: None` to start from the beginning and feed each
    /// returned `Page::cursor` back in to continue. An empty prefix
    /// matches everything.
    async fn containers(&self, prefix: &str, cursor: Option<&str>)
    -> Result<Page<Box<dyn Container>>>;

    /// Remove a container by its identifier
    ///
    /// Whether removing an absent container is an error is backend
    /// policy; see the adapter docs.
    async fn remove_container(&self, id: &str) -> Result<()>;

    /// Resolve a URL produced by [`Item::url`] back to its item
    ///
    /// The URL must use this location's scheme and address an item inside
    /// this location's namespace; anything else is an error. The returned
    /// item carries populated metadata.
    async fn item_by_url(&self, url: &Url) -> Result<Box<dyn Item>>;

    /// Release any resources held by this location
    ///
    /// Call once when done. The default is a no-op for adapters that hold
    /// no persistent connection.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A named collection of items inside a location
#[async_trait]
pub trait Container: Send + Sync + std::fmt::Debug {
    /// Backend identifier, usable with [`Location::container`]
    fn id(&self) -> &str;

    /// Short name, usable for display and for [`Location::create_container`] collisions
    fn name(&self) -> &str;

    /// Fetch a single item by its identifier
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when no such
    /// item exists. The returned item carries populated metadata.
    async fn item(&self, id: &str) -> Result<Box<dyn Item>>;

    /// List items whose names start with `prefix`
    ///
    /// Same cursor protocol as [`Location::containers`]. An empty prefix
    /// matches everything.
    async fn items(&self, prefix: &str, cursor: Option<&str>) -> Result<Page<Box<dyn Item>>>;

    /// Store `content` under `name`, overwriting any existing item
    ///
    /// `size` declares how many bytes `content` will yield; the write
    /// fails with [`Error::SizeMismatch`](crate::Error::SizeMismatch) when
    /// the stream disagrees. On success the returned item reflects what
    /// the backend reported about the stored object.
    async fn put(&self, name: &str, content: Content, size: u64) -> Result<Box<dyn Item>>;

    /// Remove an item by its identifier
    ///
    /// Whether removing an absent item is an error is backend policy; see
    /// the adapter docs.
    async fn remove_item(&self, id: &str) -> Result<()>;
}

/// A single stored object
#[async_trait]
pub trait Item: Send + Sync + std::fmt::Debug {
    /// Backend identifier, usable with [`Container::item`]
    fn id(&self) -> &str;

    /// Name relative to the containing container
    fn name(&self) -> &str;

    /// Metadata captured when this handle was produced
    fn meta(&self) -> &ItemMeta;

    /// Self-describing URL, resolvable via [`Location::item_by_url`]
    fn url(&self) -> Url;

    /// Open the item's content for reading from the start
    ///
    /// Each call returns an independent reader.
    async fn open(&self) -> Result<Content>;
}
