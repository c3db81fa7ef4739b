//! depot-core: Backend-agnostic storage contract for depot
//!
//! This crate defines the storage abstraction the rest of depot is built
//! on, including:
//! - The Location / Container / Item traits
//! - Streamed item content
//! - Cursor-based pagination shared by all listings
//! - The error taxonomy adapters map their failures onto
//! - Configuration and profile management
//!
//! This crate is independent of any concrete backend; the adapters in
//! depot-fs and depot-s3 implement its traits.

pub mod config;
pub mod content;
pub mod cursor;
pub mod error;
pub mod path;
pub mod profile;
pub mod traits;

pub use config::{Config, ConfigManager, SCHEMA_VERSION};
pub use content::Content;
pub use error::{Error, Result};
pub use path::StorePath;
pub use profile::{BackendKind, DEFAULT_PAGE_SIZE, Profile, ProfileManager};
pub use traits::{Container, Item, ItemMeta, Location, Page};
