//! depot-fs: Local filesystem adapter for depot
//!
//! Implements the depot-core storage contract on top of a local directory
//! tree: the profile target is the location root, each direct
//! subdirectory is a container, and every regular file below a container
//! is an item. Listings are materialized and paginated client-side since
//! the filesystem has no native cursor protocol.

pub mod container;
pub mod item;
pub mod location;

pub use container::FsContainer;
pub use item::FsItem;
pub use location::FsLocation;
