//! depot-s3: S3-compatible object store adapter for depot
//!
//! Implements the depot-core storage contract on top of aws-sdk-s3.
//! Buckets are containers and objects are items; object listings use the
//! service's native continuation tokens as cursors, while bucket listings
//! fall back to client-side pagination. This is the only crate that
//! depends on the AWS SDK.

pub mod container;
pub mod item;
pub mod location;

pub use container::S3Container;
pub use item::S3Item;
pub use location::S3Location;
