//! Storage module
//!
//! Parses the input/output base locations (S3 or local filesystem), builds
//! engine-addressable dataset and table URIs, and keeps table outputs in an
//! overwrite-only state through `object_store`.

mod location;
mod store;

pub use location::Location;
pub use store::OutputStore;
