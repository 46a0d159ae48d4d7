//! Execution context provider
//!
//! Wraps the embedded DuckDB engine that does all the heavy lifting: JSON
//! scanning, projection, deduplication, the join, and partitioned Parquet
//! writes (local or S3).

mod context;
pub mod sql;

pub use context::{EtlContext, SINGLE_FILE_NAME};
