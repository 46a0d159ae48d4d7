#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # songplay-etl
//!
//! Batch ETL that reads raw song metadata and user activity logs (JSON) from
//! object storage and writes a star schema back as partitioned Parquet:
//!
//! | Table | Unique by | Partitioned by |
//! |---|---|---|
//! | `songs` | `song_id` | `year`, `artist_id` |
//! | `artists` | `artist_id` | - |
//! | `users` | `userId` | - |
//! | `time` | `start_time` | `year`, `month` |
//! | `songplays` | `songplay_id` | `year`, `month` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use songplay_etl::{load_config, Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config("dl.yaml")?;
//!     let summary = Pipeline::new(config).run().await?;
//!     println!("{} rows written", summary.total_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────── Pipeline ─────────────────────────────┐
//! │  SongCatalogTransformer  ──►  ActivityLogTransformer              │
//! │   songs, artists               users, time, songplays             │
//! └───────────────┬───────────────────────────────┬───────────────────┘
//!                 │                               │
//!        ┌────────┴────────┐             ┌────────┴────────┐
//!        │   EtlContext    │             │   OutputStore   │
//!        │ DuckDB + httpfs │             │  object_store   │
//!        │ read / join /   │             │ clear / list    │
//!        │ COPY TO parquet │             │                 │
//!        └─────────────────┘             └─────────────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types
pub mod types;

/// Pipeline configuration
pub mod config;

/// Raw input schemas and the output star schema
pub mod schema;

/// Input/output storage locations
pub mod storage;

/// Execution context (DuckDB)
pub mod engine;

/// Song catalog and activity log transformers
pub mod transform;

/// Orchestrator
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{load_config, load_config_from_str, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunSummary};
