//! Transformers
//!
//! Two stages turn the raw datasets into the star schema:
//! - [`SongCatalogTransformer`] - song metadata → `songs`, `artists`
//! - [`ActivityLogTransformer`] - activity logs (+ song metadata) → `users`,
//!   `time`, `songplays`
//!
//! Each stage registers engine views over its inputs and writes every table
//! with [`write_output_table`]: clear prior output, write, list the result.

mod logs;
mod songs;
mod timestamp;

pub use logs::{ActivityLogTransformer, CATALOG_VIEW, EVENTS_VIEW, LOG_VIEW};
pub use songs::{SongCatalogTransformer, SONG_VIEW};
pub use timestamp::{TimeParts, TimestampRule};

use crate::engine::EtlContext;
use crate::error::Result;
use crate::schema::TableDef;
use crate::storage::OutputStore;
use serde::Serialize;
use std::time::Instant;

/// Outcome of writing one output table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    /// Table name
    pub table: String,
    /// Engine URI of the table directory
    pub path: String,
    /// Rows written
    pub rows: usize,
    /// Files written, relative to the table directory
    pub files: Vec<String>,
    /// Wall time of the write
    pub duration_ms: u64,
}

/// Overwrite `table` with the rows of `query`
pub async fn write_output_table(
    context: &EtlContext,
    output: &OutputStore,
    table: &TableDef,
    query: &str,
) -> Result<TableSummary> {
    let started = Instant::now();
    let path = output.location().table_uri(table);

    tracing::info!("Writing {} table to {}", table.name, path);
    output.clear_table(table).await?;
    let rows = context.write_table(table, query, &path)?;
    let files = output.list_table_files(table).await?;

    let duration_ms = started.elapsed().as_millis() as u64;
    tracing::info!(
        "{} completed: {} rows in {} file(s) ({}ms)",
        table.dir_name(),
        rows,
        files.len(),
        duration_ms
    );

    Ok(TableSummary {
        table: table.name.to_string(),
        path,
        rows,
        files,
        duration_ms,
    })
}
