//! Orchestrator
//!
//! Runs the song catalog stage to completion, then the activity log stage,
//! sharing one execution context. There is no rollback: if the log stage
//! fails, the song stage's tables stay written.

use crate::config::PipelineConfig;
use crate::engine::EtlContext;
use crate::error::Result;
use crate::storage::OutputStore;
use crate::transform::{ActivityLogTransformer, SongCatalogTransformer, TableSummary};
use serde::Serialize;
use std::time::Instant;

/// Result of a full pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Source base location
    pub input: String,
    /// Destination base location
    pub output: String,
    /// Every written table, in write order
    pub tables: Vec<TableSummary>,
    /// Wall time of the whole run
    pub duration_ms: u64,
}

impl RunSummary {
    /// Summary of one table by name
    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|t| t.table == name)
    }

    /// Total rows over all tables
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// The ETL pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline for a validated configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The pipeline's configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run both stages
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let input = self.config.input_location()?;
        let output = self.config.output_location()?;

        tracing::info!("Starting ETL run: {} -> {}", input, output);
        let context = EtlContext::new(&self.config)?;
        let store = OutputStore::new(&output, &self.config.credentials)?;

        let song_pattern = input.join(&self.config.song_data);
        let log_pattern = input.join(&self.config.log_data);

        let mut tables = SongCatalogTransformer::new(&context, &store)
            .run(&song_pattern)
            .await?;
        tracing::info!("process_song_data completed");

        tables.extend(
            ActivityLogTransformer::new(&context, &store, &self.config.transform)
                .run(&log_pattern, &song_pattern)
                .await?,
        );
        tracing::info!("process_log_data completed");

        let summary = RunSummary {
            input: input.to_string(),
            output: output.to_string(),
            tables,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            "ETL run finished: {} tables, {} rows in {}ms",
            summary.tables.len(),
            summary.total_rows(),
            summary.duration_ms
        );
        Ok(summary)
    }
}
