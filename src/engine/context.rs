//! DuckDB execution context
//!
//! One in-memory DuckDB connection per run, configured with the `httpfs`
//! extension and S3 credentials when a remote location is involved. Both
//! transformers borrow the same context.

use crate::config::{Credentials, EngineSettings, PipelineConfig};
use crate::engine::sql::{self, quote_literal};
use crate::error::{Error, Result};
use crate::schema::{RawSchema, TableDef};
use crate::types::Compression;
use duckdb::Connection;

/// File name of single-file table writes
pub const SINGLE_FILE_NAME: &str = "data_0.parquet";

/// Shared handle to the processing engine
pub struct EtlContext {
    /// DuckDB connection
    conn: Connection,
    /// Codec for every Parquet write
    compression: Compression,
    /// Whether object storage was configured
    remote: bool,
}

impl EtlContext {
    /// Create the context for a pipeline run
    ///
    /// Fails if the storage extension cannot be loaded or a remote location
    /// lacks credentials. Nothing is retried.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::engine_init(format!("Failed to create DuckDB connection: {e}")))?;

        let context = Self {
            conn,
            compression: config.output.compression,
            remote: config.needs_credentials()?,
        };

        context.apply_settings(&config.engine)?;
        if context.remote {
            context.configure_object_storage(&config.credentials)?;
        }

        tracing::debug!(
            "Engine ready (remote storage: {}, compression: {})",
            context.remote,
            context.compression
        );
        Ok(context)
    }

    /// Apply thread and memory settings
    fn apply_settings(&self, settings: &EngineSettings) -> Result<()> {
        if let Some(threads) = settings.threads {
            self.conn
                .execute_batch(&format!("SET threads = {threads};"))
                .map_err(|e| Error::engine_init(format!("Failed to set threads: {e}")))?;
        }
        if let Some(limit) = &settings.memory_limit {
            self.conn
                .execute_batch(&format!("SET memory_limit = {};", quote_literal(limit)))
                .map_err(|e| Error::engine_init(format!("Failed to set memory_limit: {e}")))?;
        }
        Ok(())
    }

    /// Load `httpfs` and push S3 credentials into the engine
    fn configure_object_storage(&self, credentials: &Credentials) -> Result<()> {
        let (key_id, secret) = credentials.key_pair()?;

        self.conn
            .execute_batch("INSTALL httpfs; LOAD httpfs;")
            .map_err(|e| Error::engine_init(format!("Failed to load httpfs extension: {e}")))?;

        self.conn
            .execute_batch(&format!(
                "SET s3_access_key_id = {}; SET s3_secret_access_key = {}; SET s3_region = {};",
                quote_literal(key_id),
                quote_literal(secret),
                quote_literal(&credentials.region)
            ))
            .map_err(|e| Error::engine_init(format!("Failed to configure S3: {e}")))?;

        // R2, MinIO, etc.
        if let Some(endpoint) = &credentials.endpoint {
            let use_ssl = !endpoint.starts_with("http://");
            self.conn
                .execute_batch(&format!(
                    "SET s3_endpoint = {}; SET s3_url_style = 'path'; SET s3_use_ssl = {use_ssl};",
                    quote_literal(
                        endpoint
                            .trim_start_matches("https://")
                            .trim_start_matches("http://")
                    )
                ))
                .map_err(|e| Error::engine_init(format!("Failed to configure S3 endpoint: {e}")))?;
        }

        Ok(())
    }

    /// Underlying connection, for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute one or more statements
    pub fn execute_batch(&self, statements: &str) -> Result<()> {
        tracing::debug!("Executing: {}", statements);
        self.conn.execute_batch(statements)?;
        Ok(())
    }

    /// Count the files matching a glob pattern
    pub fn count_files(&self, pattern: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM glob({})", quote_literal(pattern));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Register a view named `name` over every JSON file matching `pattern`
    ///
    /// The view re-reads the files each time it is queried. When no file
    /// matches, the view is typed and empty. Returns the matched file count.
    pub fn register_json_source(
        &self,
        name: &str,
        schema: &RawSchema,
        pattern: &str,
    ) -> Result<usize> {
        let files = self
            .count_files(pattern)
            .map_err(|e| Error::load(schema.dataset, format!("Failed to list {pattern}: {e}")))?;

        let body = if files == 0 {
            tracing::warn!("No files match {}; {} is empty", pattern, schema.dataset);
            schema.empty_select()
        } else {
            sql::read_json_sql(schema, pattern)
        };

        self.conn
            .execute_batch(&format!(
                "CREATE OR REPLACE TEMP VIEW {} AS {body};",
                sql::quote_ident(name)
            ))
            .map_err(|e| Error::load(schema.dataset, e.to_string()))?;

        Ok(files)
    }

    /// Write `query` as `table` under `table_uri`, returning the row count
    ///
    /// Partitioned tables get a Hive layout below `table_uri`; other tables,
    /// and partitioned tables with no rows, get a single `data_0.parquet`.
    /// The caller clears previous output first.
    pub fn write_table(&self, table: &TableDef, query: &str, table_uri: &str) -> Result<usize> {
        let projected = sql::project_table_sql(table, query);
        let single_file = format!("{}/{SINGLE_FILE_NAME}", table_uri.trim_end_matches('/'));

        if !table.is_partitioned() {
            let copy_sql =
                sql::copy_to_parquet_sql(&projected, &single_file, &[], self.compression);
            return self.copy(table, &copy_sql);
        }

        let copy_sql =
            sql::copy_to_parquet_sql(&projected, table_uri, table.partition_by, self.compression);
        let rows = self.copy(table, &copy_sql)?;
        if rows > 0 {
            return Ok(rows);
        }

        // No partitions were created; keep the table readable with its schema
        let empty = format!("{projected} LIMIT 0");
        let copy_sql = sql::copy_to_parquet_sql(&empty, &single_file, &[], self.compression);
        self.copy(table, &copy_sql)
    }

    /// Run a `COPY` statement, returning the number of rows it wrote
    fn copy(&self, table: &TableDef, copy_sql: &str) -> Result<usize> {
        tracing::debug!("Executing query: {}", copy_sql);
        self.conn
            .execute(copy_sql, [])
            .map_err(|e| Error::write(table.name, format!("Failed to write Parquet: {e}")))
    }
}
