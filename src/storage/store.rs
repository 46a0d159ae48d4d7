//! Output housekeeping over `object_store`
//!
//! The engine writes table files itself. This store clears a table's prior
//! output before each write (overwrite semantics) and lists what was written.

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::schema::TableDef;
use crate::storage::Location;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// Handle on the output location
#[derive(Debug, Clone)]
pub struct OutputStore {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base location
    location: Location,
}

impl OutputStore {
    /// Create a store for `location`
    ///
    /// Local roots are created if missing. S3 requires both access keys.
    pub fn new(location: &Location, credentials: &Credentials) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match location {
            Location::S3 { bucket, .. } => {
                let (key_id, secret) = credentials.key_pair()?;
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(bucket)
                    .with_region(&credentials.region)
                    .with_access_key_id(key_id)
                    .with_secret_access_key(secret);

                if let Some(endpoint) = &credentials.endpoint {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }

                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;
                Arc::new(store)
            }
            Location::Local { root } => {
                std::fs::create_dir_all(root).map_err(|e| {
                    Error::config(format!(
                        "Failed to create directory {}: {e}",
                        root.display()
                    ))
                })?;
                let store = LocalFileSystem::new_with_prefix(root)
                    .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;
                Arc::new(store)
            }
        };

        Ok(Self {
            store,
            location: location.clone(),
        })
    }

    /// The output base location
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Remove everything previously written for `table`
    ///
    /// Returns the number of objects removed. Local table directories are
    /// recreated empty so the engine can write into them.
    pub async fn clear_table(&self, table: &TableDef) -> Result<usize> {
        let removed = match &self.location {
            Location::Local { root } => {
                let dir = root.join(table.dir_name());
                let removed = self.list_table_files(table).await?.len();
                if tokio::fs::try_exists(&dir).await? {
                    tokio::fs::remove_dir_all(&dir).await?;
                }
                tokio::fs::create_dir_all(&dir).await?;
                removed
            }
            Location::S3 { .. } => {
                let prefix = self.table_prefix(table);
                let objects: Vec<_> = self.store.list(Some(&prefix)).try_collect().await?;
                for object in &objects {
                    self.store.delete(&object.location).await?;
                }
                objects.len()
            }
        };

        tracing::debug!(
            "Cleared {} object(s) under {}",
            removed,
            self.location.table_uri(table)
        );
        Ok(removed)
    }

    /// Files currently stored for `table`, relative to the table directory
    ///
    /// Sorted, e.g. `year=2018/month=11/data_0.parquet`.
    pub async fn list_table_files(&self, table: &TableDef) -> Result<Vec<String>> {
        let prefix = self.table_prefix(table);
        let strip = format!("{prefix}/");

        let objects: Vec<_> = self.store.list(Some(&prefix)).try_collect().await?;
        let mut files: Vec<String> = objects
            .into_iter()
            .map(|meta| {
                let key = meta.location.to_string();
                key.strip_prefix(&strip).map(str::to_string).unwrap_or(key)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn table_prefix(&self, table: &TableDef) -> ObjectPath {
        ObjectPath::from(self.location.object_key(&table.dir_name()))
    }
}
