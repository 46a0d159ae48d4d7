//! Pipeline configuration
//!
//! The pipeline runs with no arguments against two hardcoded storage base
//! locations. A YAML file may override any of the defaults and carries the
//! object-storage credentials.
//!
//! ```yaml
//! input_data: s3a://udacity-dend/
//! output_data: s3a://june-dend/
//! credentials:
//!   access_key_id: AKIA...
//!   secret_access_key: ...
//! transform:
//!   timezone: UTC
//!   join_key: title
//! ```

use crate::error::{Error, Result};
use crate::storage::Location;
use crate::transform::TimestampRule;
use crate::types::{Compression, JoinKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default source bucket
pub const DEFAULT_INPUT_DATA: &str = "s3a://udacity-dend/";

/// Default destination bucket
pub const DEFAULT_OUTPUT_DATA: &str = "s3a://june-dend/";

/// Config file read from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "dl.yaml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base location of the raw datasets
    #[serde(default = "default_input_data")]
    pub input_data: String,

    /// Base location the star schema is written to
    #[serde(default = "default_output_data")]
    pub output_data: String,

    /// Song metadata glob, relative to `input_data`
    #[serde(default = "default_song_data")]
    pub song_data: String,

    /// Activity log glob, relative to `input_data`
    #[serde(default = "default_log_data")]
    pub log_data: String,

    /// Object-storage credentials
    #[serde(default)]
    pub credentials: Credentials,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineSettings,

    /// Transformation options
    #[serde(default)]
    pub transform: TransformSettings,

    /// Output options
    #[serde(default)]
    pub output: OutputSettings,
}

fn default_input_data() -> String {
    DEFAULT_INPUT_DATA.to_string()
}

fn default_output_data() -> String {
    DEFAULT_OUTPUT_DATA.to_string()
}

fn default_song_data() -> String {
    "song-data/A/A/A/*.json".to_string()
}

fn default_log_data() -> String {
    "log_data/*/*/*.json".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_data: default_input_data(),
            output_data: default_output_data(),
            song_data: default_song_data(),
            log_data: default_log_data(),
            credentials: Credentials::default(),
            engine: EngineSettings::default(),
            transform: TransformSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Access keys for S3-compatible storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// `AWS_ACCESS_KEY_ID`
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// `AWS_SECRET_ACCESS_KEY`
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Bucket region
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint (MinIO, R2, ...)
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_region() -> String {
    "us-west-2".to_string()
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: default_region(),
            endpoint: None,
        }
    }
}

impl Credentials {
    /// Fill missing keys from the standard AWS environment variables
    pub fn with_env_fallback(mut self) -> Self {
        if self.access_key_id.is_none() {
            self.access_key_id = std::env::var("AWS_ACCESS_KEY_ID").ok();
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok();
        }
        if self.endpoint.is_none() {
            self.endpoint = std::env::var("AWS_ENDPOINT").ok();
        }
        self
    }

    /// Both access keys, or the name of the first one missing
    pub fn key_pair(&self) -> Result<(&str, &str)> {
        let key_id = self
            .access_key_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("credentials.access_key_id"))?;
        let secret = self
            .secret_access_key
            .as_deref()
            .ok_or_else(|| Error::missing_field("credentials.secret_access_key"))?;
        Ok((key_id, secret))
    }
}

/// Engine tuning knobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Worker threads (engine default when unset)
    #[serde(default)]
    pub threads: Option<usize>,

    /// Memory limit, e.g. `"4GB"`
    #[serde(default)]
    pub memory_limit: Option<String>,
}

/// Transformation options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformSettings {
    /// Rule turning `ts` into `start_time`
    #[serde(default)]
    pub timezone: TimestampRule,

    /// Predicate matching log records to catalog songs
    #[serde(default)]
    pub join_key: JoinKey,

    /// Restrict songplays to log records with this `page` value
    #[serde(default)]
    pub songplay_page: Option<String>,
}

/// Output options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Parquet compression codec
    #[serde(default)]
    pub compression: Compression,
}

// ============================================================================
// Loading
// ============================================================================

impl PipelineConfig {
    /// Parsed input base location
    pub fn input_location(&self) -> Result<Location> {
        Location::parse(&self.input_data)
    }

    /// Parsed output base location
    pub fn output_location(&self) -> Result<Location> {
        Location::parse(&self.output_data)
    }

    /// Whether any location needs object-storage credentials
    pub fn needs_credentials(&self) -> Result<bool> {
        Ok(self.input_location()?.is_remote() || self.output_location()?.is_remote())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.input_location()?;
        self.output_location()?;

        if self.song_data.trim().is_empty() {
            return Err(Error::invalid_value("song_data", "pattern cannot be empty"));
        }
        if self.log_data.trim().is_empty() {
            return Err(Error::invalid_value("log_data", "pattern cannot be empty"));
        }
        if self.engine.threads == Some(0) {
            return Err(Error::invalid_value("engine.threads", "must be at least 1"));
        }
        if let Some(page) = &self.transform.songplay_page {
            if page.trim().is_empty() {
                return Err(Error::invalid_value(
                    "transform.songplay_page",
                    "cannot be empty when set",
                ));
            }
        }

        Ok(())
    }
}

/// Load a pipeline configuration from a YAML file
///
/// Credentials missing from the file are taken from the environment.
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a pipeline configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<PipelineConfig> {
    let mut config: PipelineConfig = if yaml.trim().is_empty() {
        PipelineConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    config.credentials = config.credentials.with_env_fallback();
    config.validate()?;
    Ok(config)
}

/// Load `path` if given, else `dl.yaml` when present, else the defaults
pub fn resolve_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => load_config_from_str(""),
    }
}
