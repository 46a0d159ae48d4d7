//! Error types for songplay-etl
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for songplay-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Engine Errors
    // ============================================================================
    #[error("Engine initialization failed: {message}")]
    EngineInit { message: String },

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to load dataset '{dataset}': {message}")]
    Load { dataset: String, message: String },

    #[error("Failed to write table '{table}': {message}")]
    Write { table: String, message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Invalid storage location '{location}': {message}")]
    InvalidLocation { location: String, message: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an engine initialization error
    pub fn engine_init(message: impl Into<String>) -> Self {
        Self::EngineInit {
            message: message.into(),
        }
    }

    /// Create a dataset load error
    pub fn load(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            dataset: dataset.into(),
            message: message.into(),
        }
    }

    /// Create a table write error
    pub fn write(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an invalid location error
    pub fn invalid_location(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Whether the error was raised before any data was touched
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
                | Error::EngineInit { .. }
                | Error::InvalidLocation { .. }
                | Error::FileNotFound { .. }
        )
    }
}

/// Result type alias for songplay-etl
pub type Result<T> = std::result::Result<T, Error>;
