//! Common types used throughout songplay-etl
//!
//! Small enums shared by the configuration, the engine and the transformers.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Join Key
// ============================================================================

/// Predicate used to match log records against the song catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// `log.song = song.title` only. Songs sharing a title fan out.
    #[default]
    Title,
    /// `log.song = song.title AND log.artist = song.artist_name`
    TitleAndArtist,
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::Title => write!(f, "title"),
            JoinKey::TitleAndArtist => write!(f, "title_and_artist"),
        }
    }
}

// ============================================================================
// Parquet Compression
// ============================================================================

/// Compression codec for written Parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    Uncompressed,
}

impl Compression {
    /// Codec name as understood by the engine's `COPY ... (COMPRESSION ...)`
    pub fn as_sql(&self) -> &'static str {
        match self {
            Compression::Snappy => "snappy",
            Compression::Zstd => "zstd",
            Compression::Gzip => "gzip",
            Compression::Uncompressed => "uncompressed",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
