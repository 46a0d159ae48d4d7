//! Storage locations (S3 or local filesystem)

use crate::error::{Error, Result};
use crate::schema::TableDef;
use std::fmt;
use std::path::PathBuf;

/// A base location the pipeline reads from or writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// S3 bucket with an optional key prefix (no leading/trailing slash)
    S3 { bucket: String, prefix: String },
    /// Local directory
    Local { root: PathBuf },
}

impl Location {
    /// Parse a base URL
    ///
    /// Supported formats:
    /// - `s3a://bucket/path/`, `s3://bucket/path/` - S3 (the `s3a` scheme is
    ///   accepted for compatibility and addressed as `s3`)
    /// - `file:///local/path`, `/local/path` or `./path` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::invalid_location(url, "location cannot be empty"));
        }

        for scheme in ["s3a://", "s3n://", "s3://"] {
            if let Some(rest) = url.strip_prefix(scheme) {
                return Self::parse_s3(url, rest);
            }
        }

        if let Some(path) = url.strip_prefix("file://") {
            return Ok(Location::Local {
                root: PathBuf::from(path),
            });
        }

        if let Some((scheme, _)) = url.split_once("://") {
            return Err(Error::invalid_location(
                url,
                format!("unsupported scheme '{scheme}'"),
            ));
        }

        Ok(Location::Local {
            root: PathBuf::from(url),
        })
    }

    fn parse_s3(url: &str, without_scheme: &str) -> Result<Self> {
        let (bucket, prefix) = match without_scheme.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix.trim_matches('/')),
            None => (without_scheme, ""),
        };

        if bucket.is_empty() {
            return Err(Error::invalid_location(url, "missing bucket name"));
        }

        Ok(Location::S3 {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }

    /// Whether this location lives in object storage
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::S3 { .. })
    }

    /// Engine-addressable URI of `relative` under this location
    ///
    /// `relative` may contain glob characters; it is appended verbatim.
    pub fn join(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        match self {
            Location::S3 { bucket, prefix } if prefix.is_empty() => {
                format!("s3://{bucket}/{relative}")
            }
            Location::S3 { bucket, prefix } => format!("s3://{bucket}/{prefix}/{relative}"),
            Location::Local { root } => root.join(relative).to_string_lossy().into_owned(),
        }
    }

    /// Engine-addressable URI of an output table directory
    pub fn table_uri(&self, table: &TableDef) -> String {
        self.join(&table.dir_name())
    }

    /// Object key of `relative` relative to the bucket (S3) or root (local)
    pub(crate) fn object_key(&self, relative: &str) -> String {
        let relative = relative.trim_matches('/');
        match self {
            Location::S3 { prefix, .. } if !prefix.is_empty() => format!("{prefix}/{relative}"),
            _ => relative.to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::S3 { bucket, prefix } if prefix.is_empty() => write!(f, "s3://{bucket}"),
            Location::S3 { bucket, prefix } => write!(f, "s3://{bucket}/{prefix}"),
            Location::Local { root } => write!(f, "{}", root.display()),
        }
    }
}
