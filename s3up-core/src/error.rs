use std::path::PathBuf;

use thiserror::Error;

use crate::contract::BoxError;

/// Fatal errors raised while loading the credentials file, before any upload starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine home directory for the credentials file")]
    NoHomeDir,

    #[error("invalid config file: failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing config for bucket: {0}")]
    MissingBucket(String),
}

/// Errors scoped to a single input. Reported per file, never fatal to the run.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unable to read file: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read file: not found: {0}")]
    NotFound(String),

    #[error("unable to read file: {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    Storage(#[source] BoxError),

    #[error("upload task for {identifier} aborted: {reason}")]
    TaskFailed { identifier: String, reason: String },
}

impl UploadError {
    /// Short machine-friendly name, used as a tracing field.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Io { .. } => "io",
            UploadError::NotFound(_) => "not_found",
            UploadError::Network { .. } => "network",
            UploadError::Storage(_) => "storage",
            UploadError::TaskFailed { .. } => "task_failed",
        }
    }
}
