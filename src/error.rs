// src/error.rs
// =============================================================================
// Typed errors for every layer below main.rs.
//
// main.rs works with anyhow::Result and only needs to know *which* of these
// happened to pick an exit code. Everything else gets a proper enum so tests
// can match on the variant instead of comparing strings.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Terminal outcome of a dispatch run that did not go cleanly.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// At least one link failed and errors were not tolerated.
    #[error("one or more links are broken")]
    LinksFailed,

    /// The sink refused a record. Only the first failure is kept.
    #[error("failed to write link record: {0}")]
    Sink(#[source] std::io::Error),
}

/// Command-line values that parsed but don't make sense together.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--max-retries must be at least 1")]
    ZeroRetries,

    #[error("--max-backoff ({max:?}) must not be shorter than --start-backoff ({start:?})")]
    BackoffInverted {
        start: std::time::Duration,
        max: std::time::Duration,
    },

    #[error("--concurrency must be at least 1")]
    ZeroConcurrency,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is not a markdown file: {0}")]
    NotMarkdown(PathBuf),
}
