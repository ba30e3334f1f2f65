//! Error taxonomy for packaging runs.
//!
//! The three variants here are the failures a caller can meaningfully react
//! to; everything else (plain I/O trouble, descriptor write failures)
//! propagates as `anyhow::Error` with context naming the failed operation.
//! None of these are retried automatically: partial staging state may exist
//! after a failure, so a retry is a full re-run that relies on the pipeline
//! deleting the stale staging root first.

use thiserror::Error;

/// A failure that aborts the packaging run.
#[derive(Debug, Error)]
pub enum PackageError {
    /// Invalid run configuration: a file mapping missing its source list or
    /// destination, or a post-package destination that is not a directory.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The packaging tool could not be spawned or exited non-zero.
    #[error("`{command}` failed: {reason}")]
    ExternalTool { command: String, reason: String },

    /// The post-package callback reported an error.
    #[error("post-package callback failed: {cause}")]
    Callback { cause: anyhow::Error },
}
