use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, MetaError>;

/// Canonical error surface for deckmeta.
///
/// Unresolved classifications are not here: a deck no rule matches (or two
/// archetypes claim) is a normal pipeline outcome carried in
/// `PipelineReport`. Likewise deleting a rule that does not exist is a
/// reported no-op, not a failure.
#[derive(Debug, Error)]
pub(crate) enum MetaError {
    #[error("I/O error at {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Malformed ruleset {path}: {reason}")]
    MalformedRuleset { path: PathBuf, reason: String },

    #[error("Malformed decklist document {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("Invalid rule: {reason}")]
    InvalidRule { reason: String },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

impl MetaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}
