//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for docsite-index operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Failure tied to a single source or output file.
///
/// These never abort a build on their own: the pipeline reports them as warnings
/// and skips the offending file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read (missing, permissions, not UTF-8).
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not valid CSS doc JSON.
    #[error("could not decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A generated artifact could not be written.
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An include pattern is not a valid glob.
    #[error("invalid include pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl SourceError {
    /// Path of the file the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. } | Self::Decode { path, .. } | Self::Write { path, .. } => {
                Some(path)
            }
            Self::Pattern { .. } => None,
        }
    }
}
