//! Warning sink passed through a build.
//!
//! Every warning is forwarded to `tracing` and also kept, so callers (and tests)
//! can inspect what a build skipped without scraping log output.

use crate::error::SourceError;
use std::path::{Path, PathBuf};

/// A non-fatal problem encountered during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// File the problem relates to, if any.
    pub path: Option<PathBuf>,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning, optionally tied to a file.
    pub fn warn(&mut self, path: Option<&Path>, message: impl Into<String>) {
        let message = message.into();
        match path {
            Some(path) => tracing::warn!(path = %path.display(), "{}", message),
            None => tracing::warn!("{}", message),
        }
        self.warnings.push(Diagnostic {
            path: path.map(Path::to_path_buf),
            message,
        });
    }

    /// Record a file-boundary error as a warning.
    pub fn source_error(&mut self, error: &SourceError) {
        self.warn(error.path(), error.to_string());
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
