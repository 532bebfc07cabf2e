//! Error types for configuration store operations.

use std::{io, path::PathBuf, result};

/// Errors that can occur while loading, editing or saving layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No persisted layer matched the configured scope.
    #[error("no configuration available in '{}'{}", dir.display(), name.as_deref().map(|n| format!(" for '{n}'")).unwrap_or_default())]
    NotFound { dir: PathBuf, name: Option<String> },

    /// A persisted layer exists but could not be decoded.
    #[error("failed to decode '{}': {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// A layer could not be encoded for writing.
    #[error("failed to encode layer: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Reading or writing a persisted layer failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value was rejected before touching the store.
    #[error("{0}")]
    Validation(String),

    /// A font backend collaborator reported a failure.
    #[error("font backend error: {0}")]
    Backend(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for [`Error::NotFound`], which callers usually treat as "start empty".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = result::Result<T, Error>;
