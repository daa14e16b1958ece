//! Error types for bundle assembly.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `BundleError`.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Errors that can occur while materializing or persisting a bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// An external source file could not be opened or fully read.
    #[error("failed to read source file {path}: {source}")]
    SourceRead {
        /// The source file registered with the builder.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive writer failed while writing an entry.
    #[error("failed to write archive entry '{entry}': {source}")]
    EntryWrite {
        /// Archive name of the entry being written.
        entry: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The central directory could not be written when closing the archive.
    #[error("failed to finalize archive: {source}")]
    Finalize {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Two entries resolved to the same archive name.
    #[error("duplicate archive entry: {path}")]
    DuplicateEntry {
        /// The colliding archive name.
        path: String,
    },

    /// The destination file or its parent directory could not be written.
    #[error("failed to persist bundle to {path}: {source}")]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    /// Returns `true` if the failure came from reading an external source.
    ///
    /// # Examples
    ///
    /// ```
    /// use synbundle_core::BundleError;
    /// use std::path::PathBuf;
    ///
    /// let err = BundleError::SourceRead {
    ///     path: PathBuf::from("missing.bin"),
    ///     source: std::io::Error::from(std::io::ErrorKind::NotFound),
    /// };
    /// assert!(err.is_source_failure());
    /// assert!(!err.is_sink_failure());
    /// ```
    #[must_use]
    pub const fn is_source_failure(&self) -> bool {
        matches!(self, Self::SourceRead { .. })
    }

    /// Returns `true` if the failure came from writing the archive or the
    /// destination file.
    #[must_use]
    pub const fn is_sink_failure(&self) -> bool {
        matches!(
            self,
            Self::EntryWrite { .. } | Self::Finalize { .. } | Self::Persist { .. }
        )
    }

    /// Returns the filesystem path involved in the failure, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceRead { path, .. } | Self::Persist { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the archive entry name involved in the failure, if any.
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        match self {
            Self::EntryWrite { entry, .. } => Some(entry),
            Self::DuplicateEntry { path } => Some(path),
            _ => None,
        }
    }
}
