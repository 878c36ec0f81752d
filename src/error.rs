//! Error types
//!
//! Callers of [`DataSet`](crate::DataSet) operations only ever see
//! [`DataSetError`]. Versioning failures are raised as [`VersionError`] by the
//! resolver and travel inside a `DataSetError` as its cause.

use crate::dataset::Description;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of versioned path resolution and the post-save consistency check
#[derive(Debug, Error)]
pub enum VersionError {
    /// No saved version of the data set could be located
    #[error("Did not find any versions for `{}`", path.display())]
    NotFound {
        /// Base filepath of the data set
        path: PathBuf,
    },

    /// The path the data would be loaded from is not the path just written
    #[error(
        "Save path `{}` did not match load path `{}`",
        save_path.display(),
        load_path.display()
    )]
    Inconsistent {
        /// Absolute load path
        load_path: PathBuf,
        /// Absolute save path
        save_path: PathBuf,
    },

    /// A file already exists at the versioned save path
    #[error("Save path `{}` already exists; saved versions are never overwritten", path.display())]
    AlreadyExists {
        /// Versioned save path
        path: PathBuf,
    },

    /// Listing or probing the version directory failed
    #[error("I/O error while resolving versions under `{}`", path.display())]
    Io {
        /// Path being inspected
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Error returned by every data set operation
///
/// The message carries the data set [`Description`], followed by the cause.
#[derive(Debug, Error)]
pub enum DataSetError {
    /// `load()` failed
    #[error("Failed while loading data from data set {description}.\n{source:#}")]
    Load {
        /// Configuration of the failing data set
        description: Description,
        /// Underlying cause
        source: anyhow::Error,
    },

    /// `save()` failed
    #[error("Failed while saving data to data set {description}.\n{source:#}")]
    Save {
        /// Configuration of the failing data set
        description: Description,
        /// Underlying cause
        source: anyhow::Error,
    },

    /// `exists()` hit an unexpected I/O fault
    #[error("Failed during exists check for data set {description}.\n{source:#}")]
    Exists {
        /// Configuration of the failing data set
        description: Description,
        /// Underlying cause
        source: anyhow::Error,
    },
}

impl DataSetError {
    /// Description of the data set that failed
    #[must_use]
    pub const fn description(&self) -> &Description {
        match self {
            Self::Load { description, .. }
            | Self::Save { description, .. }
            | Self::Exists { description, .. } => description,
        }
    }

    /// Versioning failure behind this error, if that was the cause
    #[must_use]
    pub fn version_error(&self) -> Option<&VersionError> {
        let source = match self {
            Self::Load { source, .. } | Self::Save { source, .. } | Self::Exists { source, .. } => {
                source
            }
        };
        source.chain().find_map(|cause| cause.downcast_ref::<VersionError>())
    }
}

/// Result alias for data set operations
pub type Result<T, E = DataSetError> = std::result::Result<T, E>;
