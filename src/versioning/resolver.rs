//! Versioned path resolution
//!
//! # Layout
//!
//! ```text
//! data/cars.feather                                  unversioned
//! data/cars.feather/<version_id>/cars.feather        versioned
//! ```
//!
//! The base filepath doubles as the directory holding one subdirectory per
//! saved version.

use super::store::{is_absent, LocalFs, VersionStore};
use crate::error::VersionError;
use crate::version::{generate_timestamp, Version};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Computes load and save paths for a base filepath under a [`Version`]
#[derive(Debug, Clone, Default)]
pub struct VersionedPathResolver<S = LocalFs> {
    store: S,
}

impl<S: VersionStore> VersionedPathResolver<S> {
    /// Create a resolver reading filesystem state through `store`
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Store backing this resolver
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Path to read the data set from
    ///
    /// - no version: `base` itself
    /// - explicit load id: `base/<id>/<file name>` (existence not checked)
    /// - no load id: the greatest id under `base` that holds the file
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::NotFound`] if no saved version exists, or
    /// [`VersionError::Io`] if the version directory cannot be read.
    pub fn resolve_load_path(
        &self,
        base: &Path,
        version: Option<&Version>,
    ) -> Result<PathBuf, VersionError> {
        let Some(version) = version else {
            return Ok(base.to_path_buf());
        };

        match version.load() {
            Some(id) => Ok(versioned_path(base, id)),
            None => self.latest_version_path(base),
        }
    }

    /// Path to write the data set to; its parent directory is created
    ///
    /// - no version: `base` itself
    /// - explicit save id: `base/<id>/<file name>`
    /// - no save id: `base/<generated id>/<file name>`
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::AlreadyExists`] if the versioned path is
    /// already taken, or [`VersionError::Io`] if directories cannot be
    /// created.
    pub fn resolve_save_path(
        &self,
        base: &Path,
        version: Option<&Version>,
    ) -> Result<PathBuf, VersionError> {
        let path = match version {
            None => base.to_path_buf(),
            Some(version) => {
                let id = version
                    .save()
                    .map_or_else(generate_timestamp, str::to_string);
                let path = versioned_path(base, &id);
                if self.store.is_file(&path).map_err(|source| io_error(&path, source))? {
                    return Err(VersionError::AlreadyExists { path });
                }
                path
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.store
                .create_dir_all(parent)
                .map_err(|source| io_error(parent, source))?;
        }

        Ok(path)
    }

    fn latest_version_path(&self, base: &Path) -> Result<PathBuf, VersionError> {
        let mut versions = match self.store.list_dir(base) {
            Ok(versions) => versions,
            // Never saved, or still holding an unversioned file
            Err(e) if is_absent(&e) => Vec::new(),
            Err(source) => return Err(io_error(base, source)),
        };

        // Newest first
        versions.sort_unstable_by(|a, b| b.cmp(a));

        for id in &versions {
            let candidate = versioned_path(base, id);
            if self
                .store
                .is_file(&candidate)
                .map_err(|source| io_error(&candidate, source))?
            {
                debug!(path = %candidate.display(), version = %id, "resolved latest version");
                return Ok(candidate);
            }
        }

        Err(VersionError::NotFound {
            path: base.to_path_buf(),
        })
    }
}

/// `base/<id>/<file name of base>`
#[must_use]
pub fn versioned_path(base: &Path, id: &str) -> PathBuf {
    let mut path = base.join(id);
    if let Some(name) = base.file_name() {
        path.push(name);
    }
    path
}

fn io_error(path: &Path, source: io::Error) -> VersionError {
    VersionError::Io {
        path: path.to_path_buf(),
        source,
    }
}
