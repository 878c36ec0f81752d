//! Post-save consistency check
//!
//! After a versioned save, loading with the same [`Version`](crate::Version)
//! must read back what was just written. If another writer published a newer
//! version in between, the "latest" load path no longer points at our file.

use crate::error::VersionError;
use std::env;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Fail if `load_path` and `save_path` differ once made absolute
///
/// # Errors
///
/// Returns [`VersionError::Inconsistent`] on mismatch
pub fn check_paths_consistency(load_path: &Path, save_path: &Path) -> Result<(), VersionError> {
    let load_path = absolute(load_path);
    let save_path = absolute(save_path);

    if load_path == save_path {
        return Ok(());
    }

    warn!(
        load_path = %load_path.display(),
        save_path = %save_path.display(),
        "saved version is not the one that would be loaded"
    );
    Err(VersionError::Inconsistent {
        load_path,
        save_path,
    })
}

/// Join relative paths onto the working directory and drop `.` segments
fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
