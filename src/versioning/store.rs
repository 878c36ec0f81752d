//! Filesystem access used by version resolution
//!
//! Resolution only needs three primitives: list the subdirectories of a
//! directory, probe whether a path is a regular file, and create a directory tree.
//! [`LocalFs`] implements them on the real filesystem, [`MemoryStore`] keeps
//! a set of file paths in memory so version sets can be simulated in tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory listing and probing primitives
pub trait VersionStore {
    /// Names of the directories directly under `dir`; other entries are
    /// left out
    ///
    /// # Errors
    ///
    /// Returns an error satisfying [`is_absent`] if `dir` does not exist or is
    /// not a directory, any other error if it cannot be read.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Whether `path` is an existing regular file (`Ok(false)` if absent)
    ///
    /// # Errors
    ///
    /// Returns error if the path exists but cannot be inspected
    fn is_file(&self, path: &Path) -> io::Result<bool>;

    /// Create `dir` and all missing parents
    ///
    /// # Errors
    ///
    /// Returns error if a directory cannot be created
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;
}

/// Whether `err` means the path is simply not there
///
/// `NotADirectory` counts: some ancestor of the path is a regular file.
#[must_use]
pub fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// The local filesystem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalFs;

impl VersionStore for LocalFs {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }
}

/// In-memory file tree
///
/// Records every call so tests can assert that an operation performed no
/// filesystem access.
///
/// # Example
///
/// ```
/// use trueno_dataset::versioning::{MemoryStore, VersionStore};
/// use std::path::Path;
///
/// let store = MemoryStore::new();
/// store.add_file("/data/cars.feather/2019-01-01T00.00.00.000000Z/cars.feather");
///
/// let versions = store.list_dir(Path::new("/data/cars.feather")).unwrap();
/// assert_eq!(versions, vec!["2019-01-01T00.00.00.000000Z".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeSet<PathBuf>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    operations: Cell<usize>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file (and, implicitly, its parent directories)
    pub fn add_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            dirs.insert(ancestor.to_path_buf());
        }
        self.files.borrow_mut().insert(path);
    }

    /// Number of `VersionStore` calls served so far
    #[must_use]
    pub fn operations(&self) -> usize {
        self.operations.get()
    }

    /// Whether a directory was registered or created
    #[must_use]
    pub fn has_dir(&self, dir: &Path) -> bool {
        self.dirs.borrow().contains(dir)
    }

    fn record(&self) {
        self.operations.set(self.operations.get() + 1);
    }
}

impl VersionStore for MemoryStore {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.record();
        if self.files.borrow().contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is a file", dir.display()),
            ));
        }
        if !self.has_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", dir.display()),
            ));
        }

        let mut names = BTreeSet::new();
        for path in self.dirs.borrow().iter() {
            if path.parent() == Some(dir) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.insert(name.to_string());
                }
            }
        }
        Ok(names.into_iter().collect())
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        self.record();
        Ok(self.files.borrow().contains(path))
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        self.record();
        if self.files.borrow().contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a file", dir.display()),
            ));
        }
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in dir.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}
