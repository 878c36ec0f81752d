//! The data set contract
//!
//! [`DataSet`] is the uniform `load`/`save`/`exists`/`describe` interface.
//! [`VersionedDataSet`] implements it once for every file format: a format
//! only supplies a reader and a writer through [`DataFormat`], and all path
//! resolution, directory creation, consistency checking and error wrapping
//! happens here.

use crate::config::DataSetConfig;
use crate::error::{DataSetError, Result, VersionError};
use crate::version::Version;
use crate::versioning::{check_paths_consistency, LocalFs, VersionStore, VersionedPathResolver};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Uniform data set operations
pub trait DataSet {
    /// In-memory value this data set loads and saves
    type Data;

    /// Load the data
    ///
    /// # Errors
    ///
    /// Returns [`DataSetError::Load`] if no data can be located or read
    fn load(&self) -> Result<Self::Data>;

    /// Save the data
    ///
    /// # Errors
    ///
    /// Returns [`DataSetError::Save`] if writing fails or the written version
    /// would not be the one loaded next
    fn save(&self, data: &Self::Data) -> Result<()>;

    /// Whether data has been saved (`Ok(false)` when nothing exists yet)
    ///
    /// # Errors
    ///
    /// Returns [`DataSetError::Exists`] only for unexpected I/O faults
    fn exists(&self) -> Result<bool>;

    /// Configuration of this data set, for logs and error messages
    fn describe(&self) -> Description;
}

/// A file format: how to read and write one file
///
/// Implementations are zero-sized markers; they never deal with versions.
pub trait DataFormat {
    /// In-memory value
    type Data;
    /// Options for reading; `Default` holds the format's defaults
    type LoadArgs: Clone + Default + fmt::Debug + Serialize + DeserializeOwned;
    /// Options for writing; `Default` holds the format's defaults
    type SaveArgs: Clone + Default + fmt::Debug + Serialize + DeserializeOwned;

    /// Type name shown by [`DataSet::describe`]
    const NAME: &'static str;

    /// Read `path`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or decoded
    fn read(path: &Path, args: &Self::LoadArgs) -> anyhow::Result<Self::Data>;

    /// Write `data` to `path` (the parent directory exists)
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or encoded
    fn write(data: &Self::Data, path: &Path, args: &Self::SaveArgs) -> anyhow::Result<()>;
}

/// Data set type name plus its configuration
///
/// Displays as `TypeName(key=value, ...)` with JSON-rendered values; `null`
/// entries are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    dataset_type: String,
    entries: Map<String, Value>,
}

impl Description {
    /// Empty description for `dataset_type`
    #[must_use]
    pub fn new(dataset_type: impl Into<String>) -> Self {
        Self {
            dataset_type: dataset_type.into(),
            entries: Map::new(),
        }
    }

    /// Add an entry; `null` values are skipped
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.entries.insert(key.to_string(), value);
        }
        self
    }

    /// Data set type name
    #[must_use]
    pub fn dataset_type(&self) -> &str {
        &self.dataset_type
    }

    /// Entry by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.dataset_type)?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str(")")
    }
}

/// A data set stored in one file of format `F`, optionally versioned
///
/// Immutable once built: builder methods consume `self`. Every call
/// re-resolves paths, so versions written by others are picked up.
///
/// # Example
///
/// ```no_run
/// use trueno_dataset::{DataSet, GraphJsonDataSet, NodeLinkGraph, Version};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let data_set = GraphJsonDataSet::new("data/calls.json").with_version(Version::latest());
///
/// data_set.save(&NodeLinkGraph::complete_graph(4))?;
/// let reloaded = data_set.load()?;
/// assert_eq!(reloaded.node_count(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VersionedDataSet<F: DataFormat, S = LocalFs> {
    filepath: PathBuf,
    load_args: F::LoadArgs,
    save_args: F::SaveArgs,
    version: Option<Version>,
    resolver: VersionedPathResolver<S>,
}

impl<F: DataFormat> VersionedDataSet<F> {
    /// Unversioned data set at `filepath` with default options
    #[must_use]
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            load_args: F::LoadArgs::default(),
            save_args: F::SaveArgs::default(),
            version: None,
            resolver: VersionedPathResolver::default(),
        }
    }

    /// Build from a deserialized [`DataSetConfig`]
    #[must_use]
    pub fn from_config(config: DataSetConfig<F::LoadArgs, F::SaveArgs>) -> Self {
        let version = config.effective_version();
        Self {
            filepath: config.filepath,
            load_args: config.load_args,
            save_args: config.save_args,
            version,
            resolver: VersionedPathResolver::default(),
        }
    }
}

impl<F: DataFormat, S: VersionStore> VersionedDataSet<F, S> {
    /// Replace the load options
    #[must_use]
    pub fn with_load_args(mut self, load_args: F::LoadArgs) -> Self {
        self.load_args = load_args;
        self
    }

    /// Replace the save options
    #[must_use]
    pub fn with_save_args(mut self, save_args: F::SaveArgs) -> Self {
        self.save_args = save_args;
        self
    }

    /// Enable versioning
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Read filesystem state through `store` instead
    #[must_use]
    pub fn with_store<T: VersionStore>(self, store: T) -> VersionedDataSet<F, T> {
        VersionedDataSet {
            filepath: self.filepath,
            load_args: self.load_args,
            save_args: self.save_args,
            version: self.version,
            resolver: VersionedPathResolver::new(store),
        }
    }

    /// Base filepath
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    /// Effective load options
    pub const fn load_args(&self) -> &F::LoadArgs {
        &self.load_args
    }

    /// Effective save options
    pub const fn save_args(&self) -> &F::SaveArgs {
        &self.save_args
    }

    /// Store version resolution reads through
    pub fn store(&self) -> &S {
        self.resolver.store()
    }

    /// Version, if versioned
    pub const fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Path the next `load()` would read
    ///
    /// # Errors
    ///
    /// Returns error if no saved version can be located
    pub fn load_path(&self) -> std::result::Result<PathBuf, VersionError> {
        self.resolver
            .resolve_load_path(&self.filepath, self.version.as_ref())
    }

    fn try_load(&self) -> anyhow::Result<F::Data> {
        let path = self.load_path().context("Failed to resolve load path")?;
        if !self.resolver.store().is_file(&path)? {
            anyhow::bail!("No such file: {}", path.display());
        }

        debug!(dataset = F::NAME, path = %path.display(), "loading");
        F::read(&path, &self.load_args).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn try_save(&self, data: &F::Data) -> anyhow::Result<()> {
        let save_path = self
            .resolver
            .resolve_save_path(&self.filepath, self.version.as_ref())
            .context("Failed to resolve save path")?;

        debug!(dataset = F::NAME, path = %save_path.display(), "saving");
        F::write(data, &save_path, &self.save_args)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;

        if self.version.is_some() {
            info!(dataset = F::NAME, path = %save_path.display(), "saved new version");
        }

        let load_path = self.load_path().context("Failed to resolve load path after save")?;
        check_paths_consistency(&load_path, &save_path)?;
        Ok(())
    }

    fn try_exists(&self) -> anyhow::Result<bool> {
        let path = match self.load_path() {
            Ok(path) => path,
            Err(VersionError::NotFound { .. }) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        Ok(self.resolver.store().is_file(&path)?)
    }
}

impl<F: DataFormat, S: VersionStore> DataSet for VersionedDataSet<F, S> {
    type Data = F::Data;

    fn load(&self) -> Result<F::Data> {
        self.try_load().map_err(|source| DataSetError::Load {
            description: self.describe(),
            source,
        })
    }

    fn save(&self, data: &F::Data) -> Result<()> {
        self.try_save(data).map_err(|source| DataSetError::Save {
            description: self.describe(),
            source,
        })
    }

    fn exists(&self) -> Result<bool> {
        self.try_exists().map_err(|source| DataSetError::Exists {
            description: self.describe(),
            source,
        })
    }

    fn describe(&self) -> Description {
        Description::new(format!("{}DataSet", F::NAME))
            .with_entry("filepath", self.filepath.display().to_string())
            .with_entry("load_args", to_value(&self.load_args))
            .with_entry("save_args", to_value(&self.save_args))
            .with_entry("version", to_value(&self.version))
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
