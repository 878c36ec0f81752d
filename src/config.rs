//! Serializable data set configuration
//!
//! Option structs use `#[serde(default)]`, so any field a config leaves out
//! keeps the format's default value and every field it sets wins.
//!
//! ```
//! use trueno_dataset::{DataSetConfig, GraphJsonDataSet, GraphJsonLoadArgs, GraphJsonSaveArgs};
//!
//! let config: DataSetConfig<GraphJsonLoadArgs, GraphJsonSaveArgs> = serde_json::from_str(
//!     r#"{"filepath": "data/calls.json", "save_args": {"pretty": true}, "versioned": true}"#,
//! )
//! .unwrap();
//!
//! let data_set = GraphJsonDataSet::from_config(config);
//! assert!(data_set.save_args().pretty);
//! assert_eq!(data_set.save_args().edges_key, "links");
//! assert!(data_set.version().is_some());
//! ```

use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration of one data set with load options `L` and save options `S`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSetConfig<L, S> {
    /// Base filepath
    pub filepath: PathBuf,

    /// Load options merged over the format's defaults
    #[serde(default)]
    pub load_args: L,

    /// Save options merged over the format's defaults
    #[serde(default)]
    pub save_args: S,

    /// Version with `latest`/`generated` resolution when no explicit
    /// `version` is given
    #[serde(default)]
    pub versioned: bool,

    /// Explicit version pair; implies `versioned`
    #[serde(default)]
    pub version: Option<Version>,
}

impl<L: Default, S: Default> DataSetConfig<L, S> {
    /// Unversioned configuration with default options
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            load_args: L::default(),
            save_args: S::default(),
            versioned: false,
            version: None,
        }
    }
}

impl<L, S> DataSetConfig<L, S> {
    /// Version the data set should use, if any
    #[must_use]
    pub fn effective_version(&self) -> Option<Version> {
        match (&self.version, self.versioned) {
            (Some(version), _) => Some(version.clone()),
            (None, true) => Some(Version::latest()),
            (None, false) => None,
        }
    }
}
