//! trueno-dataset: versioned file-backed data sets
//!
//! # Overview
//!
//! A data set binds a filepath, format options and an optional [`Version`]
//! and exposes the same four operations for every file format:
//! [`load`](DataSet::load), [`save`](DataSet::save),
//! [`exists`](DataSet::exists) and [`describe`](DataSet::describe).
//!
//! # Quick Start
//!
//! ```no_run
//! use trueno_dataset::{DataSet, GraphJsonDataSet, NodeLinkGraph, Version};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Every save lands in data/calls.json/<timestamp>/calls.json
//! let data_set = GraphJsonDataSet::new("data/calls.json").with_version(Version::latest());
//!
//! assert!(!data_set.exists()?);
//! data_set.save(&NodeLinkGraph::complete_graph(10))?;
//!
//! // Loads the newest version
//! let graph = data_set.load()?;
//! assert_eq!(graph.edge_count(), 45);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Versioning**: path resolution, id generation, post-save consistency check
//! - **Contract**: [`VersionedDataSet`] implements [`DataSet`] once for any [`DataFormat`]
//! - **Formats**: Feather and Parquet via Arrow (`storage` feature), node-link JSON graphs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod storage;
pub mod version;
pub mod versioning;

// Re-export core types
pub use config::DataSetConfig;
pub use dataset::{DataFormat, DataSet, Description, VersionedDataSet};
pub use error::{DataSetError, Result, VersionError};
pub use version::{generate_timestamp, Version};
pub use versioning::{LocalFs, MemoryStore, VersionStore, VersionedPathResolver};

pub use storage::{
    GraphJson, GraphJsonDataSet, GraphJsonLoadArgs, GraphJsonSaveArgs, Link, Node, NodeLinkGraph,
};

#[cfg(feature = "storage")]
pub use storage::{
    Feather, FeatherDataSet, FeatherLoadArgs, Parquet, ParquetCompression, ParquetDataSet,
    ParquetLoadArgs, ParquetSaveArgs,
};
