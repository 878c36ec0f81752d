//! File formats
//!
//! Feather and Parquet frames (Arrow `RecordBatch`, `storage` feature) and
//! node-link JSON graphs.

#[cfg(feature = "storage")]
pub mod feather;
pub mod graph_json;
#[cfg(feature = "storage")]
pub mod parquet;

#[cfg(feature = "storage")]
pub use feather::{Feather, FeatherDataSet, FeatherLoadArgs};
pub use graph_json::{
    GraphJson, GraphJsonDataSet, GraphJsonLoadArgs, GraphJsonSaveArgs, Link, Node, NodeLinkGraph,
};
#[cfg(feature = "storage")]
pub use parquet::{Parquet, ParquetCompression, ParquetDataSet, ParquetLoadArgs, ParquetSaveArgs};
