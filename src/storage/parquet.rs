//! Parquet format
//!
//! A data frame ([`RecordBatch`]) stored as a single Parquet file. Loading
//! can project columns by name and choose the reader batch size; saving
//! picks the codec, ZSTD level 3 unless configured otherwise.

use crate::dataset::{DataFormat, VersionedDataSet};
use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::arrow::ProjectionMask;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Parquet data set
pub type ParquetDataSet = VersionedDataSet<Parquet>;

/// Options for reading Parquet files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParquetLoadArgs {
    /// Columns to load, in file order; `None` loads all of them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Rows decoded per batch before concatenation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

/// Column compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParquetCompression {
    /// No compression
    Uncompressed,
    /// Snappy
    Snappy,
    /// ZSTD at the given level (1-22)
    Zstd(i32),
}

impl Default for ParquetCompression {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

impl ParquetCompression {
    fn to_parquet(self) -> Result<Compression> {
        Ok(match self {
            Self::Uncompressed => Compression::UNCOMPRESSED,
            Self::Snappy => Compression::SNAPPY,
            Self::Zstd(level) => Compression::ZSTD(
                ZstdLevel::try_new(level).with_context(|| format!("Invalid ZSTD level {level}"))?,
            ),
        })
    }
}

/// Options for writing Parquet files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParquetSaveArgs {
    /// Codec for every column
    pub compression: ParquetCompression,
}

/// Parquet format marker
#[derive(Debug, Clone, Copy, Default)]
pub struct Parquet;

impl DataFormat for Parquet {
    type Data = RecordBatch;
    type LoadArgs = ParquetLoadArgs;
    type SaveArgs = ParquetSaveArgs;

    const NAME: &'static str = "Parquet";

    fn read(path: &Path, args: &ParquetLoadArgs) -> Result<RecordBatch> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

        let mut builder =
            ParquetRecordBatchReaderBuilder::try_new(file).context("Invalid Parquet file")?;

        if let Some(columns) = &args.columns {
            let schema = builder.schema().clone();
            let indices = columns
                .iter()
                .map(|name| {
                    schema
                        .index_of(name)
                        .with_context(|| format!("Unknown column `{name}`"))
                })
                .collect::<Result<Vec<_>>>()?;
            let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
            builder = builder.with_projection(mask);
        }

        if let Some(batch_size) = args.batch_size {
            builder = builder.with_batch_size(batch_size);
        }

        let reader = builder.build()?;
        let schema = reader.schema();
        let batches = reader
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode record batch")?;

        concat_batches(&schema, &batches).context("Failed to concatenate batches")
    }

    fn write(data: &RecordBatch, path: &Path, args: &ParquetSaveArgs) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

        let props = WriterProperties::builder()
            .set_compression(args.compression.to_parquet()?)
            .build();

        let mut writer = ArrowWriter::try_new(file, data.schema(), Some(props))?;
        writer.write(data)?;
        writer.close()?;

        Ok(())
    }
}
