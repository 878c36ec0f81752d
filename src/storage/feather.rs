//! Feather (Arrow IPC file) format
//!
//! Feather v2 is the Arrow IPC file format: a schema followed by record
//! batches. The whole file is loaded into a single [`RecordBatch`].

use crate::dataset::{DataFormat, VersionedDataSet};
use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Feather data set
pub type FeatherDataSet = VersionedDataSet<Feather>;

/// Options for reading Feather files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatherLoadArgs {
    /// Columns to load, in this order; `None` loads all of them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

/// Feather format marker
#[derive(Debug, Clone, Copy, Default)]
pub struct Feather;

impl DataFormat for Feather {
    type Data = RecordBatch;
    type LoadArgs = FeatherLoadArgs;
    type SaveArgs = ();

    const NAME: &'static str = "Feather";

    fn read(path: &Path, args: &FeatherLoadArgs) -> Result<RecordBatch> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let reader = FileReader::try_new(file, None).context("Invalid Feather file")?;

        let schema = reader.schema();
        let batches = reader
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode record batch")?;
        let batch = concat_batches(&schema, &batches).context("Failed to concatenate batches")?;

        match &args.columns {
            Some(columns) => project(&batch, &schema, columns),
            None => Ok(batch),
        }
    }

    fn write(data: &RecordBatch, path: &Path, _: &()) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

        let mut writer = FileWriter::try_new(file, &data.schema())?;
        writer.write(data)?;
        writer.finish()?;

        Ok(())
    }
}

/// Select `columns` by name
fn project(
    batch: &RecordBatch,
    schema: &SchemaRef,
    columns: &[String],
) -> Result<RecordBatch> {
    let indices = columns
        .iter()
        .map(|name| {
            schema
                .index_of(name)
                .with_context(|| format!("Unknown column `{name}`"))
        })
        .collect::<Result<Vec<_>>>()?;

    batch.project(&indices).context("Failed to project columns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataSet, DataSetError, Version};
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn cars() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("col1", DataType::Int64, false),
            Field::new("col2", DataType::Int64, false),
            Field::new("col3", DataType::Utf8, true),
        ]));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Int64Array::from(vec![4, 5])),
                Arc::new(StringArray::from(vec![Some("a"), None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let data_set = FeatherDataSet::new(dir.path().join("test.feather"));

        data_set.save(&cars()).unwrap();
        let reloaded = data_set.load().unwrap();

        assert_eq!(reloaded, cars());
    }

    #[test]
    fn test_load_columns() {
        let dir = tempdir().unwrap();
        let data_set = FeatherDataSet::new(dir.path().join("test.feather")).with_load_args(
            FeatherLoadArgs {
                columns: Some(vec!["col3".to_string(), "col1".to_string()]),
            },
        );

        data_set.save(&cars()).unwrap();
        let reloaded = data_set.load().unwrap();

        assert_eq!(reloaded.num_columns(), 2);
        assert_eq!(reloaded.schema().field(0).name(), "col3");
        assert_eq!(reloaded.schema().field(1).name(), "col1");
        assert_eq!(reloaded.num_rows(), 2);
    }

    #[test]
    fn test_load_unknown_column() {
        let dir = tempdir().unwrap();
        let data_set = FeatherDataSet::new(dir.path().join("test.feather")).with_load_args(
            FeatherLoadArgs {
                columns: Some(vec!["nope".to_string()]),
            },
        );

        data_set.save(&cars()).unwrap();
        let err = data_set.load().unwrap_err();

        assert!(matches!(err, DataSetError::Load { .. }));
        assert!(err.to_string().contains("Unknown column `nope`"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let data_set = FeatherDataSet::new(dir.path().join("test.feather"));

        let err = data_set.load().unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("Failed while loading data from data set FeatherDataSet("));
        assert!(message.contains("test.feather"));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.feather");
        std::fs::write(&path, b"not arrow").unwrap();

        let err = FeatherDataSet::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid Feather file"));
    }

    #[test]
    fn test_versioned_exists() {
        let dir = tempdir().unwrap();
        let data_set =
            FeatherDataSet::new(dir.path().join("test.feather")).with_version(Version::latest());

        assert!(!data_set.exists().unwrap());
        data_set.save(&cars()).unwrap();
        assert!(data_set.exists().unwrap());
    }

    #[test]
    fn test_describe_shows_merged_load_args() {
        let data_set = FeatherDataSet::new("test.feather").with_load_args(FeatherLoadArgs {
            columns: Some(vec!["col1".to_string()]),
        });

        let description = data_set.describe();
        assert_eq!(
            description.to_string(),
            r#"FeatherDataSet(filepath="test.feather", load_args={"columns":["col1"]})"#
        );
    }
}
