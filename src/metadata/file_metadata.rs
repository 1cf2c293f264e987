use crate::error::{Error, Result};
use crate::format;
use crate::metadata::{KeyValue, RowGroupMetaData, SchemaDescriptor};

/// Metadata of a parquet file: everything the footer describes.
#[derive(Debug, Clone)]
pub struct FileMetaData {
    /// version of this file.
    pub version: i32,
    /// number of rows in the file.
    pub num_rows: usize,
    /// String message for application that wrote this file.
    ///
    /// This should have the following format:
    /// `<application> version <application version> (build <application build hash>)`.
    ///
    /// ```shell
    /// parquet-mr version 1.8.0 (build 0fda28af84b9746396014ad6a415b90592a98b3b)
    /// ```
    pub created_by: Option<String>,
    /// The row groups of this file.
    pub row_groups: Vec<RowGroupMetaData>,
    /// key_value_metadata of this file.
    pub key_value_metadata: Option<Vec<KeyValue>>,
    /// schema descriptor.
    pub schema_descr: SchemaDescriptor,
}

impl FileMetaData {
    /// Returns the [`SchemaDescriptor`] that describes schema of this file.
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema_descr
    }

    /// Returns key/value metadata of this file.
    pub fn key_value_metadata(&self) -> &Option<Vec<KeyValue>> {
        &self.key_value_metadata
    }

    /// Deserializes [`format::FileMetaData`] into this crate's metadata,
    /// resolving the schema tree and every row group against it.
    pub fn try_from_thrift(metadata: format::FileMetaData) -> Result<Self> {
        if metadata.num_rows < 0 {
            return Err(Error::InvalidMetadata(
                "the number of rows cannot be negative".into(),
            ));
        }
        let schema_descr = SchemaDescriptor::try_from_thrift(&metadata.schema)?;

        let row_groups = metadata
            .row_groups
            .into_iter()
            .map(|row_group| RowGroupMetaData::try_from_thrift(&schema_descr, row_group))
            .collect::<Result<Vec<_>>>()?;

        Ok(FileMetaData {
            version: metadata.version,
            num_rows: metadata.num_rows as usize,
            created_by: metadata.created_by,
            row_groups,
            key_value_metadata: metadata.key_value_metadata,
            schema_descr,
        })
    }

    /// Serializes this metadata into [`format::FileMetaData`].
    pub fn into_thrift(self) -> Result<format::FileMetaData> {
        Ok(format::FileMetaData {
            version: self.version,
            schema: self.schema_descr.into_thrift()?,
            num_rows: self.num_rows as i64,
            row_groups: self
                .row_groups
                .into_iter()
                .map(|row_group| row_group.into_thrift())
                .collect(),
            key_value_metadata: self.key_value_metadata,
            created_by: self.created_by,
            column_orders: None,
        })
    }
}
