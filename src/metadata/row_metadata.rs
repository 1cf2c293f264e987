use crate::error::{Error, Result};
use crate::format::RowGroup;

use super::{ColumnChunkMetaData, SchemaDescriptor};

/// Metadata for a row group.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroupMetaData {
    columns: Vec<ColumnChunkMetaData>,
    num_rows: usize,
    total_byte_size: usize,
}

impl RowGroupMetaData {
    /// Number of rows in this row group.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Total byte size of all uncompressed column data in this row group.
    pub fn total_byte_size(&self) -> usize {
        self.total_byte_size
    }

    /// Returns the [`ColumnChunkMetaData`] of this row group, in schema
    /// order.
    pub fn columns(&self) -> &[ColumnChunkMetaData] {
        &self.columns
    }

    /// Converts a thrift [`RowGroup`] into [`RowGroupMetaData`].
    pub fn try_from_thrift(
        schema_descr: &SchemaDescriptor,
        row_group: RowGroup,
    ) -> Result<Self> {
        if row_group.num_rows < 0 || row_group.total_byte_size < 0 {
            return Err(Error::InvalidMetadata(
                "row group sizes cannot be negative".into(),
            ));
        }
        if schema_descr.num_columns() != row_group.columns.len() {
            return Err(Error::InvalidMetadata(format!(
                "a row group carries {} column chunks but the schema has {} leaves",
                row_group.columns.len(),
                schema_descr.num_columns()
            )));
        }
        let columns = row_group
            .columns
            .into_iter()
            .zip(schema_descr.columns())
            .map(|(column_chunk, descriptor)| {
                ColumnChunkMetaData::try_from_thrift(descriptor.clone(), column_chunk)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            columns,
            num_rows: row_group.num_rows as usize,
            total_byte_size: row_group.total_byte_size as usize,
        })
    }

    /// Converts this [`RowGroupMetaData`] back into a thrift [`RowGroup`].
    pub fn into_thrift(self) -> RowGroup {
        let file_offset = self
            .columns
            .first()
            .map(|column| column.byte_range().0 as i64);
        RowGroup {
            columns: self
                .columns
                .into_iter()
                .map(|column| column.into_thrift())
                .collect(),
            total_byte_size: self.total_byte_size as i64,
            num_rows: self.num_rows as i64,
            sorting_columns: None,
            file_offset,
            total_compressed_size: None,
            ordinal: None,
        }
    }
}
