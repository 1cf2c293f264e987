use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::format::{ColumnChunk, ColumnMetaData, Statistics};
use crate::parquet_bridge::Encoding;
use crate::schema::types::PhysicalType;

use super::column_descriptor::ColumnDescriptor;

/// Metadata for a column chunk.
// This contains the `ColumnDescriptor` associated with the chunk so that
// deserializers have access to the descriptor (e.g. physical, converted,
// logical).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunkMetaData {
    column_chunk: ColumnChunk,
    column_descr: ColumnDescriptor,
}

/// Represents common operations for a column chunk.
impl ColumnChunkMetaData {
    /// File where the column chunk is stored.
    ///
    /// If not set, assumed to belong to the same file as the metadata.
    /// This path is relative to the current file.
    pub fn file_path(&self) -> &Option<String> {
        &self.column_chunk.file_path
    }

    /// Byte offset in `file_path()`.
    pub fn file_offset(&self) -> i64 {
        self.column_chunk.file_offset
    }

    /// The column's [`ColumnMetaData`].
    pub fn metadata(&self) -> &ColumnMetaData {
        // the chunk always carries inline metadata: `try_from_thrift`
        // rejects chunks without it
        self.column_chunk.meta_data.as_ref().unwrap()
    }

    /// The [`ColumnDescriptor`] of this column, including the maximum
    /// definition and repetition levels.
    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.column_descr
    }

    /// The [`PhysicalType`] of this column.
    pub fn physical_type(&self) -> PhysicalType {
        self.column_descr.physical_type()
    }

    /// Total number of values in this column chunk, nulls included.
    pub fn num_values(&self) -> i64 {
        self.metadata().num_values
    }

    /// The [`Compression`] of this column.
    pub fn compression(&self) -> Result<Compression> {
        self.metadata().codec.try_into()
    }

    /// Returns the total compressed data size of this column chunk.
    pub fn compressed_size(&self) -> i64 {
        self.metadata().total_compressed_size
    }

    /// Returns the total uncompressed data size of this column chunk.
    pub fn uncompressed_size(&self) -> i64 {
        self.metadata().total_uncompressed_size
    }

    /// Returns the offset of the first data page.
    pub fn data_page_offset(&self) -> i64 {
        self.metadata().data_page_offset
    }

    /// Returns the offset of the dictionary page, present iff the chunk
    /// is dictionary-encoded.
    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.metadata().dictionary_page_offset
    }

    /// The encodings used in this column chunk.
    pub fn encodings(&self) -> Result<Vec<Encoding>> {
        self.metadata()
            .encodings
            .iter()
            .map(|encoding| (*encoding).try_into())
            .collect()
    }

    /// The raw statistics of this chunk, if written.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.metadata().statistics.as_ref()
    }

    /// Offset and length of the column index, when a page index was
    /// written.
    pub fn column_index_range(&self) -> Option<(i64, i32)> {
        self.column_chunk
            .column_index_offset
            .zip(self.column_chunk.column_index_length)
    }

    /// Offset and length of the offset index, when a page index was
    /// written.
    pub fn offset_index_range(&self) -> Option<(i64, i32)> {
        self.column_chunk
            .offset_index_offset
            .zip(self.column_chunk.offset_index_length)
    }

    /// Returns the offset and length in bytes of this column chunk's data,
    /// dictionary page included.
    pub fn byte_range(&self) -> (u64, u64) {
        let start = match self.dictionary_page_offset() {
            Some(dict_page_offset) if dict_page_offset > 0 => dict_page_offset,
            _ => self.data_page_offset(),
        };
        let length = self.compressed_size();
        // both are validated on construction
        (start as u64, length as u64)
    }

    /// Converts a thrift [`ColumnChunk`] into [`ColumnChunkMetaData`].
    pub fn try_from_thrift(
        column_descr: ColumnDescriptor,
        column_chunk: ColumnChunk,
    ) -> Result<Self> {
        let metadata = column_chunk.meta_data.as_ref().ok_or_else(|| {
            Error::InvalidMetadata("a column chunk requires inline column metadata".into())
        })?;
        if metadata.data_page_offset < 0
            || metadata.total_compressed_size < 0
            || metadata.num_values < 0
        {
            return Err(Error::InvalidMetadata(
                "column chunk offsets and sizes cannot be negative".into(),
            ));
        }
        let (expected, _) = crate::schema::types::physical_type_to_type(
            &column_descr.physical_type(),
        );
        if metadata.type_ != expected {
            return Err(Error::InvalidMetadata(format!(
                "column chunk of {:?} does not match the schema's physical type",
                column_descr.physical_type()
            )));
        }
        Ok(Self {
            column_chunk,
            column_descr,
        })
    }

    /// Converts this [`ColumnChunkMetaData`] back into a thrift
    /// [`ColumnChunk`].
    pub fn into_thrift(self) -> ColumnChunk {
        self.column_chunk
    }
}
