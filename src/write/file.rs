use std::io::Write;

use tracing::debug;

use crate::error::{Error, Result};
use crate::format;
use crate::metadata::{KeyValue, SchemaDescriptor};
use crate::thrift::CompactWriter;
use crate::write::indexes::{serialize_column_index, serialize_offset_index};
use crate::write::page::PageWriteSpec;
use crate::write::row_group::write_row_group;
use crate::write::{RowGroupIter, WriteOptions};
use crate::{DEFAULT_CREATED_BY, FOOTER_SIZE, PARQUET_MAGIC};

pub(super) fn start_file<W: Write>(writer: &mut W) -> Result<u64> {
    writer.write_all(&PARQUET_MAGIC)?;
    Ok(PARQUET_MAGIC.len() as u64)
}

pub(super) fn end_file<W: Write>(writer: &mut W, metadata: &format::FileMetaData) -> Result<u64> {
    // footer thrift metadata
    let mut thrift_writer = CompactWriter::new(&mut *writer);
    metadata.write_to(&mut thrift_writer)?;
    let metadata_len = thrift_writer.written() as i32;

    // footer length + trailing magic
    let mut footer = [0u8; FOOTER_SIZE as usize];
    footer[..4].copy_from_slice(&metadata_len.to_le_bytes());
    footer[4..].copy_from_slice(&PARQUET_MAGIC);
    writer.write_all(&footer)?;
    writer.flush()?;
    Ok(metadata_len as u64 + FOOTER_SIZE)
}

/// An interface to write a parquet file. Use `start` to write the
/// leading magic, `write` once per row group, and `end` to write the
/// page indexes (when enabled), the footer and the trailing magic.
pub struct FileWriter<W: Write> {
    writer: W,
    schema: SchemaDescriptor,
    options: WriteOptions,
    created_by: Option<String>,

    offset: u64,
    row_groups: Vec<format::RowGroup>,
    page_specs: Vec<Vec<Vec<PageWriteSpec>>>,
}

// Accessors
impl<W: Write> FileWriter<W> {
    /// The options assigned to the file
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// The [`SchemaDescriptor`] assigned to this file
    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FileWriter<W> {
    /// Returns a new [`FileWriter`].
    pub fn new(
        writer: W,
        schema: SchemaDescriptor,
        options: WriteOptions,
        created_by: Option<String>,
    ) -> Self {
        Self {
            writer,
            schema,
            options,
            created_by,
            offset: 0,
            row_groups: vec![],
            page_specs: vec![],
        }
    }

    /// Writes the header of the file.
    pub fn start(&mut self) -> Result<()> {
        if self.offset != 0 {
            return Err(Error::InvalidState(
                "the file's header has already been written".into(),
            ));
        }
        self.offset = start_file(&mut self.writer)?;
        Ok(())
    }

    /// Writes a row group to the file. This call is IO-bounded.
    pub fn write(&mut self, row_group: RowGroupIter<'_>, num_rows: usize) -> Result<()> {
        if self.offset == 0 {
            return Err(Error::InvalidState(
                "`start` must be called before the first row group".into(),
            ));
        }
        let (group, size, specs) = write_row_group(
            &mut self.writer,
            self.offset,
            self.schema.columns(),
            &self.options,
            row_group,
            num_rows,
        )?;
        self.offset += size;
        self.row_groups.push(group);
        self.page_specs.push(specs);
        Ok(())
    }

    /// Writes the page indexes (when enabled) and the footer. Returns the
    /// total number of bytes written and the underlying writer.
    pub fn end(mut self, key_value_metadata: Option<Vec<KeyValue>>) -> Result<(u64, W)> {
        if self.offset == 0 {
            return Err(Error::InvalidState(
                "an unstarted file cannot be ended".into(),
            ));
        }

        if self.options.write_page_index {
            self.write_page_indexes()?;
        }

        let num_rows = self.row_groups.iter().map(|group| group.num_rows).sum();
        let metadata = format::FileMetaData {
            version: 2,
            schema: self.schema.into_thrift()?,
            num_rows,
            row_groups: self.row_groups,
            key_value_metadata,
            created_by: Some(
                self.created_by
                    .unwrap_or_else(|| DEFAULT_CREATED_BY.to_string()),
            ),
            column_orders: None,
        };

        let len = end_file(&mut self.writer, &metadata)?;
        debug!(num_rows, "finished parquet file");
        Ok((self.offset + len, self.writer))
    }

    /// Serializes the column and offset indexes of every chunk, recording
    /// their positions in the row groups' metadata.
    fn write_page_indexes(&mut self) -> Result<()> {
        // column indexes of all chunks, then offset indexes
        let descriptors = self.schema.columns();
        for (row_group, specs) in self.row_groups.iter_mut().zip(self.page_specs.iter()) {
            for ((chunk, chunk_specs), descriptor) in row_group
                .columns
                .iter_mut()
                .zip(specs.iter())
                .zip(descriptors.iter())
            {
                let physical_type = descriptor.physical_type();
                if let Some(index) = serialize_column_index(chunk_specs, physical_type)? {
                    let mut thrift_writer = CompactWriter::new(&mut self.writer);
                    index.write_to(&mut thrift_writer)?;
                    let written = thrift_writer.written() as u64;
                    chunk.column_index_offset = Some(self.offset as i64);
                    chunk.column_index_length = Some(written as i32);
                    self.offset += written;
                }
            }
        }
        for (row_group, specs) in self.row_groups.iter_mut().zip(self.page_specs.iter()) {
            for (chunk, chunk_specs) in row_group.columns.iter_mut().zip(specs.iter()) {
                let index = serialize_offset_index(chunk_specs)?;
                let mut thrift_writer = CompactWriter::new(&mut self.writer);
                index.write_to(&mut thrift_writer)?;
                let written = thrift_writer.written() as u64;
                chunk.offset_index_offset = Some(self.offset as i64);
                chunk.offset_index_length = Some(written as i32);
                self.offset += written;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::read_metadata;
    use crate::schema::types::{ParquetType, PhysicalType};
    use std::io::Cursor;

    #[test]
    fn empty_file_round_trips() -> Result<()> {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::from_physical(
                "col".to_string(),
                PhysicalType::Int32,
            )],
        );
        let mut writer = FileWriter::new(
            Cursor::new(vec![]),
            schema,
            WriteOptions::default(),
            None,
        );
        writer.start()?;
        let (_, writer) = writer.end(None)?;
        let data = writer.into_inner();

        let metadata = read_metadata(&mut Cursor::new(&data))?;
        assert_eq!(metadata.num_rows, 0);
        assert_eq!(metadata.schema().num_columns(), 1);
        assert_eq!(
            metadata.created_by.as_deref(),
            Some(crate::DEFAULT_CREATED_BY)
        );
        Ok(())
    }

    #[test]
    fn magic_brackets_the_file() -> Result<()> {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::from_physical(
                "col".to_string(),
                PhysicalType::Int32,
            )],
        );
        let mut writer =
            FileWriter::new(Cursor::new(vec![]), schema, WriteOptions::default(), None);
        writer.start()?;
        let (size, writer) = writer.end(None)?;
        let data = writer.into_inner();

        assert_eq!(data.len() as u64, size);
        assert_eq!(&data[..4], &[0x50, 0x41, 0x52, 0x31]);
        assert_eq!(&data[data.len() - 4..], &[0x50, 0x41, 0x52, 0x31]);
        Ok(())
    }

    #[test]
    fn writing_before_start_is_an_error() {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::from_physical(
                "col".to_string(),
                PhysicalType::Int32,
            )],
        );
        let mut writer =
            FileWriter::new(Cursor::new(vec![]), schema, WriteOptions::default(), None);
        let row_group = crate::write::DynIter::new(std::iter::empty());
        assert!(matches!(
            writer.write(row_group, 0),
            Err(Error::InvalidState(_))
        ));
    }
}
