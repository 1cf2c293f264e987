use std::io::Write;

use tracing::debug;

use crate::error::{Error, Result};
use crate::format::RowGroup;
use crate::metadata::ColumnDescriptor;
use crate::write::column_chunk::write_column_chunk;
use crate::write::page::PageWriteSpec;
use crate::write::{RowGroupIter, WriteOptions};

/// Writes one row group: every column's pages back to back, each followed
/// by its chunk metadata. Returns the thrift [`RowGroup`], the bytes
/// written, and the page specs per chunk.
pub fn write_row_group<W: Write>(
    writer: &mut W,
    mut offset: u64,
    descriptors: &[ColumnDescriptor],
    options: &WriteOptions,
    columns: RowGroupIter<'_>,
    num_rows: usize,
) -> Result<(RowGroup, u64, Vec<Vec<PageWriteSpec>>)> {
    let initial = offset;

    let mut chunks = vec![];
    let mut specs = vec![];
    let mut written_columns = 0;
    for (descriptor, pages) in descriptors.iter().zip(columns) {
        let (chunk, size, chunk_specs) =
            write_column_chunk(writer, offset, descriptor, options, pages?)?;
        offset += size;
        chunks.push(chunk);
        specs.push(chunk_specs);
        written_columns += 1;
    }
    if written_columns != descriptors.len() {
        return Err(Error::InvalidArgument(format!(
            "a row group requires one column per schema leaf; got {} of {}",
            written_columns,
            descriptors.len()
        )));
    }
    let bytes_written = offset - initial;

    debug!(num_rows, bytes_written, "wrote row group");

    let file_offset = chunks
        .first()
        .map(|chunk| {
            chunk
                .meta_data
                .as_ref()
                .map(|metadata| {
                    metadata
                        .dictionary_page_offset
                        .filter(|offset| *offset > 0)
                        .unwrap_or(metadata.data_page_offset)
                })
                .unwrap_or(0)
        })
        .filter(|_| num_rows > 0);

    let total_byte_size = chunks
        .iter()
        .map(|chunk| {
            chunk
                .meta_data
                .as_ref()
                .map(|metadata| metadata.total_uncompressed_size)
                .unwrap_or(0)
        })
        .sum();
    let total_compressed_size = chunks
        .iter()
        .map(|chunk| {
            chunk
                .meta_data
                .as_ref()
                .map(|metadata| metadata.total_compressed_size)
                .unwrap_or(0)
        })
        .sum();

    Ok((
        RowGroup {
            columns: chunks,
            total_byte_size,
            num_rows: num_rows as i64,
            sorting_columns: None,
            file_offset,
            total_compressed_size: Some(total_compressed_size),
            ordinal: None,
        },
        bytes_written,
        specs,
    ))
}
