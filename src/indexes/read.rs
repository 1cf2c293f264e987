use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::format;
use crate::metadata::ColumnChunkMetaData;
use crate::thrift::CompactReader;

use super::{ColumnPageIndexes, PageLocation};

/// Reads the column indexes of all `chunks`, in chunk order. `None`
/// entries denote chunks written without a page index.
pub fn read_column_indexes<R: Read + Seek>(
    reader: &mut R,
    chunks: &[ColumnChunkMetaData],
) -> Result<Vec<Option<ColumnPageIndexes>>> {
    chunks
        .iter()
        .map(|chunk| {
            let (offset, length) = match chunk.column_index_range() {
                Some(range) => range,
                None => return Ok(None),
            };
            let length = usize::try_from(length)
                .map_err(|_| Error::InvalidMetadata("negative column index length".into()))?;
            reader.seek(SeekFrom::Start(offset as u64))?;
            let mut thrift_reader = CompactReader::new(&mut *reader, length);
            let index = format::ColumnIndex::read_from(&mut thrift_reader)?;
            ColumnPageIndexes::try_new(index, chunk.physical_type()).map(Some)
        })
        .collect()
}

/// Reads the offset indexes of all `chunks`, in chunk order. `None`
/// entries denote chunks written without a page index.
pub fn read_offset_indexes<R: Read + Seek>(
    reader: &mut R,
    chunks: &[ColumnChunkMetaData],
) -> Result<Vec<Option<Vec<PageLocation>>>> {
    chunks
        .iter()
        .map(|chunk| {
            let (offset, length) = match chunk.offset_index_range() {
                Some(range) => range,
                None => return Ok(None),
            };
            let length = usize::try_from(length)
                .map_err(|_| Error::InvalidMetadata("negative offset index length".into()))?;
            reader.seek(SeekFrom::Start(offset as u64))?;
            let mut thrift_reader = CompactReader::new(&mut *reader, length);
            let index = format::OffsetIndex::read_from(&mut thrift_reader)?;
            Ok(Some(index.page_locations))
        })
        .collect()
}
