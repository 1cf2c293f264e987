mod batch;
mod column;
mod compression;
pub mod deserialize;
pub mod levels;
mod metadata;
mod page;

pub use batch::{
    ColumnBatch, ColumnValues, FileReader, Projection, ReadOptions, RowBatch, ZeroCopyPages,
};
pub use column::{ColumnChunkReader, ColumnValue, TypedColumnReader};
pub use compression::{decompress_page, Page};
pub use metadata::read_metadata;
pub use page::{PageReader, ReaderOptions};

use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::metadata::{ColumnChunkMetaData, FileMetaData};
use crate::statistics::{compare, min_max_bytes, Scalar};

/// A comparison a row-group filter applies against a column's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Returns the indices, in file order, of the row groups that may contain
/// rows matching `column <op> value`. A row group is dropped only when its
/// statistics prove that no row can match; row groups without statistics
/// for the column are always retained.
pub fn filter_row_groups(
    metadata: &FileMetaData,
    column: usize,
    op: FilterOp,
    value: &Scalar,
) -> Result<Vec<usize>> {
    if column >= metadata.schema().num_columns() {
        return Err(Error::ColumnNotFound(format!("index {}", column)));
    }
    let mut selected = vec![];
    for (index, row_group) in metadata.row_groups.iter().enumerate() {
        let chunk = &row_group.columns()[column];
        if chunk_might_match(chunk, op, value)? {
            selected.push(index);
        }
    }
    Ok(selected)
}

fn chunk_might_match(chunk: &ColumnChunkMetaData, op: FilterOp, value: &Scalar) -> Result<bool> {
    let statistics = match chunk.statistics() {
        Some(statistics) => statistics,
        None => return Ok(true),
    };
    let physical_type = chunk.physical_type();
    if physical_type != value.physical_type() {
        return Err(Error::TypeMismatch(format!(
            "cannot filter a column of {:?} with a value of {:?}",
            physical_type,
            value.physical_type()
        )));
    }
    let (min, max) = min_max_bytes(statistics);
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (
            Scalar::try_from_plain(physical_type, min)?,
            Scalar::try_from_plain(physical_type, max)?,
        ),
        _ => return Ok(true),
    };

    // a row group survives unless `[min, max]` is provably disjoint from
    // the rows `op` selects
    Ok(match op {
        FilterOp::Eq => {
            compare(value, &min)?.is_ge() && compare(value, &max)?.is_le()
        }
        FilterOp::Ne => {
            // only a constant chunk equal to `value` cannot match
            !(compare(&min, &max)?.is_eq() && compare(&min, value)?.is_eq())
        }
        FilterOp::Lt => compare(&min, value)?.is_lt(),
        FilterOp::Le => compare(&min, value)?.is_le(),
        FilterOp::Gt => compare(&max, value)?.is_gt(),
        FilterOp::Ge => compare(&max, value)?.is_ge(),
    })
}

/// Reads a column chunk's bytes (dictionary page included) into memory.
/// This operation is IO-bounded and allocates the chunk's
/// `compressed_size`.
pub fn read_column_chunk<R: Read + Seek>(
    reader: &mut R,
    column: &ColumnChunkMetaData,
) -> Result<Vec<u8>> {
    let (start, length) = column.byte_range();
    reader.seek(SeekFrom::Start(start))?;

    let mut chunk = vec![];
    chunk.try_reserve(length as usize)?;
    reader.by_ref().take(length).read_to_end(&mut chunk)?;
    if (chunk.len() as u64) < length {
        return Err(Error::FileTruncated(format!(
            "the column chunk at {} claims {} bytes but the file ends first",
            start, length
        )));
    }
    Ok(chunk)
}
