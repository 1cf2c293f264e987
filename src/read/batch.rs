//! A façade over the read stack: open a file, project columns, stream
//! row batches.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::arena::Arena;
use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::format;
use crate::metadata::{ColumnChunkMetaData, FileMetaData};
use crate::parquet_bridge::Encoding;
use crate::read::column::TypedColumnReader;
use crate::read::page::ReaderOptions;
use crate::read::{filter_row_groups, read_metadata, FilterOp};
use crate::schema::types::PhysicalType;
use crate::statistics::{deserialize_statistics, Scalar, Statistics};
use crate::thrift::CompactReader;
use crate::types::Int96;

/// Which columns a [`FileReader`] materializes.
#[derive(Debug, Clone, Default)]
pub enum Projection {
    /// Every leaf column.
    #[default]
    All,
    /// Leaf columns by index, in the requested order.
    Indices(Vec<usize>),
    /// Leaf columns by name, in the requested order.
    Names(Vec<String>),
}

/// Options of a [`FileReader`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Attempt to memory-map the file. Eligible columns can then be read
    /// without copying the file's bytes.
    pub use_mmap: bool,
    /// Logical rows per [`RowBatch`].
    pub batch_size: usize,
    /// The columns to materialize.
    pub projection: Projection,
    /// Page-level options (CRC verification, header bounds).
    pub page_options: ReaderOptions,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            use_mmap: false,
            batch_size: 1024,
            projection: Projection::All,
            page_options: ReaderOptions::default(),
        }
    }
}

/// The typed values of one column of a batch, dense: one entry per
/// logical row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Boolean(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Int96(Vec<Int96>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY values.
    Binary(Vec<Vec<u8>>),
}

impl ColumnValues {
    /// Number of rows held.
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Boolean(values) => values.len(),
            ColumnValues::Int32(values) => values.len(),
            ColumnValues::Int64(values) => values.len(),
            ColumnValues::Int96(values) => values.len(),
            ColumnValues::Float(values) => values.len(),
            ColumnValues::Double(values) => values.len(),
            ColumnValues::Binary(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn split_range(&self, start: usize, end: usize) -> Self {
        match self {
            ColumnValues::Boolean(values) => ColumnValues::Boolean(values[start..end].to_vec()),
            ColumnValues::Int32(values) => ColumnValues::Int32(values[start..end].to_vec()),
            ColumnValues::Int64(values) => ColumnValues::Int64(values[start..end].to_vec()),
            ColumnValues::Int96(values) => ColumnValues::Int96(values[start..end].to_vec()),
            ColumnValues::Float(values) => ColumnValues::Float(values[start..end].to_vec()),
            ColumnValues::Double(values) => ColumnValues::Double(values[start..end].to_vec()),
            ColumnValues::Binary(values) => ColumnValues::Binary(values[start..end].to_vec()),
        }
    }
}

/// One materialized column of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBatch {
    /// The column's name in the schema.
    pub name: String,
    /// The column's leaf index.
    pub column_index: usize,
    /// Dense values, one per logical row; nulls hold a default.
    pub values: ColumnValues,
    /// One flag per logical row; `None` for columns that cannot be null.
    pub validity: Option<Vec<bool>>,
}

/// A batch of logical rows across the projected columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    pub num_rows: usize,
    pub columns: Vec<ColumnBatch>,
}

enum Source {
    File(File),
    Mmap(memmap2::Mmap),
}

#[allow(unsafe_code)]
fn map_file(file: &File) -> std::io::Result<memmap2::Mmap> {
    // SAFETY: the mapping is read-only and the `File` stays open for the
    // mapping's lifetime; like every user of mmap we assume the file is
    // not truncated or rewritten underneath the process while mapped.
    unsafe { memmap2::Mmap::map(file) }
}

/// Reads a parquet file as typed column batches.
///
/// The reader owns the parsed metadata for its whole lifetime; batches
/// own their storage. With `use_mmap`, eligible columns additionally
/// expose value spans that alias the mapping (see
/// [`FileReader::zero_copy_pages`]).
pub struct FileReader {
    source: Source,
    metadata: FileMetaData,
    options: ReadOptions,
    /// resolved projection, leaf indices in output order
    columns: Vec<usize>,
    /// chunk-sized scratch of the non-mapped read path
    arena: Arena,
    /// streaming state: the decoded current row group, being drained
    current: Option<RowBatch>,
    current_offset: usize,
    next_row_group: usize,
}

impl FileReader {
    /// Opens `path` and parses its footer.
    pub fn try_new_from_path<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| Error::FileIo(format!("cannot open {:?}: {}", path.as_ref(), e)))?;
        Self::try_new(file, options)
    }

    /// Parses the footer of an open file.
    pub fn try_new(mut file: File, options: ReadOptions) -> Result<Self> {
        let metadata = read_metadata(&mut file)?;
        let columns = resolve_projection(&metadata, &options.projection)?;
        let source = if options.use_mmap {
            match map_file(&file) {
                Ok(mmap) => Source::Mmap(mmap),
                Err(e) => {
                    debug!("memory mapping failed, falling back to reads: {}", e);
                    Source::File(file)
                }
            }
        } else {
            Source::File(file)
        };
        debug!(
            num_rows = metadata.num_rows,
            num_row_groups = metadata.row_groups.len(),
            "opened parquet file"
        );
        Ok(Self {
            source,
            metadata,
            options,
            columns,
            arena: Arena::new(),
            current: None,
            current_offset: 0,
            next_row_group: 0,
        })
    }

    /// The file's metadata.
    pub fn metadata(&self) -> &FileMetaData {
        &self.metadata
    }

    /// Number of rows in the file.
    pub fn num_rows(&self) -> usize {
        self.metadata.num_rows
    }

    /// Number of leaf columns of the schema.
    pub fn num_columns(&self) -> usize {
        self.metadata.schema().num_columns()
    }

    /// Number of row groups.
    pub fn num_row_groups(&self) -> usize {
        self.metadata.row_groups.len()
    }

    /// The schema descriptor.
    pub fn schema(&self) -> &crate::metadata::SchemaDescriptor {
        self.metadata.schema()
    }

    /// Whether the file is memory mapped.
    pub fn is_mmap(&self) -> bool {
        matches!(self.source, Source::Mmap(_))
    }

    /// The deserialized statistics of one column chunk, when written.
    pub fn column_statistics(
        &self,
        row_group: usize,
        column: usize,
    ) -> Result<Option<Arc<dyn Statistics>>> {
        let chunk = self.chunk(row_group, column)?;
        chunk
            .statistics()
            .map(|statistics| deserialize_statistics(statistics, chunk.physical_type()))
            .transpose()
    }

    /// The row groups, in file order, that may contain rows matching
    /// `column <op> value` according to their statistics.
    pub fn filter_row_groups(
        &self,
        column: usize,
        op: FilterOp,
        value: &Scalar,
    ) -> Result<Vec<usize>> {
        filter_row_groups(&self.metadata, column, op, value)
    }

    /// Whether a column chunk can be served as spans aliasing the mapped
    /// file: the file is mapped and the column is REQUIRED, uncompressed,
    /// PLAIN-encoded and of a fixed-width physical type.
    pub fn can_zero_copy(&self, row_group: usize, column: usize) -> Result<bool> {
        if !self.is_mmap() {
            return Ok(false);
        }
        let chunk = self.chunk(row_group, column)?;
        let descriptor = chunk.descriptor();
        let fixed_width = !matches!(chunk.physical_type(), PhysicalType::ByteArray);
        let plain_only = chunk
            .encodings()?
            .iter()
            .all(|encoding| matches!(encoding, Encoding::Plain | Encoding::Rle));
        Ok(descriptor.max_def_level() == 0
            && descriptor.max_rep_level() == 0
            && chunk.compression()? == Compression::Uncompressed
            && fixed_width
            && plain_only)
    }

    /// Returns an iterator over the PLAIN value spans of an eligible
    /// column chunk, aliasing the mapped file. The spans borrow the
    /// reader and cannot outlive it.
    pub fn zero_copy_pages(&self, row_group: usize, column: usize) -> Result<ZeroCopyPages<'_>> {
        if !self.can_zero_copy(row_group, column)? {
            return Err(Error::InvalidArgument(
                "this column chunk cannot be read zero-copy".into(),
            ));
        }
        let chunk = self.chunk(row_group, column)?;
        let (start, length) = chunk.byte_range();
        let mmap = match &self.source {
            Source::Mmap(mmap) => mmap,
            Source::File(_) => unreachable!("can_zero_copy checked the source"),
        };
        let data = mmap
            .get(start as usize..(start + length) as usize)
            .ok_or_else(|| {
                Error::FileTruncated("the chunk's byte range exceeds the mapping".into())
            })?;
        Ok(ZeroCopyPages {
            data,
            remaining_values: chunk.num_values(),
            options: self.options.page_options,
        })
    }

    /// Decodes all projected columns of one row group into a single
    /// dense batch.
    pub fn read_row_group(&mut self, index: usize) -> Result<RowBatch> {
        let row_group = self
            .metadata
            .row_groups
            .get(index)
            .ok_or(Error::RowGroupNotFound(index))?;
        let num_rows = row_group.num_rows();

        let mut columns = Vec::with_capacity(self.columns.len());
        for &column_index in &self.columns {
            let chunk = &row_group.columns()[column_index];
            let (start, length) = chunk.byte_range();

            // one scratch allocation per chunk, reused across chunks
            self.arena.reset();
            let bytes: &[u8] = match &self.source {
                Source::Mmap(mmap) => mmap
                    .get(start as usize..(start + length) as usize)
                    .ok_or_else(|| {
                        Error::FileTruncated("the chunk's byte range exceeds the mapping".into())
                    })?,
                Source::File(file) => {
                    use std::io::{Read, Seek, SeekFrom};
                    let scratch = self.arena.alloc(length as usize, 1)?;
                    let mut file = file;
                    file.seek(SeekFrom::Start(start))?;
                    file.read_exact(scratch).map_err(|_| {
                        Error::FileTruncated(format!(
                            "the column chunk at {} claims {} bytes but the file ends first",
                            start, length
                        ))
                    })?;
                    scratch
                }
            };

            let column =
                decode_chunk_dense(bytes, chunk, column_index, num_rows, self.options.page_options)?;
            columns.push(column);
        }

        Ok(RowBatch { num_rows, columns })
    }

    /// Returns the next batch of up to `batch_size` rows, or `None` at
    /// the end of the file. Batches never span row groups.
    pub fn next_batch(&mut self) -> Result<Option<RowBatch>> {
        loop {
            if let Some(current) = &self.current {
                if self.current_offset < current.num_rows {
                    let start = self.current_offset;
                    let end = std::cmp::min(start + self.options.batch_size, current.num_rows);
                    self.current_offset = end;
                    let columns = current
                        .columns
                        .iter()
                        .map(|column| ColumnBatch {
                            name: column.name.clone(),
                            column_index: column.column_index,
                            values: column.values.split_range(start, end),
                            validity: column
                                .validity
                                .as_ref()
                                .map(|validity| validity[start..end].to_vec()),
                        })
                        .collect();
                    return Ok(Some(RowBatch {
                        num_rows: end - start,
                        columns,
                    }));
                }
            }
            if self.next_row_group == self.metadata.row_groups.len() {
                return Ok(None);
            }
            let index = self.next_row_group;
            self.next_row_group += 1;
            let batch = self.read_row_group(index)?;
            self.current = Some(batch);
            self.current_offset = 0;
        }
    }

    fn chunk(&self, row_group: usize, column: usize) -> Result<&ColumnChunkMetaData> {
        self.metadata
            .row_groups
            .get(row_group)
            .ok_or(Error::RowGroupNotFound(row_group))?
            .columns()
            .get(column)
            .ok_or_else(|| Error::ColumnNotFound(format!("index {}", column)))
    }
}

fn resolve_projection(metadata: &FileMetaData, projection: &Projection) -> Result<Vec<usize>> {
    let schema = metadata.schema();
    match projection {
        Projection::All => Ok((0..schema.num_columns()).collect()),
        Projection::Indices(indices) => {
            for &index in indices {
                if index >= schema.num_columns() {
                    return Err(Error::ColumnNotFound(format!("index {}", index)));
                }
            }
            Ok(indices.clone())
        }
        Projection::Names(names) => names
            .iter()
            .map(|name| {
                schema
                    .columns()
                    .iter()
                    .position(|column| column.name() == name)
                    .ok_or_else(|| Error::ColumnNotFound(name.clone()))
            })
            .collect(),
    }
}

fn decode_chunk_dense(
    bytes: &[u8],
    chunk: &ColumnChunkMetaData,
    column_index: usize,
    num_rows: usize,
    options: ReaderOptions,
) -> Result<ColumnBatch> {
    let descriptor = chunk.descriptor();
    let nullable = descriptor.max_def_level() > 0;
    let mut validity = Vec::with_capacity(if nullable { num_rows } else { 0 });

    macro_rules! drain {
        ($variant:ident, $t:ty) => {{
            let mut reader =
                TypedColumnReader::<$t, _>::new(Cursor::new(bytes), chunk, options)?;
            let mut values = Vec::with_capacity(num_rows);
            let mut total = 0;
            loop {
                let rows = reader.read_batch_dense(num_rows - total, &mut values, &mut validity)?;
                if rows == 0 {
                    break;
                }
                total += rows;
                if total == num_rows {
                    break;
                }
            }
            if total != num_rows {
                return Err(Error::Decode(format!(
                    "the chunk of column {} holds {} rows, its row group {}",
                    column_index, total, num_rows
                )));
            }
            ColumnValues::$variant(values)
        }};
    }

    let values = match chunk.physical_type() {
        PhysicalType::Boolean => drain!(Boolean, bool),
        PhysicalType::Int32 => drain!(Int32, i32),
        PhysicalType::Int64 => drain!(Int64, i64),
        PhysicalType::Int96 => drain!(Int96, Int96),
        PhysicalType::Float => drain!(Float, f32),
        PhysicalType::Double => drain!(Double, f64),
        PhysicalType::ByteArray | PhysicalType::FixedLenByteArray(_) => {
            drain!(Binary, Vec<u8>)
        }
    };

    Ok(ColumnBatch {
        name: descriptor.name().to_string(),
        column_index,
        values,
        validity: nullable.then_some(validity),
    })
}

/// An iterator over the PLAIN value spans of an eligible (REQUIRED,
/// uncompressed, fixed-width) column chunk, aliasing the mapped file.
pub struct ZeroCopyPages<'a> {
    data: &'a [u8],
    remaining_values: i64,
    options: ReaderOptions,
}

impl<'a> ZeroCopyPages<'a> {
    fn next_span(&mut self) -> Result<Option<(usize, &'a [u8])>> {
        if self.remaining_values <= 0 || self.data.is_empty() {
            return Ok(None);
        }
        let budget = std::cmp::min(self.data.len(), self.options.max_page_header_size);
        let mut thrift_reader = CompactReader::new(self.data, budget);
        let header = format::PageHeader::read_from(&mut thrift_reader)?;
        let header_size = budget - thrift_reader.remaining();
        self.data = &self.data[header_size..];

        let compressed_size = usize::try_from(header.compressed_page_size)
            .map_err(|_| Error::InvalidPage("negative compressed page size".into()))?;
        if compressed_size > self.data.len() {
            return Err(Error::FileTruncated(
                "a page claims more bytes than its chunk holds".into(),
            ));
        }
        let body = &self.data[..compressed_size];
        self.data = &self.data[compressed_size..];

        if self.options.check_crc {
            if let Some(crc) = header.crc {
                let computed = crc32fast::hash(body);
                let expected = crc as u32;
                if computed != expected {
                    return Err(Error::Checksum { expected, computed });
                }
            }
        }

        let data_header = header.data_page_header.ok_or_else(|| {
            Error::InvalidPage("zero-copy chunks cannot carry non-v1 pages".into())
        })?;
        let num_values = usize::try_from(data_header.num_values)
            .map_err(|_| Error::InvalidPage("negative number of values".into()))?;
        self.remaining_values -= num_values as i64;

        // REQUIRED columns have no level streams: the body is the values
        Ok(Some((num_values, body)))
    }
}

impl<'a> Iterator for ZeroCopyPages<'a> {
    type Item = Result<(usize, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_span().transpose()
    }
}
