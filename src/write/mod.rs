mod column;
mod column_chunk;
mod compression;
mod dyn_iter;
mod file;
mod indexes;
mod page;
mod row_group;
pub mod statistics;

pub use column::{ColumnWriter, WriteValue};
pub use compression::{compress_page, EncodedPage};
pub use dyn_iter::DynIter;
pub use file::FileWriter;
pub use page::{write_page, PageWriteSpec};
pub use row_group::write_row_group;

use crate::compression::{Compression, CompressionLevel};

/// The set of row groups a [`FileWriter::write`] call consumes: an
/// iterator of columns, each an iterator of compressed pages.
pub type RowGroupIter<'a> =
    DynIter<'a, crate::error::Result<DynIter<'a, crate::error::Result<crate::page::CompressedPage>>>>;

/// The data-page format the writer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1,
    V2,
}

/// The dictionary encoding of data pages, when dictionary encoding is
/// enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryMode {
    /// The legacy pair: data pages PLAIN_DICTIONARY, dictionary page
    /// PLAIN_DICTIONARY.
    PlainDictionary,
    /// The modern pair: data pages RLE_DICTIONARY, dictionary page PLAIN.
    RleDictionary,
}

/// Options of a [`FileWriter`] and its column writers.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// The codec compressing page bodies. Defaults to no compression.
    pub compression: Compression,
    /// The codec-specific level; ignored by Snappy and LZ4.
    pub compression_level: CompressionLevel,
    /// Target uncompressed bytes per row group.
    pub row_group_size: usize,
    /// Target uncompressed bytes per data page.
    pub page_size: usize,
    /// Whether min/max/null-count statistics are written into page
    /// headers and chunk metadata.
    pub write_statistics: bool,
    /// Whether a column/offset index is written per column chunk.
    pub write_page_index: bool,
    /// Whether each page header carries a CRC32 of its compressed body.
    pub write_checksum: bool,
    /// Initial encoding of dictionary-eligible columns; `None` disables
    /// dictionary encoding.
    pub dictionary: Option<DictionaryMode>,
    /// Dictionary size after which a column falls back to PLAIN for
    /// subsequent pages.
    pub dictionary_page_size: usize,
    /// The data-page format.
    pub version: Version,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Uncompressed,
            compression_level: CompressionLevel::default(),
            row_group_size: 128 * 1024 * 1024,
            page_size: 1024 * 1024,
            write_statistics: true,
            write_page_index: false,
            write_checksum: true,
            dictionary: Some(DictionaryMode::PlainDictionary),
            dictionary_page_size: 1024 * 1024,
            version: Version::V1,
        }
    }
}
