use std::io::Read;

use tracing::trace;

use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::format::{self, PageType};
use crate::metadata::{ColumnChunkMetaData, ColumnDescriptor};
use crate::page::{CompressedDataPage, CompressedDictPage, CompressedPage, DataPageHeader};
use crate::thrift::CompactReader;
use crate::DEFAULT_MAX_PAGE_HEADER_SIZE;

/// Options of the page reader.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Whether stored page CRCs are verified against the compressed body.
    pub check_crc: bool,
    /// Maximum number of bytes a page header may occupy.
    pub max_page_header_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            check_crc: true,
            max_page_header_size: DEFAULT_MAX_PAGE_HEADER_SIZE,
        }
    }
}

/// A fallible [`Iterator`] of [`CompressedPage`] reading one column
/// chunk's pages back to back. Bytes claimed by a page beyond the chunk's
/// compressed size surface as [`Error::FileTruncated`].
pub struct PageReader<R: Read> {
    reader: R,

    compression: Compression,

    // The number of values a page header may still declare; data pages
    // beyond this are not read.
    remaining_values: i64,

    // Compressed bytes of the chunk not yet consumed.
    remaining_bytes: usize,

    descriptor: ColumnDescriptor,

    options: ReaderOptions,

    // The currently allocated buffer, reused across pages.
    buffer: Vec<u8>,
}

impl<R: Read> PageReader<R> {
    /// Returns a new [`PageReader`] positioned at the beginning of the
    /// chunk (its dictionary page, when present).
    pub fn new(reader: R, column: &ColumnChunkMetaData, options: ReaderOptions) -> Result<Self> {
        Ok(Self::with_limits(
            reader,
            column.compression()?,
            column.num_values(),
            column.byte_range().1 as usize,
            column.descriptor().clone(),
            options,
        ))
    }

    /// Returns a new [`PageReader`] with explicit limits, for callers
    /// that carved the chunk out of a larger buffer themselves.
    pub fn with_limits(
        reader: R,
        compression: Compression,
        num_values: i64,
        chunk_bytes: usize,
        descriptor: ColumnDescriptor,
        options: ReaderOptions,
    ) -> Self {
        Self {
            reader,
            compression,
            remaining_values: num_values,
            remaining_bytes: chunk_bytes,
            descriptor,
            options,
            buffer: vec![],
        }
    }

    /// Returns the reader and its internal buffer.
    pub fn into_inner(self) -> (R, Vec<u8>) {
        (self.reader, self.buffer)
    }

    fn next_page(&mut self) -> Result<Option<CompressedPage>> {
        if self.remaining_values <= 0 || self.remaining_bytes == 0 {
            return Ok(None);
        }

        let header_budget = std::cmp::min(self.remaining_bytes, self.options.max_page_header_size);
        let mut thrift_reader = CompactReader::new(&mut self.reader, header_budget);
        let header = format::PageHeader::read_from(&mut thrift_reader)?;
        let header_size = header_budget - thrift_reader.remaining();
        self.remaining_bytes -= header_size;

        let compressed_size = usize::try_from(header.compressed_page_size)
            .map_err(|_| Error::InvalidPage("negative compressed page size".into()))?;
        let uncompressed_size = usize::try_from(header.uncompressed_page_size)
            .map_err(|_| Error::InvalidPage("negative uncompressed page size".into()))?;
        if compressed_size > self.remaining_bytes {
            return Err(Error::FileTruncated(format!(
                "a page of {} compressed bytes exceeds the {} bytes left in its chunk",
                compressed_size, self.remaining_bytes
            )));
        }

        trace!(
            page_type = header.type_.0,
            compressed_size,
            uncompressed_size,
            "reading page"
        );

        // reuse the allocation of the previous page
        let mut buffer = std::mem::take(&mut self.buffer);
        if compressed_size > buffer.len() {
            buffer = vec![0; compressed_size];
        } else {
            buffer.truncate(compressed_size);
        }
        self.reader.read_exact(&mut buffer).map_err(|_| {
            Error::FileTruncated("the file ends inside a page body".into())
        })?;
        self.remaining_bytes -= compressed_size;

        if self.options.check_crc {
            if let Some(crc) = header.crc {
                let computed = crc32fast::hash(&buffer);
                let expected = crc as u32;
                if computed != expected {
                    return Err(Error::Checksum { expected, computed });
                }
            }
        }

        let page = finish_page(
            header,
            buffer,
            self.compression,
            uncompressed_size,
            &self.descriptor,
        )?;
        if let CompressedPage::Data(page) = &page {
            self.remaining_values -= page.num_values() as i64;
        }
        Ok(Some(page))
    }
}

impl<R: Read> Iterator for PageReader<R> {
    type Item = Result<CompressedPage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page().transpose()
    }
}

fn finish_page(
    header: format::PageHeader,
    buffer: Vec<u8>,
    compression: Compression,
    uncompressed_size: usize,
    descriptor: &ColumnDescriptor,
) -> Result<CompressedPage> {
    match header.type_ {
        PageType::DICTIONARY_PAGE => {
            let dict_header = header.dictionary_page_header.as_ref().ok_or_else(|| {
                Error::InvalidPage("a dictionary page requires a dictionary header".into())
            })?;
            let num_values = usize::try_from(dict_header.num_values)
                .map_err(|_| Error::InvalidPage("negative number of dictionary values".into()))?;

            Ok(CompressedPage::Dict(CompressedDictPage::new(
                buffer,
                compression,
                uncompressed_size,
                num_values,
            )))
        }
        PageType::DATA_PAGE => {
            let data_header = header.data_page_header.ok_or_else(|| {
                Error::InvalidPage("a data page requires a data page header".into())
            })?;

            Ok(CompressedPage::Data(CompressedDataPage::new(
                DataPageHeader::V1(data_header),
                buffer,
                compression,
                uncompressed_size,
                descriptor.clone(),
            )))
        }
        PageType::DATA_PAGE_V2 => {
            let data_header = header.data_page_header_v2.ok_or_else(|| {
                Error::InvalidPage("a data page v2 requires a data page v2 header".into())
            })?;
            let levels_length = data_header.repetition_levels_byte_length as i64
                + data_header.definition_levels_byte_length as i64;
            if levels_length < 0 || levels_length as usize > uncompressed_size {
                return Err(Error::InvalidPage(
                    "v2 level byte lengths exceed the page size".into(),
                ));
            }

            Ok(CompressedPage::Data(CompressedDataPage::new(
                DataPageHeader::V2(data_header),
                buffer,
                compression,
                uncompressed_size,
                descriptor.clone(),
            )))
        }
        other => Err(Error::InvalidPage(format!(
            "unknown page type {}",
            other.0
        ))),
    }
}
