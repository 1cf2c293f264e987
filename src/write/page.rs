use std::io::Write;

use crate::error::{Error, Result};
use crate::format;
use crate::page::{CompressedDataPage, CompressedDictPage, CompressedPage, DataPageHeader};
use crate::thrift::CompactWriter;
use crate::write::DictionaryMode;

fn maybe_bytes(uncompressed: usize, compressed: usize) -> Result<(i32, i32)> {
    let uncompressed_page_size: i32 = uncompressed.try_into().map_err(|_| {
        Error::Encode(format!(
            "a page can only contain i32::MAX uncompressed bytes, this one holds {}",
            uncompressed
        ))
    })?;

    let compressed_page_size: i32 = compressed.try_into().map_err(|_| {
        Error::Encode(format!(
            "a page can only contain i32::MAX compressed bytes, this one holds {}",
            compressed
        ))
    })?;

    Ok((uncompressed_page_size, compressed_page_size))
}

/// Contains page write metrics.
#[derive(Debug, Clone)]
pub struct PageWriteSpec {
    pub header: format::PageHeader,
    pub header_size: u64,
    /// Absolute position of the page (header included) in the file.
    pub offset: u64,
    pub bytes_written: u64,
    /// Logical rows of a data page; zero for dictionary pages.
    pub num_rows: usize,
}

/// Writes a page (header + compressed body) at `offset`, optionally
/// stamping a CRC32 of the compressed body into the header.
pub fn write_page<W: Write>(
    writer: &mut W,
    offset: u64,
    page: &CompressedPage,
    write_checksum: bool,
    dictionary_mode: Option<DictionaryMode>,
) -> Result<PageWriteSpec> {
    let crc = write_checksum.then(|| crc32fast::hash(page.buffer()) as i32);
    let header = match &page {
        CompressedPage::Data(page) => assemble_data_page_header(page, crc),
        CompressedPage::Dict(page) => assemble_dict_page_header(page, crc, dictionary_mode),
    }?;

    let mut thrift_writer = CompactWriter::new(&mut *writer);
    header.write_to(&mut thrift_writer)?;
    let header_size = thrift_writer.written() as u64;

    writer.write_all(page.buffer())?;
    let bytes_written = header_size + page.buffer().len() as u64;

    let num_rows = match &page {
        CompressedPage::Data(page) => page.num_values(),
        CompressedPage::Dict(_) => 0,
    };

    Ok(PageWriteSpec {
        header,
        header_size,
        offset,
        bytes_written,
        num_rows,
    })
}

fn assemble_data_page_header(
    page: &CompressedDataPage,
    crc: Option<i32>,
) -> Result<format::PageHeader> {
    let (uncompressed_page_size, compressed_page_size) =
        maybe_bytes(page.uncompressed_size(), page.compressed_size())?;

    let mut header = format::PageHeader {
        type_: match page.header() {
            DataPageHeader::V1(_) => format::PageType::DATA_PAGE,
            DataPageHeader::V2(_) => format::PageType::DATA_PAGE_V2,
        },
        uncompressed_page_size,
        compressed_page_size,
        crc,
        data_page_header: None,
        dictionary_page_header: None,
        data_page_header_v2: None,
    };

    match page.header() {
        DataPageHeader::V1(data_header) => {
            header.data_page_header = Some(data_header.clone());
        }
        DataPageHeader::V2(data_header) => {
            header.data_page_header_v2 = Some(data_header.clone());
        }
    }
    Ok(header)
}

fn assemble_dict_page_header(
    page: &CompressedDictPage,
    crc: Option<i32>,
    dictionary_mode: Option<DictionaryMode>,
) -> Result<format::PageHeader> {
    let (uncompressed_page_size, compressed_page_size) =
        maybe_bytes(page.uncompressed_page_size, page.buffer.len())?;

    let num_values: i32 = page.num_values.try_into().map_err(|_| {
        Error::Encode(format!(
            "a dictionary page can only contain i32::MAX items, this one holds {}",
            page.num_values
        ))
    })?;

    // the legacy pair stamps the dictionary page PLAIN_DICTIONARY
    let encoding = match dictionary_mode {
        Some(DictionaryMode::PlainDictionary) => format::Encoding::PLAIN_DICTIONARY,
        _ => format::Encoding::PLAIN,
    };

    Ok(format::PageHeader {
        type_: format::PageType::DICTIONARY_PAGE,
        uncompressed_page_size,
        compressed_page_size,
        crc,
        data_page_header: None,
        dictionary_page_header: Some(format::DictionaryPageHeader {
            num_values,
            encoding,
            is_sorted: None,
        }),
        data_page_header_v2: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::Compression;

    #[test]
    fn dict_too_many_values() {
        let page = CompressedDictPage::new(
            vec![],
            Compression::Uncompressed,
            0,
            i32::MAX as usize + 1,
        );
        assert!(assemble_dict_page_header(&page, None, None).is_err());
    }

    #[test]
    fn crc_is_over_the_compressed_body() -> Result<()> {
        let body = b"some compressed bytes".to_vec();
        let page = CompressedPage::Dict(CompressedDictPage::new(
            body.clone(),
            Compression::Uncompressed,
            body.len(),
            1,
        ));
        let mut out = vec![];
        let spec = write_page(&mut out, 0, &page, true, None)?;
        assert_eq!(spec.header.crc, Some(crc32fast::hash(&body) as i32));
        // the body is appended verbatim after the header
        assert_eq!(&out[spec.header_size as usize..], body.as_slice());
        Ok(())
    }
}
