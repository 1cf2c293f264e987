use crate::compression::{create_codec, CompressionLevel};
use crate::error::{Error, Result};
use crate::page::{CompressedPage, DataPage, DataPageHeader, EncodedDictPage};

/// An uncompressed page, ready for value decoding.
#[derive(Debug)]
pub enum Page {
    Data(DataPage),
    Dict(EncodedDictPage),
}

/// Decompresses a page into `buffer`, which is resized to exactly the
/// uncompressed page size. For V2 data pages the level bytes are stored
/// uncompressed and `is_compressed` governs only the value block.
pub fn decompress_page(page: CompressedPage, buffer: &mut Vec<u8>) -> Result<Page> {
    let codec = create_codec(page.compression(), CompressionLevel::default())?;
    let uncompressed_size = page.uncompressed_size();

    match page {
        CompressedPage::Data(page) => {
            let offset = match &page.header {
                DataPageHeader::V1(_) => 0,
                DataPageHeader::V2(header) => {
                    // levels are never compressed in v2
                    (header.repetition_levels_byte_length
                        + header.definition_levels_byte_length) as usize
                }
            };
            // when the flag is missing the values are considered compressed
            let is_compressed = match &page.header {
                DataPageHeader::V1(_) => true,
                DataPageHeader::V2(header) => header.is_compressed.unwrap_or(true),
            };

            let buffer = match codec {
                Some(mut codec) if is_compressed => {
                    if offset > page.buffer.len() || offset > uncompressed_size {
                        return Err(Error::InvalidPage(
                            "v2 level bytes do not fit the page".into(),
                        ));
                    }
                    buffer.clear();
                    buffer.resize(uncompressed_size, 0);
                    buffer[..offset].copy_from_slice(&page.buffer[..offset]);
                    codec.decompress(&page.buffer[offset..], &mut buffer[offset..])?;
                    std::mem::take(buffer)
                }
                _ => {
                    if page.buffer.len() != uncompressed_size {
                        return Err(Error::Decompression(format!(
                            "an uncompressed page of {} bytes declares {}",
                            page.buffer.len(),
                            uncompressed_size
                        )));
                    }
                    page.buffer
                }
            };

            Ok(Page::Data(DataPage::new(
                page.header,
                buffer,
                page.descriptor,
            )))
        }
        CompressedPage::Dict(page) => {
            let buffer = match codec {
                Some(mut codec) => {
                    buffer.clear();
                    buffer.resize(uncompressed_size, 0);
                    codec.decompress(&page.buffer, buffer)?;
                    std::mem::take(buffer)
                }
                None => {
                    if page.buffer.len() != uncompressed_size {
                        return Err(Error::Decompression(format!(
                            "an uncompressed dictionary page of {} bytes declares {}",
                            page.buffer.len(),
                            uncompressed_size
                        )));
                    }
                    page.buffer
                }
            };
            Ok(Page::Dict(EncodedDictPage::new(buffer, page.num_values)))
        }
    }
}
