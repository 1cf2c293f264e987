use crate::compression::{create_codec, Compression, CompressionLevel};
use crate::error::{Error, Result};
use crate::page::{
    CompressedDataPage, CompressedDictPage, CompressedPage, DataPage, DataPageHeader,
    EncodedDictPage,
};

/// An encoded, uncompressed page headed for [`compress_page`].
#[derive(Debug)]
pub enum EncodedPage {
    Data(DataPage),
    Dict(EncodedDictPage),
}

/// Compresses an encoded page. For V2 data pages only the value block is
/// compressed; the level bytes stay as they are.
pub fn compress_page(
    page: EncodedPage,
    compression: Compression,
    compression_level: CompressionLevel,
) -> Result<CompressedPage> {
    let codec = create_codec(compression, compression_level)?;
    match page {
        EncodedPage::Data(page) => {
            let uncompressed_page_size = page.buffer().len();
            let buffer = match codec {
                Some(mut codec) => {
                    let levels_offset = match page.header() {
                        DataPageHeader::V1(_) => 0,
                        DataPageHeader::V2(header) => {
                            (header.repetition_levels_byte_length
                                + header.definition_levels_byte_length)
                                as usize
                        }
                    };
                    if levels_offset > page.buffer().len() {
                        return Err(Error::Encode(
                            "v2 level bytes exceed the page buffer".into(),
                        ));
                    }
                    let mut buffer = page.buffer()[..levels_offset].to_vec();
                    codec.compress(&page.buffer()[levels_offset..], &mut buffer)?;
                    buffer
                }
                None => page.buffer().to_vec(),
            };
            let descriptor = page.descriptor().clone();
            Ok(CompressedPage::Data(CompressedDataPage::new(
                page.header().clone(),
                buffer,
                compression,
                uncompressed_page_size,
                descriptor,
            )))
        }
        EncodedPage::Dict(page) => {
            let uncompressed_page_size = page.buffer.len();
            let buffer = match codec {
                Some(mut codec) => {
                    let mut buffer = vec![];
                    codec.compress(&page.buffer, &mut buffer)?;
                    buffer
                }
                None => page.buffer.clone(),
            };
            Ok(CompressedPage::Dict(CompressedDictPage::new(
                buffer,
                compression,
                uncompressed_page_size,
                page.num_values,
            )))
        }
    }
}
