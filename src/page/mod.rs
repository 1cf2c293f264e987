mod page_dict;
pub use page_dict::*;

use crate::compression::Compression;
use crate::encoding::{get_length, Encoding};
use crate::error::{Error, Result};
use crate::format;
use crate::metadata::ColumnDescriptor;

pub use crate::parquet_bridge::PageType;

/// The header of a data page, either V1 or V2.
#[derive(Debug, Clone, PartialEq)]
pub enum DataPageHeader {
    V1(format::DataPageHeader),
    V2(format::DataPageHeaderV2),
}

impl DataPageHeader {
    pub fn num_values(&self) -> usize {
        match self {
            DataPageHeader::V1(header) => header.num_values as usize,
            DataPageHeader::V2(header) => header.num_values as usize,
        }
    }

    pub fn encoding(&self) -> Result<Encoding> {
        match self {
            DataPageHeader::V1(header) => header.encoding.try_into(),
            DataPageHeader::V2(header) => header.encoding.try_into(),
        }
    }

    pub fn statistics(&self) -> Option<&format::Statistics> {
        match self {
            DataPageHeader::V1(header) => header.statistics.as_ref(),
            DataPageHeader::V2(header) => header.statistics.as_ref(),
        }
    }
}

/// A [`CompressedDataPage`] is a compressed, encoded representation of a
/// data page. It holds actual data and thus cloning it is expensive.
#[derive(Debug)]
pub struct CompressedDataPage {
    pub(crate) header: DataPageHeader,
    pub(crate) buffer: Vec<u8>,
    pub(crate) compression: Compression,
    pub(crate) uncompressed_page_size: usize,
    pub(crate) descriptor: ColumnDescriptor,
}

impl CompressedDataPage {
    pub fn new(
        header: DataPageHeader,
        buffer: Vec<u8>,
        compression: Compression,
        uncompressed_page_size: usize,
        descriptor: ColumnDescriptor,
    ) -> Self {
        Self {
            header,
            buffer,
            compression,
            uncompressed_page_size,
            descriptor,
        }
    }

    pub fn header(&self) -> &DataPageHeader {
        &self.header
    }

    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_page_size
    }

    pub fn compressed_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn num_values(&self) -> usize {
        self.header.num_values()
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }
}

/// An uncompressed, encoded data page. The buffer holds
/// `[rep levels][def levels][values]`.
#[derive(Debug, Clone)]
pub struct DataPage {
    header: DataPageHeader,
    pub(crate) buffer: Vec<u8>,
    descriptor: ColumnDescriptor,
}

impl DataPage {
    pub fn new(header: DataPageHeader, buffer: Vec<u8>, descriptor: ColumnDescriptor) -> Self {
        Self {
            header,
            buffer,
            descriptor,
        }
    }

    pub fn header(&self) -> &DataPageHeader {
        &self.header
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn num_values(&self) -> usize {
        self.header.num_values()
    }

    pub fn encoding(&self) -> Result<Encoding> {
        self.header.encoding()
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Consumes the page, returning its buffer for reuse.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}

/// A dictionary page's body before value decoding, already uncompressed.
#[derive(Debug, Clone)]
pub struct EncodedDictPage {
    pub(crate) buffer: Vec<u8>,
    pub(crate) num_values: usize,
}

impl EncodedDictPage {
    pub fn new(buffer: Vec<u8>, num_values: usize) -> Self {
        Self { buffer, num_values }
    }
}

/// A compressed dictionary page.
#[derive(Debug)]
pub struct CompressedDictPage {
    pub(crate) buffer: Vec<u8>,
    pub(crate) compression: Compression,
    pub(crate) uncompressed_page_size: usize,
    pub(crate) num_values: usize,
}

impl CompressedDictPage {
    pub fn new(
        buffer: Vec<u8>,
        compression: Compression,
        uncompressed_page_size: usize,
        num_values: usize,
    ) -> Self {
        Self {
            buffer,
            compression,
            uncompressed_page_size,
            num_values,
        }
    }
}

/// A compressed page: what the page writer emits and the page reader
/// ingests.
#[derive(Debug)]
pub enum CompressedPage {
    Data(CompressedDataPage),
    Dict(CompressedDictPage),
}

impl CompressedPage {
    pub(crate) fn buffer(&self) -> &[u8] {
        match self {
            CompressedPage::Data(page) => &page.buffer,
            CompressedPage::Dict(page) => &page.buffer,
        }
    }

    pub(crate) fn uncompressed_size(&self) -> usize {
        match self {
            CompressedPage::Data(page) => page.uncompressed_page_size,
            CompressedPage::Dict(page) => page.uncompressed_page_size,
        }
    }

    pub(crate) fn compression(&self) -> Compression {
        match self {
            CompressedPage::Data(page) => page.compression,
            CompressedPage::Dict(page) => page.compression,
        }
    }
}

// read: CompressedPage -> Page
// write: Page -> CompressedPage

/// Splits an uncompressed data page buffer into
/// `(repetition levels, definition levels, values)`.
///
/// V1 level streams carry their own 4-byte little-endian length prefix;
/// V2 streams are delimited by the byte lengths the header declares and
/// carry no prefix.
pub fn split_buffer(page: &DataPage) -> Result<(&[u8], &[u8], &[u8])> {
    let buffer = page.buffer();
    let has_rep = page.descriptor().max_rep_level() > 0;
    let has_def = page.descriptor().max_def_level() > 0;

    match page.header() {
        DataPageHeader::V1(_) => {
            let (rep, buffer) = take_v1_level(buffer, has_rep)?;
            let (def, buffer) = take_v1_level(buffer, has_def)?;
            Ok((rep, def, buffer))
        }
        DataPageHeader::V2(header) => {
            let rep_length = usize::try_from(header.repetition_levels_byte_length)
                .map_err(|_| Error::InvalidPage("negative level byte length".into()))?;
            let def_length = usize::try_from(header.definition_levels_byte_length)
                .map_err(|_| Error::InvalidPage("negative level byte length".into()))?;
            if rep_length + def_length > buffer.len() {
                return Err(Error::InvalidPage(format!(
                    "the header declares {} level bytes but the page holds {}",
                    rep_length + def_length,
                    buffer.len()
                )));
            }
            Ok((
                &buffer[..rep_length],
                &buffer[rep_length..rep_length + def_length],
                &buffer[rep_length + def_length..],
            ))
        }
    }
}

fn take_v1_level(buffer: &[u8], present: bool) -> Result<(&[u8], &[u8])> {
    if !present {
        return Ok((&[], buffer));
    }
    let length = get_length(buffer)? as usize;
    if 4 + length > buffer.len() {
        return Err(Error::InvalidPage(format!(
            "a level stream of {} bytes does not fit its page",
            length
        )));
    }
    Ok((&buffer[4..4 + length], &buffer[4 + length..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ParquetType, PhysicalType};
    use crate::schema::Repetition;

    fn descriptor(repetition: Repetition) -> ColumnDescriptor {
        let schema = crate::metadata::SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::try_from_primitive(
                "col".to_string(),
                PhysicalType::Int32,
                repetition,
                None,
                None,
                None,
            )
            .unwrap()],
        );
        schema.column(0).clone()
    }

    fn v1_page(buffer: Vec<u8>, repetition: Repetition) -> DataPage {
        DataPage::new(
            DataPageHeader::V1(format::DataPageHeader {
                num_values: 3,
                encoding: format::Encoding::PLAIN,
                definition_level_encoding: format::Encoding::RLE,
                repetition_level_encoding: format::Encoding::RLE,
                statistics: None,
            }),
            buffer,
            descriptor(repetition),
        )
    }

    #[test]
    fn split_required_is_all_values() -> Result<()> {
        let page = v1_page(vec![1, 2, 3, 4], Repetition::Required);
        let (rep, def, values) = split_buffer(&page)?;
        assert!(rep.is_empty());
        assert!(def.is_empty());
        assert_eq!(values, &[1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn split_v1_consumes_length_prefix() -> Result<()> {
        // def levels: 2 bytes; then values
        let page = v1_page(vec![2, 0, 0, 0, 0xAA, 0xBB, 9, 9], Repetition::Optional);
        let (rep, def, values) = split_buffer(&page)?;
        assert!(rep.is_empty());
        assert_eq!(def, &[0xAA, 0xBB]);
        assert_eq!(values, &[9, 9]);
        Ok(())
    }

    #[test]
    fn split_v1_rejects_overrun() {
        let page = v1_page(vec![100, 0, 0, 0, 1], Repetition::Optional);
        assert!(split_buffer(&page).is_err());
    }

    #[test]
    fn split_v2_uses_header_lengths() -> Result<()> {
        let page = DataPage::new(
            DataPageHeader::V2(format::DataPageHeaderV2 {
                num_values: 3,
                num_nulls: 1,
                num_rows: 3,
                encoding: format::Encoding::PLAIN,
                definition_levels_byte_length: 2,
                repetition_levels_byte_length: 0,
                is_compressed: Some(false),
                statistics: None,
            }),
            vec![0xAA, 0xBB, 7, 7],
            descriptor(Repetition::Optional),
        );
        let (rep, def, values) = split_buffer(&page)?;
        assert!(rep.is_empty());
        assert_eq!(def, &[0xAA, 0xBB]);
        assert_eq!(values, &[7, 7]);
        Ok(())
    }
}
