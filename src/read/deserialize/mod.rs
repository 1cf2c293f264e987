//! Decoding of one data page into typed, sparse values.
//!
//! The output convention is the sparse layout: `def_levels` and
//! `rep_levels` have one entry per logical row of the page, while
//! `values` holds only the present values (those whose definition level
//! equals the column's maximum), in logical order.

use crate::encoding::{byte_stream_split, delta_bitpacked, hybrid_rle, plain, Encoding};
use crate::error::{Error, Result};
use crate::page::{
    split_buffer, BinaryPageDict, DataPage, DictPage, FixedLenByteArrayPageDict,
    PrimitivePageDict,
};
use crate::read::levels::decode_levels;
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

/// Decodes the level streams of `page`, returning the number of present
/// values.
pub(crate) fn decode_page_levels(
    page: &DataPage,
    def_levels: &mut Vec<i16>,
    rep_levels: &mut Vec<i16>,
) -> Result<usize> {
    let (rep, def, _) = split_buffer(page)?;
    let num_values = page.num_values();
    let max_def = page.descriptor().max_def_level();
    let max_rep = page.descriptor().max_rep_level();

    decode_levels(rep, max_rep, num_values, rep_levels)?;
    decode_levels(def, max_def, num_values, def_levels)?;

    Ok(def_levels.iter().filter(|&&level| level == max_def).count())
}

/// The hybrid-RLE stream of dictionary indices of a dictionary-encoded
/// page: 1 byte of bit width followed by the indices, no length prefix.
fn dict_indices_decoder<'a>(
    values: &'a [u8],
    num_present: usize,
) -> Result<hybrid_rle::HybridRleDecoder<'a>> {
    let bit_width = *values.first().ok_or_else(|| {
        Error::InvalidPage("a dictionary-encoded page carries no bit width".into())
    })?;
    hybrid_rle::HybridRleDecoder::try_new(&values[1..], bit_width as u32, num_present)
}

fn downcast_dict<'a, T: 'static>(dict: Option<&'a dyn DictPage>) -> Result<&'a T> {
    dict.ok_or(Error::DictionaryNotFound)?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::TypeMismatch("the chunk's dictionary has another type".into()))
}

/// Decodes a data page of a fixed-width physical type.
pub fn decode_native_page<T: NativeType>(
    page: &DataPage,
    dict: Option<&dyn DictPage>,
    values: &mut Vec<T>,
    def_levels: &mut Vec<i16>,
    rep_levels: &mut Vec<i16>,
) -> Result<()> {
    let num_present = decode_page_levels(page, def_levels, rep_levels)?;
    let (_, _, buffer) = split_buffer(page)?;

    values.clear();
    if num_present == 0 {
        return Ok(());
    }
    values.reserve(num_present);
    match page.encoding()? {
        Encoding::Plain => {
            let mut iter = plain::decode_native::<T>(buffer)?;
            for _ in 0..num_present {
                values.push(iter.next().ok_or_else(exhausted)?);
            }
        }
        Encoding::PlainDictionary | Encoding::RleDictionary => {
            let dict = downcast_dict::<PrimitivePageDict<T>>(dict)?;
            for index in dict_indices_decoder(buffer, num_present)? {
                values.push(dict.value(index? as usize)?);
            }
        }
        Encoding::ByteStreamSplit => {
            let mut iter = byte_stream_split::Decoder::<T>::try_new(buffer)?;
            for _ in 0..num_present {
                values.push(iter.next().ok_or_else(exhausted)??);
            }
        }
        Encoding::DeltaBinaryPacked => decode_delta(page, buffer, num_present, values)?,
        other => {
            return Err(Error::InvalidEncoding(format!(
                "{:?} cannot encode a column of {:?}",
                other,
                page.descriptor().physical_type()
            )))
        }
    }
    Ok(())
}

fn decode_delta<T: NativeType>(
    page: &DataPage,
    buffer: &[u8],
    num_present: usize,
    values: &mut Vec<T>,
) -> Result<()> {
    let mut iter = delta_bitpacked::Decoder::try_new(buffer)?;
    match page.descriptor().physical_type() {
        PhysicalType::Int32 => {
            for _ in 0..num_present {
                let value = iter.next().ok_or_else(exhausted)??;
                values.push(cast_delta::<T>(&(value as i32).to_le_bytes())?);
            }
        }
        PhysicalType::Int64 => {
            for _ in 0..num_present {
                let value = iter.next().ok_or_else(exhausted)??;
                values.push(cast_delta::<T>(&value.to_le_bytes())?);
            }
        }
        other => {
            return Err(Error::InvalidEncoding(format!(
                "DELTA_BINARY_PACKED cannot encode a column of {:?}",
                other
            )))
        }
    }
    Ok(())
}

// `T` is i32/i64 by the physical-type dispatch above; the byte cast keeps
// the function monomorphic over `NativeType`.
fn cast_delta<T: NativeType>(bytes: &[u8]) -> Result<T> {
    let bytes = T::Bytes::try_from(bytes)
        .map_err(|_| Error::TypeMismatch("delta-encoded column read as another width".into()))?;
    Ok(T::from_le_bytes(bytes))
}

/// Decodes a boolean data page.
pub fn decode_boolean_page(
    page: &DataPage,
    values: &mut Vec<bool>,
    def_levels: &mut Vec<i16>,
    rep_levels: &mut Vec<i16>,
) -> Result<()> {
    let num_present = decode_page_levels(page, def_levels, rep_levels)?;
    let (_, _, buffer) = split_buffer(page)?;

    values.clear();
    if num_present == 0 {
        return Ok(());
    }
    values.reserve(num_present);
    match page.encoding()? {
        Encoding::Plain => {
            if buffer.len() * 8 < num_present {
                return Err(exhausted());
            }
            let iter = hybrid_rle::BitmapIter::new(buffer, 0, num_present);
            values.extend(iter);
        }
        Encoding::Rle => {
            // booleans may use the hybrid encoding with a length prefix
            let length = crate::encoding::get_length(buffer)? as usize;
            let buffer = buffer
                .get(4..4 + length)
                .ok_or_else(|| Error::InvalidPage("the RLE stream does not fit its page".into()))?;
            let decoder = hybrid_rle::HybridRleDecoder::try_new(buffer, 1, num_present)?;
            for value in decoder {
                values.push(value? != 0);
            }
        }
        other => {
            return Err(Error::InvalidEncoding(format!(
                "{:?} cannot encode a boolean column",
                other
            )))
        }
    }
    Ok(())
}

/// Decodes a byte-array data page. Values are copied out of the page.
pub fn decode_binary_page(
    page: &DataPage,
    dict: Option<&dyn DictPage>,
    values: &mut Vec<Vec<u8>>,
    def_levels: &mut Vec<i16>,
    rep_levels: &mut Vec<i16>,
) -> Result<()> {
    let num_present = decode_page_levels(page, def_levels, rep_levels)?;
    let (_, _, buffer) = split_buffer(page)?;

    values.clear();
    if num_present == 0 {
        return Ok(());
    }
    values.reserve(num_present);
    match page.encoding()? {
        Encoding::Plain => {
            for value in plain::BinaryIter::new(buffer, num_present) {
                values.push(value?.to_vec());
            }
        }
        Encoding::PlainDictionary | Encoding::RleDictionary => {
            let dict = downcast_dict::<BinaryPageDict>(dict)?;
            for index in dict_indices_decoder(buffer, num_present)? {
                values.push(dict.value(index? as usize)?.to_vec());
            }
        }
        other => {
            return Err(Error::InvalidEncoding(format!(
                "{:?} cannot encode a byte-array column",
                other
            )))
        }
    }
    Ok(())
}

/// Decodes a fixed-length byte-array data page.
pub fn decode_fixed_len_page(
    page: &DataPage,
    dict: Option<&dyn DictPage>,
    size: usize,
    values: &mut Vec<Vec<u8>>,
    def_levels: &mut Vec<i16>,
    rep_levels: &mut Vec<i16>,
) -> Result<()> {
    let num_present = decode_page_levels(page, def_levels, rep_levels)?;
    let (_, _, buffer) = split_buffer(page)?;

    values.clear();
    if num_present == 0 {
        return Ok(());
    }
    values.reserve(num_present);
    match page.encoding()? {
        Encoding::Plain => {
            if buffer.len() < num_present * size {
                return Err(exhausted());
            }
            values.extend(buffer[..num_present * size].chunks_exact(size).map(|chunk| chunk.to_vec()));
        }
        Encoding::PlainDictionary | Encoding::RleDictionary => {
            let dict = downcast_dict::<FixedLenByteArrayPageDict>(dict)?;
            for index in dict_indices_decoder(buffer, num_present)? {
                values.push(dict.value(index? as usize)?.to_vec());
            }
        }
        other => {
            return Err(Error::InvalidEncoding(format!(
                "{:?} cannot encode a fixed-length byte-array column",
                other
            )))
        }
    }
    Ok(())
}

fn exhausted() -> Error {
    Error::Decode("the page's values ended before its declared count".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;
    use crate::metadata::SchemaDescriptor;
    use crate::page::DataPageHeader;
    use crate::schema::types::ParquetType;
    use crate::schema::Repetition;

    fn required_page(
        physical_type: PhysicalType,
        encoding: format::Encoding,
        num_values: usize,
        buffer: Vec<u8>,
    ) -> DataPage {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::try_from_primitive(
                "col".to_string(),
                physical_type,
                Repetition::Required,
                None,
                None,
                None,
            )
            .unwrap()],
        );
        DataPage::new(
            DataPageHeader::V1(format::DataPageHeader {
                num_values: num_values as i32,
                encoding,
                definition_level_encoding: format::Encoding::RLE,
                repetition_level_encoding: format::Encoding::RLE,
                statistics: None,
            }),
            buffer,
            schema.column(0).clone(),
        )
    }

    #[test]
    fn delta_page_round_trip() -> crate::error::Result<()> {
        let expected = vec![7i64, -3, 12, 12, 100, -40];
        let mut buffer = vec![];
        crate::encoding::delta_bitpacked::encode(&expected, &mut buffer);
        let page = required_page(
            PhysicalType::Int64,
            format::Encoding::DELTA_BINARY_PACKED,
            expected.len(),
            buffer,
        );

        let mut values = vec![];
        let mut def_levels = vec![];
        let mut rep_levels = vec![];
        decode_native_page::<i64>(&page, None, &mut values, &mut def_levels, &mut rep_levels)?;
        assert_eq!(values, expected);
        assert_eq!(def_levels, vec![0; expected.len()]);
        Ok(())
    }

    #[test]
    fn byte_stream_split_page_round_trip() -> crate::error::Result<()> {
        let expected = vec![0.5f64, -1.25, 1e300, f64::MIN_POSITIVE];
        let mut buffer = vec![];
        crate::encoding::byte_stream_split::encode(&expected, &mut buffer);
        let page = required_page(
            PhysicalType::Double,
            format::Encoding::BYTE_STREAM_SPLIT,
            expected.len(),
            buffer,
        );

        let mut values = vec![];
        let mut def_levels = vec![];
        let mut rep_levels = vec![];
        decode_native_page::<f64>(&page, None, &mut values, &mut def_levels, &mut rep_levels)?;
        assert_eq!(values, expected);
        Ok(())
    }

    #[test]
    fn dictionary_page_without_dictionary_errors() {
        let page = required_page(
            PhysicalType::Int32,
            format::Encoding::RLE_DICTIONARY,
            1,
            vec![1, 2],
        );
        let mut values: Vec<i32> = vec![];
        let mut def_levels = vec![];
        let mut rep_levels = vec![];
        let result =
            decode_native_page::<i32>(&page, None, &mut values, &mut def_levels, &mut rep_levels);
        assert!(matches!(result, Err(Error::DictionaryNotFound)));
    }
}
