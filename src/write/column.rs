use std::collections::HashMap;

use tracing::trace;

use crate::encoding::{hybrid_rle, plain};
use crate::error::{Error, Result};
use crate::format;
use crate::metadata::ColumnDescriptor;
use crate::page::{CompressedPage, DataPage, DataPageHeader, EncodedDictPage};
use crate::read::levels::get_bit_width;
use crate::schema::types::PhysicalType;
use crate::types::{Int96, NativeType};
use crate::write::compression::{compress_page, EncodedPage};
use crate::write::statistics::StatisticsTracker;
use crate::write::{DictionaryMode, Version, WriteOptions};

/// A value type a column writer can consume, with its PLAIN encoding and
/// statistics payload. The closed set of implementations mirrors the
/// physical types.
pub trait WriteValue: Clone + std::fmt::Debug {
    /// Whether a column of `physical_type` can hold this value type.
    fn matches(physical_type: PhysicalType) -> bool;

    /// Appends `values` in PLAIN encoding.
    fn encode_plain(values: &[Self], physical_type: PhysicalType, buffer: &mut Vec<u8>);

    /// The number of bytes `self` occupies in PLAIN encoding.
    fn plain_size(&self) -> usize;

    /// The plain payload of one value: the statistics min/max
    /// representation, also used as the dictionary key.
    fn payload(&self) -> Vec<u8>;

    fn is_nan(&self) -> bool {
        false
    }

    /// Whether values of this type may be dictionary-encoded.
    fn dictionary_eligible() -> bool {
        true
    }
}

macro_rules! native_write_value {
    ($type:ty) => {
        impl WriteValue for $type {
            fn matches(physical_type: PhysicalType) -> bool {
                physical_type == <$type as NativeType>::TYPE
            }

            fn encode_plain(values: &[Self], _: PhysicalType, buffer: &mut Vec<u8>) {
                plain::encode_native(values, buffer)
            }

            fn plain_size(&self) -> usize {
                std::mem::size_of::<Self>()
            }

            fn payload(&self) -> Vec<u8> {
                self.to_le_bytes().as_ref().to_vec()
            }

            fn is_nan(&self) -> bool {
                native_is_nan(self)
            }
        }
    };
}

// NaN only exists for the float types; everything else is never NaN
fn native_is_nan<T: PartialOrd>(value: &T) -> bool {
    value.partial_cmp(value).is_none()
}

native_write_value!(i32);
native_write_value!(i64);
native_write_value!(f32);
native_write_value!(f64);
native_write_value!(Int96);

impl WriteValue for bool {
    fn matches(physical_type: PhysicalType) -> bool {
        physical_type == PhysicalType::Boolean
    }

    fn encode_plain(values: &[Self], _: PhysicalType, buffer: &mut Vec<u8>) {
        plain::encode_bool(values, buffer)
    }

    fn plain_size(&self) -> usize {
        1
    }

    fn payload(&self) -> Vec<u8> {
        vec![*self as u8]
    }

    fn dictionary_eligible() -> bool {
        false
    }
}

impl WriteValue for Vec<u8> {
    fn matches(physical_type: PhysicalType) -> bool {
        matches!(
            physical_type,
            PhysicalType::ByteArray | PhysicalType::FixedLenByteArray(_)
        )
    }

    fn encode_plain(values: &[Self], physical_type: PhysicalType, buffer: &mut Vec<u8>) {
        match physical_type {
            PhysicalType::FixedLenByteArray(size) => {
                plain::encode_fixed_len_binary(values, size, buffer)
            }
            _ => plain::encode_binary(values, buffer),
        }
    }

    fn plain_size(&self) -> usize {
        4 + self.len()
    }

    fn payload(&self) -> Vec<u8> {
        self.clone()
    }
}

/// The dictionary being built for one column chunk: distinct values in
/// first-occurrence order.
#[derive(Debug, Default)]
struct DictBuilder {
    indices_of: HashMap<Vec<u8>, u32>,
    /// plain payloads in insertion order; the page body re-encodes them
    payload_size: usize,
}

impl DictBuilder {
    fn index_of(&mut self, payload: Vec<u8>) -> u32 {
        let next = self.indices_of.len() as u32;
        let size = payload.len();
        match self.indices_of.entry(payload) {
            std::collections::hash_map::Entry::Occupied(entry) => *entry.get(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(next);
                self.payload_size += size;
                next
            }
        }
    }

    fn len(&self) -> usize {
        self.indices_of.len()
    }
}

/// Writes one column chunk: accumulates typed batches, flushes a page
/// when the estimate reaches the target page size, and finalizes into
/// the chunk's compressed pages.
pub struct ColumnWriter<'a, T: WriteValue> {
    descriptor: &'a ColumnDescriptor,
    options: &'a WriteOptions,

    // current page accumulation, in the sparse layout
    values: Vec<T>,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    estimated_size: usize,

    // all distinct values seen, while dictionary encoding is active
    dict: Option<DictBuilder>,
    dict_values: Vec<T>,

    pages: Vec<CompressedPage>,
    page_statistics: StatisticsTracker,
    num_rows: usize,
}

impl<'a, T: WriteValue> ColumnWriter<'a, T> {
    pub fn try_new(descriptor: &'a ColumnDescriptor, options: &'a WriteOptions) -> Result<Self> {
        if !T::matches(descriptor.physical_type()) {
            return Err(Error::TypeMismatch(format!(
                "a column of {:?} cannot be written from this value type",
                descriptor.physical_type()
            )));
        }
        let dict = options
            .dictionary
            .filter(|_| T::dictionary_eligible())
            .map(|_| DictBuilder::default());
        Ok(Self {
            descriptor,
            options,
            values: vec![],
            def_levels: vec![],
            rep_levels: vec![],
            estimated_size: 0,
            dict,
            dict_values: vec![],
            pages: vec![],
            page_statistics: StatisticsTracker::new(descriptor.physical_type()),
            num_rows: 0,
        })
    }

    /// Logical rows consumed so far.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Uncompressed bytes accumulated so far, flushed pages included.
    pub fn estimated_size(&self) -> usize {
        self.estimated_size
            + self
                .pages
                .iter()
                .map(|page| page.uncompressed_size())
                .sum::<usize>()
    }

    /// Writes a batch in the sparse layout: `def_levels` and `rep_levels`
    /// (when the column is optional/repeated) hold one entry per logical
    /// row; `values` holds only the present values, in order.
    ///
    /// For a REQUIRED column, `def_levels` is `None` and every value is a
    /// row.
    pub fn push(
        &mut self,
        values: &[T],
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
    ) -> Result<()> {
        let max_def = self.descriptor.max_def_level();
        let max_rep = self.descriptor.max_rep_level();

        let num_rows = match (def_levels, max_def) {
            (None, 0) => values.len(),
            (Some(def_levels), max) if max > 0 => {
                let num_present = def_levels.iter().filter(|&&def| def == max).count();
                if num_present != values.len() {
                    return Err(Error::InvalidArgument(format!(
                        "the def levels declare {} present values, the batch holds {}",
                        num_present,
                        values.len()
                    )));
                }
                if def_levels.iter().any(|&def| def < 0 || def > max) {
                    return Err(Error::InvalidArgument(
                        "a definition level is out of the column's range".into(),
                    ));
                }
                def_levels.len()
            }
            (None, _) => {
                return Err(Error::InvalidArgument(
                    "an optional column requires definition levels".into(),
                ))
            }
            (Some(_), _) => {
                return Err(Error::InvalidArgument(
                    "a required column admits no definition levels".into(),
                ))
            }
        };
        match (rep_levels, max_rep) {
            (None, 0) => {}
            (Some(rep_levels), max) if max > 0 => {
                if rep_levels.len() != num_rows {
                    return Err(Error::InvalidArgument(
                        "repetition levels must cover every logical row".into(),
                    ));
                }
            }
            _ => {
                return Err(Error::InvalidArgument(
                    "repetition levels do not match the column's shape".into(),
                ))
            }
        }

        // rows are consumed one by one so that a page can be flushed in
        // the middle of an arbitrarily large batch
        match def_levels {
            None => {
                for (row, value) in values.iter().enumerate() {
                    if let Some(rep_levels) = rep_levels {
                        self.rep_levels.push(rep_levels[row]);
                    }
                    self.track_value(value)?;
                    self.values.push(value.clone());
                    self.maybe_flush()?;
                }
            }
            Some(defs) => {
                let mut value_index = 0;
                for (row, &def) in defs.iter().enumerate() {
                    if let Some(rep_levels) = rep_levels {
                        self.rep_levels.push(rep_levels[row]);
                    }
                    self.def_levels.push(def);
                    if def == max_def {
                        let value = &values[value_index];
                        value_index += 1;
                        self.track_value(value)?;
                        self.values.push(value.clone());
                    } else {
                        self.page_statistics.update_null();
                        self.estimated_size += 1;
                    }
                    self.maybe_flush()?;
                }
            }
        }
        self.num_rows += num_rows;
        Ok(())
    }

    fn track_value(&mut self, value: &T) -> Result<()> {
        self.page_statistics.update(&value.payload(), value.is_nan())?;
        self.estimated_size += value.plain_size();
        Ok(())
    }

    fn maybe_flush(&mut self) -> Result<()> {
        if self.estimated_size >= self.options.page_size {
            self.flush_page()?;
        }
        Ok(())
    }

    /// Encodes and compresses the accumulated page.
    fn flush_page(&mut self) -> Result<()> {
        let num_values = if self.descriptor.max_def_level() > 0 {
            self.def_levels.len()
        } else {
            self.values.len()
        };
        if num_values == 0 {
            return Ok(());
        }

        // encode levels, then values
        let max_def = self.descriptor.max_def_level();
        let max_rep = self.descriptor.max_rep_level();
        let mut buffer = vec![];
        encode_levels(&self.rep_levels, max_rep, self.options.version, &mut buffer)?;
        encode_levels(&self.def_levels, max_def, self.options.version, &mut buffer)?;
        let levels_byte_length = buffer.len();

        // a page without present values stays PLAIN, so that a chunk of
        // only nulls never references a dictionary page it does not have
        let encoding = match &mut self.dict {
            Some(dict) if !self.values.is_empty() => {
                let bit_width = encode_dict_indices(&self.values, dict, &mut self.dict_values, &mut buffer)?;
                trace!(bit_width, "dictionary-encoded page");
                match self.options.dictionary {
                    Some(DictionaryMode::RleDictionary) => format::Encoding::RLE_DICTIONARY,
                    _ => format::Encoding::PLAIN_DICTIONARY,
                }
            }
            _ => {
                T::encode_plain(&self.values, self.descriptor.physical_type(), &mut buffer);
                format::Encoding::PLAIN
            }
        };

        let page_statistics = self.page_statistics.flush();
        let num_nulls = page_statistics.null_count.unwrap_or(0);
        let statistics = self.options.write_statistics.then_some(page_statistics);

        let header = match self.options.version {
            Version::V1 => DataPageHeader::V1(format::DataPageHeader {
                num_values: num_values as i32,
                encoding,
                definition_level_encoding: format::Encoding::RLE,
                repetition_level_encoding: format::Encoding::RLE,
                statistics,
            }),
            Version::V2 => DataPageHeader::V2(format::DataPageHeaderV2 {
                num_values: num_values as i32,
                num_nulls: num_nulls as i32,
                num_rows: num_values as i32,
                encoding,
                definition_levels_byte_length: def_levels_byte_length(
                    levels_byte_length,
                    max_rep,
                    &self.rep_levels,
                )?,
                repetition_levels_byte_length: rep_levels_byte_length(max_rep, &self.rep_levels)?,
                is_compressed: Some(self.options.compression != crate::compression::Compression::Uncompressed),
                statistics,
            }),
        };

        let page = DataPage::new(header, buffer, self.descriptor.clone());
        let page = compress_page(
            EncodedPage::Data(page),
            self.options.compression,
            self.options.compression_level,
        )?;
        self.pages.push(page);

        self.values.clear();
        self.def_levels.clear();
        self.rep_levels.clear();
        self.estimated_size = 0;

        // a dictionary past its size target stops absorbing new pages
        if let Some(dict) = &self.dict {
            if dict.payload_size > self.options.dictionary_page_size {
                trace!(entries = dict.len(), "dictionary reached its size target");
                self.dict = None;
            }
        }
        Ok(())
    }

    /// Flushes the open page and returns the chunk's pages, dictionary
    /// page first when one was built.
    pub fn finish(mut self) -> Result<Vec<CompressedPage>> {
        self.flush_page()?;

        let mut pages = Vec::with_capacity(self.pages.len() + 1);
        if !self.dict_values.is_empty() {
            let mut buffer = vec![];
            T::encode_plain(
                &self.dict_values,
                self.descriptor.physical_type(),
                &mut buffer,
            );
            let dict_page = EncodedDictPage::new(buffer, self.dict_values.len());
            pages.push(compress_page(
                EncodedPage::Dict(dict_page),
                self.options.compression,
                self.options.compression_level,
            )?);
        }
        pages.extend(self.pages);
        Ok(pages)
    }
}

/// Encodes one level stream: for V1 a 4-byte length prefix followed by
/// the hybrid stream, for V2 the bare hybrid stream.
fn encode_levels(
    levels: &[i16],
    max_level: i16,
    version: Version,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    if max_level == 0 {
        return Ok(());
    }
    let bit_width = get_bit_width(max_level) as u8;
    let widened = levels.iter().map(|&level| level as u32).collect::<Vec<_>>();
    match version {
        Version::V1 => {
            let start = buffer.len();
            buffer.extend_from_slice(&[0; 4]);
            hybrid_rle::encode(buffer, &widened, bit_width)?;
            let length = (buffer.len() - start - 4) as u32;
            buffer[start..start + 4].copy_from_slice(&length.to_le_bytes());
        }
        Version::V2 => {
            hybrid_rle::encode(buffer, &widened, bit_width)?;
        }
    }
    Ok(())
}

fn rep_levels_byte_length(max_rep: i16, rep_levels: &[i16]) -> Result<i32> {
    if max_rep == 0 {
        return Ok(0);
    }
    let mut scratch = vec![];
    let widened = rep_levels.iter().map(|&level| level as u32).collect::<Vec<_>>();
    hybrid_rle::encode(&mut scratch, &widened, get_bit_width(max_rep) as u8)?;
    Ok(scratch.len() as i32)
}

fn def_levels_byte_length(total: usize, max_rep: i16, rep_levels: &[i16]) -> Result<i32> {
    Ok(total as i32 - rep_levels_byte_length(max_rep, rep_levels)?)
}

/// Appends the dictionary index stream (1 byte of bit width + hybrid
/// RLE) of `values`, registering new distinct values.
fn encode_dict_indices<T: WriteValue>(
    values: &[T],
    dict: &mut DictBuilder,
    dict_values: &mut Vec<T>,
    buffer: &mut Vec<u8>,
) -> Result<u8> {
    let indices = values
        .iter()
        .map(|value| {
            let before = dict.len();
            let index = dict.index_of(value.payload());
            if dict.len() > before {
                dict_values.push(value.clone());
            }
            index
        })
        .collect::<Vec<_>>();

    let bit_width = crate::encoding::log2(dict.len().saturating_sub(1) as u64) as u8;
    buffer.push(bit_width);
    hybrid_rle::encode(buffer, &indices, bit_width)?;
    Ok(bit_width)
}
