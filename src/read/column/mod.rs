use std::io::Read;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::metadata::ColumnChunkMetaData;
use crate::page::{read_dict_page, DataPage, DictPage};
use crate::read::compression::{decompress_page, Page};
use crate::read::deserialize;
use crate::read::page::{PageReader, ReaderOptions};
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

/// A cursor over the page sequence of one column chunk.
///
/// It materializes the chunk's dictionary at its dictionary page and
/// yields decompressed [`DataPage`]s. A second dictionary page within one
/// chunk is out of spec.
pub struct ColumnChunkReader<R: Read> {
    pages: PageReader<R>,
    dict: Option<Arc<dyn DictPage>>,
    scratch: Vec<u8>,
    physical_type: PhysicalType,
}

impl<R: Read> ColumnChunkReader<R> {
    /// Returns a new [`ColumnChunkReader`]. `reader` must be positioned
    /// at the chunk's first byte.
    pub fn new(reader: R, column: &ColumnChunkMetaData, options: ReaderOptions) -> Result<Self> {
        Ok(Self {
            pages: PageReader::new(reader, column, options)?,
            dict: None,
            scratch: vec![],
            physical_type: column.physical_type(),
        })
    }

    /// The chunk's dictionary, materialized once its dictionary page was
    /// read.
    pub fn dictionary(&self) -> Option<&Arc<dyn DictPage>> {
        self.dict.as_ref()
    }

    /// Advances to the next data page.
    pub fn next_data_page(&mut self) -> Result<Option<DataPage>> {
        loop {
            let compressed = match self.pages.next().transpose()? {
                Some(page) => page,
                None => return Ok(None),
            };
            match decompress_page(compressed, &mut self.scratch)? {
                Page::Data(page) => return Ok(Some(page)),
                Page::Dict(dict) => {
                    if self.dict.is_some() {
                        return Err(Error::InvalidPage(
                            "a column chunk cannot have more than one dictionary page".into(),
                        ));
                    }
                    self.dict = Some(read_dict_page(&dict, self.physical_type)?);
                }
            }
        }
    }
}

/// A value type a column reader can materialize, with its page decoding
/// dispatch. The closed set of implementations mirrors the physical
/// types.
pub trait ColumnValue: Sized + Clone + std::fmt::Debug {
    /// Decodes `page` into the sparse layout, checking the page's
    /// physical type.
    fn decode_page(
        page: &DataPage,
        dict: Option<&dyn DictPage>,
        values: &mut Vec<Self>,
        def_levels: &mut Vec<i16>,
        rep_levels: &mut Vec<i16>,
    ) -> Result<()>;

    /// The filler written into dense outputs at null positions.
    fn null_value() -> Self;
}

macro_rules! native_column_value {
    ($type:ty) => {
        impl ColumnValue for $type {
            fn decode_page(
                page: &DataPage,
                dict: Option<&dyn DictPage>,
                values: &mut Vec<Self>,
                def_levels: &mut Vec<i16>,
                rep_levels: &mut Vec<i16>,
            ) -> Result<()> {
                if page.descriptor().physical_type() != <$type as NativeType>::TYPE {
                    return Err(Error::TypeMismatch(format!(
                        "a column of {:?} cannot be read as {:?}",
                        page.descriptor().physical_type(),
                        <$type as NativeType>::TYPE
                    )));
                }
                deserialize::decode_native_page(page, dict, values, def_levels, rep_levels)
            }

            fn null_value() -> Self {
                <$type>::default()
            }
        }
    };
}

native_column_value!(i32);
native_column_value!(i64);
native_column_value!(f32);
native_column_value!(f64);
native_column_value!(crate::types::Int96);

impl ColumnValue for bool {
    fn decode_page(
        page: &DataPage,
        _dict: Option<&dyn DictPage>,
        values: &mut Vec<Self>,
        def_levels: &mut Vec<i16>,
        rep_levels: &mut Vec<i16>,
    ) -> Result<()> {
        if page.descriptor().physical_type() != PhysicalType::Boolean {
            return Err(Error::TypeMismatch(format!(
                "a column of {:?} cannot be read as BOOLEAN",
                page.descriptor().physical_type()
            )));
        }
        deserialize::decode_boolean_page(page, values, def_levels, rep_levels)
    }

    fn null_value() -> Self {
        false
    }
}

impl ColumnValue for Vec<u8> {
    fn decode_page(
        page: &DataPage,
        dict: Option<&dyn DictPage>,
        values: &mut Vec<Self>,
        def_levels: &mut Vec<i16>,
        rep_levels: &mut Vec<i16>,
    ) -> Result<()> {
        match page.descriptor().physical_type() {
            PhysicalType::ByteArray => {
                deserialize::decode_binary_page(page, dict, values, def_levels, rep_levels)
            }
            PhysicalType::FixedLenByteArray(size) => {
                deserialize::decode_fixed_len_page(page, dict, size, values, def_levels, rep_levels)
            }
            other => Err(Error::TypeMismatch(format!(
                "a column of {:?} cannot be read as bytes",
                other
            ))),
        }
    }

    fn null_value() -> Self {
        vec![]
    }
}

/// A typed reader over one column chunk, yielding logical values in
/// batches of caller-requested size.
///
/// A batch is smaller than requested only at the end of the chunk.
pub struct TypedColumnReader<T: ColumnValue, R: Read> {
    chunk: ColumnChunkReader<R>,
    max_def_level: i16,
    // decoded but not yet drained page content, in the sparse layout
    values: Vec<T>,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
    // logical rows and present values already drained from the buffers
    rows_consumed: usize,
    values_consumed: usize,
}

impl<T: ColumnValue, R: Read> TypedColumnReader<T, R> {
    pub fn new(reader: R, column: &ColumnChunkMetaData, options: ReaderOptions) -> Result<Self> {
        let max_def_level = column.descriptor().max_def_level();
        Ok(Self {
            chunk: ColumnChunkReader::new(reader, column, options)?,
            max_def_level,
            values: vec![],
            def_levels: vec![],
            rep_levels: vec![],
            rows_consumed: 0,
            values_consumed: 0,
        })
    }

    fn buffered_rows(&self) -> usize {
        self.def_levels.len() - self.rows_consumed
    }

    /// Loads the next page into the internal buffers. Returns false at
    /// chunk end.
    fn advance(&mut self) -> Result<bool> {
        let page = match self.chunk.next_data_page()? {
            Some(page) => page,
            None => return Ok(false),
        };
        let dict = self.chunk.dict.clone();
        T::decode_page(
            &page,
            dict.as_deref(),
            &mut self.values,
            &mut self.def_levels,
            &mut self.rep_levels,
        )?;
        self.rows_consumed = 0;
        self.values_consumed = 0;
        Ok(true)
    }

    /// Reads up to `max_rows` logical rows in the sparse layout:
    /// `def_levels`/`rep_levels` get one entry per row, `values` only the
    /// present values. Returns the number of logical rows read; zero
    /// denotes the end of the chunk.
    pub fn read_batch(
        &mut self,
        max_rows: usize,
        values: &mut Vec<T>,
        def_levels: &mut Vec<i16>,
        rep_levels: &mut Vec<i16>,
    ) -> Result<usize> {
        let mut rows_read = 0;
        while rows_read < max_rows {
            if self.buffered_rows() == 0 {
                if !self.advance()? {
                    break;
                }
                if self.buffered_rows() == 0 {
                    // an empty data page; keep walking
                    continue;
                }
            }
            let take = std::cmp::min(max_rows - rows_read, self.buffered_rows());
            let row_start = self.rows_consumed;
            for &def in &self.def_levels[row_start..row_start + take] {
                def_levels.push(def);
                if def == self.max_def_level {
                    values.push(self.values[self.values_consumed].clone());
                    self.values_consumed += 1;
                }
            }
            if !self.rep_levels.is_empty() {
                rep_levels.extend_from_slice(&self.rep_levels[row_start..row_start + take]);
            }
            self.rows_consumed += take;
            rows_read += take;
        }
        Ok(rows_read)
    }

    /// Reads up to `max_rows` logical rows in the dense layout: one value
    /// per row (nulls filled with a default) and one validity flag per
    /// row.
    pub fn read_batch_dense(
        &mut self,
        max_rows: usize,
        values: &mut Vec<T>,
        validity: &mut Vec<bool>,
    ) -> Result<usize> {
        let mut sparse = vec![];
        let mut def_levels = vec![];
        let mut rep_levels = vec![];
        let rows = self.read_batch(max_rows, &mut sparse, &mut def_levels, &mut rep_levels)?;

        let mut taken = 0;
        for def in def_levels {
            if def == self.max_def_level {
                values.push(sparse[taken].clone());
                validity.push(true);
                taken += 1;
            } else {
                values.push(T::null_value());
                validity.push(false);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_values() {
        assert_eq!(<Vec<u8> as ColumnValue>::null_value(), Vec::<u8>::new());
        assert!(!bool::null_value());
        assert_eq!(i32::null_value(), 0);
    }
}
