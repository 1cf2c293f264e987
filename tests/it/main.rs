mod read;
mod write;

use parquet_core::error::Result;
use parquet_core::metadata::SchemaDescriptor;
use parquet_core::page::CompressedPage;
use parquet_core::schema::types::{ParquetType, PhysicalType};
use parquet_core::schema::Repetition;
use parquet_core::types::Int96;
use parquet_core::write::{ColumnWriter, DynIter, FileWriter, WriteOptions, WriteValue};

use std::io::Cursor;

/// A column of optional values, as tests declare them.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Boolean(Vec<Option<bool>>),
    Int32(Vec<Option<i32>>),
    Int64(Vec<Option<i64>>),
    Int96(Vec<Option<Int96>>),
    Float(Vec<Option<f32>>),
    Double(Vec<Option<f64>>),
    Binary(Vec<Option<Vec<u8>>>),
    FixedLenBinary(Vec<Option<Vec<u8>>>, usize),
}

impl Array {
    pub fn len(&self) -> usize {
        match self {
            Array::Boolean(values) => values.len(),
            Array::Int32(values) => values.len(),
            Array::Int64(values) => values.len(),
            Array::Int96(values) => values.len(),
            Array::Float(values) => values.len(),
            Array::Double(values) => values.len(),
            Array::Binary(values) => values.len(),
            Array::FixedLenBinary(values, _) => values.len(),
        }
    }

    pub fn physical_type(&self) -> PhysicalType {
        match self {
            Array::Boolean(_) => PhysicalType::Boolean,
            Array::Int32(_) => PhysicalType::Int32,
            Array::Int64(_) => PhysicalType::Int64,
            Array::Int96(_) => PhysicalType::Int96,
            Array::Float(_) => PhysicalType::Float,
            Array::Double(_) => PhysicalType::Double,
            Array::Binary(_) => PhysicalType::ByteArray,
            Array::FixedLenBinary(_, size) => PhysicalType::FixedLenByteArray(*size),
        }
    }
}

/// Splits optional values into the sparse layout.
pub fn to_sparse<T: Clone>(values: &[Option<T>]) -> (Vec<T>, Vec<i16>) {
    let def_levels = values
        .iter()
        .map(|value| value.is_some() as i16)
        .collect::<Vec<_>>();
    let sparse = values
        .iter()
        .filter_map(|value| value.clone())
        .collect::<Vec<_>>();
    (sparse, def_levels)
}

/// Builds a flat schema with one OPTIONAL column per array.
pub fn schema_of(arrays: &[(&str, Array)]) -> SchemaDescriptor {
    let fields = arrays
        .iter()
        .map(|(name, array)| {
            ParquetType::try_from_primitive(
                name.to_string(),
                array.physical_type(),
                Repetition::Optional,
                None,
                None,
                None,
            )
            .unwrap()
        })
        .collect();
    SchemaDescriptor::new("schema".to_string(), fields)
}

fn array_pages(
    array: &Array,
    descriptor: &parquet_core::metadata::ColumnDescriptor,
    options: &WriteOptions,
) -> Result<Vec<CompressedPage>> {
    fn push<T: WriteValue>(
        values: &[Option<T>],
        descriptor: &parquet_core::metadata::ColumnDescriptor,
        options: &WriteOptions,
    ) -> Result<Vec<CompressedPage>> {
        let (sparse, def_levels) = to_sparse(values);
        let mut writer = ColumnWriter::<T>::try_new(descriptor, options)?;
        writer.push(&sparse, Some(&def_levels), None)?;
        writer.finish()
    }

    match array {
        Array::Boolean(values) => push(values, descriptor, options),
        Array::Int32(values) => push(values, descriptor, options),
        Array::Int64(values) => push(values, descriptor, options),
        Array::Int96(values) => push(values, descriptor, options),
        Array::Float(values) => push(values, descriptor, options),
        Array::Double(values) => push(values, descriptor, options),
        Array::Binary(values) => push(values, descriptor, options),
        Array::FixedLenBinary(values, _) => push(values, descriptor, options),
    }
}

/// Writes one file with the given row groups of named columns.
pub fn write_file(
    options: &WriteOptions,
    schema: SchemaDescriptor,
    row_groups: &[Vec<(&str, Array)>],
) -> Result<Vec<u8>> {
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options.clone(), None);
    writer.start()?;

    for columns in row_groups {
        let num_rows = columns.first().map(|(_, array)| array.len()).unwrap_or(0);
        let mut pages = vec![];
        for (index, (_, array)) in columns.iter().enumerate() {
            let descriptor = writer.schema().column(index).clone();
            pages.push(array_pages(array, &descriptor, options)?);
        }
        let row_group = DynIter::new(
            pages
                .into_iter()
                .map(|pages| Ok(DynIter::new(pages.into_iter().map(Ok)))),
        );
        writer.write(row_group, num_rows)?;
    }

    let (_, writer) = writer.end(None)?;
    Ok(writer.into_inner())
}
