use std::io::Cursor;

use parquet_core::compression::Compression;
use parquet_core::error::{Error, Result};
use parquet_core::read::{
    read_column_chunk, read_metadata, ColumnChunkReader, ReaderOptions, TypedColumnReader,
};
use parquet_core::schema::types::PhysicalType;
use parquet_core::statistics::{deserialize_statistics, BinaryStatistics, PrimitiveStatistics};
use parquet_core::write::{DictionaryMode, Version, WriteOptions};

use super::{schema_of, to_sparse, write_file, Array};

fn plain_options() -> WriteOptions {
    WriteOptions {
        dictionary: None,
        ..Default::default()
    }
}

#[test]
fn all_present_optional_column() -> Result<()> {
    let values = (0..10).map(|i| Some(i)).collect::<Vec<_>>();
    let columns = vec![("col", Array::Int32(values))];
    let schema = schema_of(&columns);
    let data = write_file(&plain_options(), schema, &[columns.clone()])?;

    let metadata = read_metadata(&mut Cursor::new(&data))?;
    let chunk_meta = &metadata.row_groups[0].columns()[0];
    let chunk = read_column_chunk(&mut Cursor::new(&data), chunk_meta)?;

    let mut reader =
        TypedColumnReader::<i32, _>::new(Cursor::new(chunk), chunk_meta, ReaderOptions::default())?;
    let mut values = vec![];
    let mut def_levels = vec![];
    let mut rep_levels = vec![];
    let rows = reader.read_batch(100, &mut values, &mut def_levels, &mut rep_levels)?;

    assert_eq!(rows, 10);
    assert_eq!(def_levels, vec![1; 10]);
    assert_eq!(values, (0..10).collect::<Vec<_>>());
    assert!(rep_levels.is_empty());
    Ok(())
}

#[test]
fn sparse_values_read_back_with_nulls() -> Result<()> {
    let logical = vec![Some(10), None, Some(20), None, Some(30)];
    let columns = vec![("col", Array::Int32(logical.clone()))];
    let schema = schema_of(&columns);
    let data = write_file(&plain_options(), schema, &[columns])?;

    let metadata = read_metadata(&mut Cursor::new(&data))?;
    let chunk_meta = &metadata.row_groups[0].columns()[0];
    let chunk = read_column_chunk(&mut Cursor::new(&data), chunk_meta)?;

    // the sparse layout: packed values + def levels
    let mut reader = TypedColumnReader::<i32, _>::new(
        Cursor::new(&chunk),
        chunk_meta,
        ReaderOptions::default(),
    )?;
    let mut values = vec![];
    let mut def_levels = vec![];
    let mut rep_levels = vec![];
    reader.read_batch(100, &mut values, &mut def_levels, &mut rep_levels)?;
    assert_eq!(values, vec![10, 20, 30]);
    assert_eq!(def_levels, vec![1, 0, 1, 0, 1]);

    // the dense layout materializes the logical sequence
    let mut reader = TypedColumnReader::<i32, _>::new(
        Cursor::new(&chunk),
        chunk_meta,
        ReaderOptions::default(),
    )?;
    let mut dense = vec![];
    let mut validity = vec![];
    reader.read_batch_dense(100, &mut dense, &mut validity)?;
    let read = dense
        .into_iter()
        .zip(validity)
        .map(|(value, valid)| valid.then_some(value))
        .collect::<Vec<_>>();
    assert_eq!(read, logical);
    Ok(())
}

fn mask<T: Clone>(values: Vec<T>, period: usize) -> Vec<Option<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| ((i + 1) % period != 0).then_some(value))
        .collect()
}

fn mixed_columns(num_rows: usize) -> Vec<(&'static str, Array)> {
    vec![
        (
            "int32",
            Array::Int32(mask((0..num_rows as i32).collect(), 3)),
        ),
        (
            "int64",
            Array::Int64(mask((0..num_rows as i64).map(|i| i * 100).collect(), 5)),
        ),
        (
            "int96",
            Array::Int96(mask(
                (0..num_rows as u32).map(|i| [i, i + 1, i + 2]).collect(),
                7,
            )),
        ),
        (
            "float",
            Array::Float(mask((0..num_rows).map(|i| i as f32 / 3.0).collect(), 3)),
        ),
        (
            "double",
            Array::Double(mask((0..num_rows).map(|i| i as f64 * 0.5).collect(), 5)),
        ),
        (
            "bool",
            Array::Boolean(mask((0..num_rows).map(|i| i % 2 == 0).collect(), 7)),
        ),
        (
            "binary",
            Array::Binary(mask(
                (0..num_rows)
                    .map(|i| format!("value-{}", i).into_bytes())
                    .collect(),
                3,
            )),
        ),
    ]
}

fn check_round_trip(data: &[u8], expected: &[(&str, Array)]) -> Result<()> {
    let metadata = read_metadata(&mut Cursor::new(&data))?;
    assert_eq!(metadata.num_rows, expected[0].1.len());

    for (index, (_, array)) in expected.iter().enumerate() {
        let chunk_meta = &metadata.row_groups[0].columns()[index];
        let chunk = read_column_chunk(&mut Cursor::new(&data), chunk_meta)?;

        macro_rules! check {
            ($t:ty, $expected:expr) => {{
                let (sparse, def_levels) = to_sparse($expected);
                let mut reader = TypedColumnReader::<$t, _>::new(
                    Cursor::new(&chunk),
                    chunk_meta,
                    ReaderOptions::default(),
                )?;
                let mut values = vec![];
                let mut read_defs = vec![];
                let mut read_reps = vec![];
                let rows = reader.read_batch(
                    $expected.len() + 10,
                    &mut values,
                    &mut read_defs,
                    &mut read_reps,
                )?;
                assert_eq!(rows, $expected.len());
                assert_eq!(read_defs, def_levels);
                assert!(values == sparse);

                // reported null count agrees with the mask
                let nulls = $expected.iter().filter(|value| value.is_none()).count();
                let statistics = chunk_meta.statistics().unwrap();
                assert_eq!(statistics.null_count, Some(nulls as i64));
            }};
        }

        match array {
            Array::Boolean(values) => check!(bool, values),
            Array::Int32(values) => check!(i32, values),
            Array::Int64(values) => check!(i64, values),
            Array::Int96(values) => check!(parquet_core::types::Int96, values),
            Array::Float(values) => check!(f32, values),
            Array::Double(values) => check!(f64, values),
            Array::Binary(values) => check!(Vec<u8>, values),
            Array::FixedLenBinary(values, _) => check!(Vec<u8>, values),
        }
    }
    Ok(())
}

#[test]
fn mixed_types_with_null_masks() -> Result<()> {
    let columns = mixed_columns(90);
    let schema = schema_of(&columns);
    let data = write_file(&plain_options(), schema, &[columns.clone()])?;
    check_round_trip(&data, &columns)
}

#[test]
fn mixed_types_with_dictionary() -> Result<()> {
    let columns = mixed_columns(90);
    let schema = schema_of(&columns);
    let options = WriteOptions {
        dictionary: Some(DictionaryMode::RleDictionary),
        ..Default::default()
    };
    let data = write_file(&options, schema, &[columns.clone()])?;
    check_round_trip(&data, &columns)
}

#[test]
fn mixed_types_v2_pages() -> Result<()> {
    let columns = mixed_columns(90);
    let schema = schema_of(&columns);
    let options = WriteOptions {
        version: Version::V2,
        dictionary: None,
        ..Default::default()
    };
    let data = write_file(&options, schema, &[columns.clone()])?;
    check_round_trip(&data, &columns)
}

fn codec_round_trip(compression: Compression) -> Result<()> {
    let columns = mixed_columns(5000);
    let schema = schema_of(&columns);
    let options = WriteOptions {
        compression,
        dictionary: None,
        ..Default::default()
    };
    let data = write_file(&options, schema, &[columns.clone()])?;
    check_round_trip(&data, &columns)
}

#[test]
fn codec_uncompressed() -> Result<()> {
    codec_round_trip(Compression::Uncompressed)
}

#[test]
fn codec_snappy() -> Result<()> {
    codec_round_trip(Compression::Snappy)
}

#[test]
fn codec_gzip() -> Result<()> {
    codec_round_trip(Compression::Gzip)
}

#[test]
fn codec_lz4() -> Result<()> {
    codec_round_trip(Compression::Lz4)
}

#[test]
fn codec_zstd() -> Result<()> {
    codec_round_trip(Compression::Zstd)
}

#[test]
fn dictionary_of_repeated_values() -> Result<()> {
    let values = [1, 2, 1, 2, 1, 2, 3, 3, 3, 1]
        .iter()
        .map(|&value| Some(value))
        .collect::<Vec<_>>();
    let columns = vec![("col", Array::Int32(values))];
    let schema = schema_of(&columns);
    let options = WriteOptions {
        dictionary: Some(DictionaryMode::RleDictionary),
        ..Default::default()
    };
    let data = write_file(&options, schema, &[columns])?;

    let metadata = read_metadata(&mut Cursor::new(&data))?;
    let chunk_meta = &metadata.row_groups[0].columns()[0];
    assert!(chunk_meta.dictionary_page_offset().is_some());

    let chunk = read_column_chunk(&mut Cursor::new(&data), chunk_meta)?;

    let mut reader = ColumnChunkReader::new(
        Cursor::new(&chunk),
        chunk_meta,
        ReaderOptions::default(),
    )?;
    let page = reader.next_data_page()?.unwrap();
    // the def-level block (4-byte prefix + one RLE run) is followed by the
    // index stream, whose first byte is its bit width: 3 entries need 2
    assert_eq!(page.buffer()[6], 2);

    // the dictionary holds the distinct values in first-occurrence order
    let dict = reader.dictionary().unwrap();
    let dict = dict
        .as_any()
        .downcast_ref::<parquet_core::page::PrimitivePageDict<i32>>()
        .unwrap();
    assert_eq!(dict.values(), &[1, 2, 3]);
    Ok(())
}

#[test]
fn statistics_survive_the_round_trip() -> Result<()> {
    let columns = vec![
        (
            "ints",
            Array::Int64(vec![Some(5), None, Some(-3), Some(10), None]),
        ),
        (
            "strings",
            Array::Binary(vec![
                Some(b"pear".to_vec()),
                Some(b"apple".to_vec()),
                None,
                Some(b"orange".to_vec()),
                Some(b"banana".to_vec()),
            ]),
        ),
    ];
    let schema = schema_of(&columns);
    let data = write_file(&plain_options(), schema, &[columns])?;

    let metadata = read_metadata(&mut Cursor::new(&data))?;

    let ints = metadata.row_groups[0].columns()[0].statistics().unwrap();
    let ints = deserialize_statistics(ints, PhysicalType::Int64)?;
    let ints = ints
        .as_any()
        .downcast_ref::<PrimitiveStatistics<i64>>()
        .unwrap();
    assert_eq!(ints.min_value, Some(-3));
    assert_eq!(ints.max_value, Some(10));
    assert_eq!(ints.null_count, Some(2));

    let strings = metadata.row_groups[0].columns()[1].statistics().unwrap();
    let strings = deserialize_statistics(strings, PhysicalType::ByteArray)?;
    let strings = strings
        .as_any()
        .downcast_ref::<BinaryStatistics>()
        .unwrap();
    assert_eq!(strings.min_value.as_deref(), Some(b"apple".as_slice()));
    assert_eq!(strings.max_value.as_deref(), Some(b"pear".as_slice()));
    assert_eq!(strings.null_count, Some(1));
    Ok(())
}

#[test]
fn fixed_len_binary_round_trip() -> Result<()> {
    let values = (0..50u32)
        .map(|i| Some(i.to_be_bytes().to_vec()))
        .collect::<Vec<_>>();
    let columns = vec![("uuid_like", Array::FixedLenBinary(mask_options(values), 4))];
    let schema = schema_of(&columns);
    let data = write_file(&plain_options(), schema, &[columns.clone()])?;
    check_round_trip(&data, &columns)
}

fn mask_options<T>(values: Vec<Option<T>>) -> Vec<Option<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| if i % 9 == 0 { None } else { value })
        .collect()
}

#[test]
fn crc_detects_corruption() -> Result<()> {
    let columns = vec![("col", Array::Int32((0..100).map(Some).collect()))];
    let schema = schema_of(&columns);
    let mut data = write_file(&plain_options(), schema, &[columns])?;

    let metadata = read_metadata(&mut Cursor::new(&data))?;
    let chunk_meta = metadata.row_groups[0].columns()[0].clone();
    let (start, _) = chunk_meta.byte_range();

    let (_, length) = chunk_meta.byte_range();
    // flip a byte near the end of the chunk: inside the values block
    let position = (start + length) as usize - 5;
    data[position] ^= 0xFF;

    let chunk = read_column_chunk(&mut Cursor::new(&data), &chunk_meta)?;
    let mut reader = TypedColumnReader::<i32, _>::new(
        Cursor::new(&chunk),
        &chunk_meta,
        ReaderOptions::default(),
    )?;
    let mut values = vec![];
    let mut def_levels = vec![];
    let mut rep_levels = vec![];
    let result = reader.read_batch(200, &mut values, &mut def_levels, &mut rep_levels);
    assert!(matches!(result, Err(Error::Checksum { .. })));
    Ok(())
}

#[test]
fn footer_length_is_bounded() {
    // a file whose stated footer length exceeds file_size - 8
    let mut data = b"PAR1".to_vec();
    data.extend_from_slice(&[0u8; 16]);
    data.extend_from_slice(&(1_000_000u32).to_le_bytes());
    data.extend_from_slice(b"PAR1");

    let result = read_metadata(&mut Cursor::new(&data));
    assert!(matches!(result, Err(Error::InvalidFooter(_))));
}
