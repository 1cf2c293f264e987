use std::io::{Cursor, Write};

use parquet_core::error::Result;
use parquet_core::indexes::{read_column_indexes, read_offset_indexes};
use parquet_core::read::{
    read_metadata, ColumnValues, FileReader, FilterOp, Projection, ReadOptions,
};
use parquet_core::statistics::Scalar;
use parquet_core::write::WriteOptions;

use super::{schema_of, write_file, Array};

fn options_plain() -> WriteOptions {
    WriteOptions {
        dictionary: None,
        ..Default::default()
    }
}

fn write_temp_file(data: &[u8]) -> std::fs::File {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(data).unwrap();
    file
}

/// Three row groups whose `id` columns span [0, 99], [100, 199], [200, 299].
fn three_group_file() -> Result<Vec<u8>> {
    let groups = (0..3)
        .map(|group| {
            vec![
                (
                    "id",
                    Array::Int32((0..100).map(|i| Some(group * 100 + i)).collect()),
                ),
                (
                    "name",
                    Array::Binary(
                        (0..100)
                            .map(|i| Some(format!("row-{}", group * 100 + i).into_bytes()))
                            .collect(),
                    ),
                ),
            ]
        })
        .collect::<Vec<_>>();
    let schema = schema_of(&groups[0]);
    write_file(&options_plain(), schema, &groups)
}

#[test]
fn filter_row_groups_by_statistics() -> Result<()> {
    let data = three_group_file()?;
    let metadata = read_metadata(&mut Cursor::new(&data))?;

    use parquet_core::read::filter_row_groups;

    // GT keeps exactly the groups with max > value
    let selected = filter_row_groups(&metadata, 0, FilterOp::Gt, &Scalar::Int32(199))?;
    assert_eq!(selected, vec![2]);
    let selected = filter_row_groups(&metadata, 0, FilterOp::Gt, &Scalar::Int32(99))?;
    assert_eq!(selected, vec![1, 2]);

    let selected = filter_row_groups(&metadata, 0, FilterOp::Lt, &Scalar::Int32(100))?;
    assert_eq!(selected, vec![0]);
    let selected = filter_row_groups(&metadata, 0, FilterOp::Le, &Scalar::Int32(100))?;
    assert_eq!(selected, vec![0, 1]);
    let selected = filter_row_groups(&metadata, 0, FilterOp::Ge, &Scalar::Int32(200))?;
    assert_eq!(selected, vec![2]);

    let selected = filter_row_groups(&metadata, 0, FilterOp::Eq, &Scalar::Int32(150))?;
    assert_eq!(selected, vec![1]);
    let selected = filter_row_groups(&metadata, 0, FilterOp::Eq, &Scalar::Int32(1000))?;
    assert!(selected.is_empty());

    // NE can only drop constant chunks; these are not constant
    let selected = filter_row_groups(&metadata, 0, FilterOp::Ne, &Scalar::Int32(150))?;
    assert_eq!(selected, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn batch_reader_streams_row_groups() -> Result<()> {
    let data = three_group_file()?;
    let file = write_temp_file(&data);

    let mut reader = FileReader::try_new(
        file,
        ReadOptions {
            batch_size: 64,
            ..Default::default()
        },
    )?;
    assert_eq!(reader.num_rows(), 300);
    assert_eq!(reader.num_row_groups(), 3);
    assert_eq!(reader.num_columns(), 2);
    assert!(!reader.is_mmap());

    let mut total = 0;
    let mut first_of_batches = vec![];
    while let Some(batch) = reader.next_batch()? {
        assert_eq!(batch.columns.len(), 2);
        assert!(batch.num_rows <= 64);
        if let ColumnValues::Int32(values) = &batch.columns[0].values {
            first_of_batches.push(values[0]);
            total += values.len();
        } else {
            panic!("expected an int32 column");
        }
    }
    assert_eq!(total, 300);
    // batches do not span row groups: 100 = 64 + 36 per group
    assert_eq!(first_of_batches, vec![0, 64, 100, 164, 200, 264]);
    Ok(())
}

#[test]
fn batch_reader_projects_by_name() -> Result<()> {
    let data = three_group_file()?;
    let file = write_temp_file(&data);

    let mut reader = FileReader::try_new(
        file,
        ReadOptions {
            projection: Projection::Names(vec!["name".to_string()]),
            batch_size: 1000,
            ..Default::default()
        },
    )?;
    let batch = reader.next_batch()?.unwrap();
    assert_eq!(batch.columns.len(), 1);
    assert_eq!(batch.columns[0].name, "name");
    match &batch.columns[0].values {
        ColumnValues::Binary(values) => {
            assert_eq!(values[7], b"row-7".to_vec());
        }
        _ => panic!("expected a binary column"),
    }
    Ok(())
}

#[test]
fn batch_reader_reports_statistics() -> Result<()> {
    let data = three_group_file()?;
    let file = write_temp_file(&data);

    let reader = FileReader::try_new(file, ReadOptions::default())?;
    let statistics = reader.column_statistics(1, 0)?.unwrap();
    let statistics = statistics
        .as_any()
        .downcast_ref::<parquet_core::statistics::PrimitiveStatistics<i32>>()
        .unwrap();
    assert_eq!(statistics.min_value, Some(100));
    assert_eq!(statistics.max_value, Some(199));

    let selected = reader.filter_row_groups(0, FilterOp::Ge, &Scalar::Int32(250))?;
    assert_eq!(selected, vec![2]);
    Ok(())
}

#[test]
fn mmap_zero_copy_required_column() -> Result<()> {
    use parquet_core::metadata::SchemaDescriptor;
    use parquet_core::schema::types::{ParquetType, PhysicalType};
    use parquet_core::schema::Repetition;
    use parquet_core::write::{ColumnWriter, DynIter, FileWriter};

    // a REQUIRED uncompressed INT64 column is zero-copy eligible
    let schema = SchemaDescriptor::new(
        "schema".to_string(),
        vec![ParquetType::try_from_primitive(
            "ticks".to_string(),
            PhysicalType::Int64,
            Repetition::Required,
            None,
            None,
            None,
        )?],
    );
    let expected = (0..1000i64).map(|i| i * 3).collect::<Vec<_>>();

    let options = options_plain();
    let mut writer = FileWriter::new(Cursor::new(vec![]), schema, options.clone(), None);
    writer.start()?;
    let descriptor = writer.schema().column(0).clone();
    let mut column = ColumnWriter::<i64>::try_new(&descriptor, &options)?;
    column.push(&expected, None, None)?;
    let pages = column.finish()?;
    writer.write(
        DynIter::new(std::iter::once(Ok(DynIter::new(pages.into_iter().map(Ok))))),
        expected.len(),
    )?;
    let (_, cursor) = writer.end(None)?;

    let file = write_temp_file(&cursor.into_inner());
    let mut reader = FileReader::try_new(
        file,
        ReadOptions {
            use_mmap: true,
            ..Default::default()
        },
    )?;
    assert!(reader.is_mmap());
    assert!(reader.can_zero_copy(0, 0)?);

    // the spans alias the mapping and decode to the written values
    let mut read = vec![];
    for span in reader.zero_copy_pages(0, 0)? {
        let (num_values, bytes) = span?;
        assert_eq!(bytes.len(), num_values * 8);
        read.extend(
            bytes
                .chunks_exact(8)
                .map(|chunk| i64::from_le_bytes(chunk.try_into().unwrap())),
        );
    }
    assert_eq!(read, expected);

    // the batch path returns the same values
    let batch = reader.next_batch()?.unwrap();
    match &batch.columns[0].values {
        ColumnValues::Int64(values) => assert_eq!(values[..10], expected[..10]),
        _ => panic!("expected an int64 column"),
    }
    assert!(batch.columns[0].validity.is_none());
    Ok(())
}

#[test]
fn optional_columns_are_not_zero_copy() -> Result<()> {
    let data = three_group_file()?;
    let file = write_temp_file(&data);
    let reader = FileReader::try_new(
        file,
        ReadOptions {
            use_mmap: true,
            ..Default::default()
        },
    )?;
    assert!(reader.is_mmap());
    // optional int32: nullable; binary: not fixed width
    assert!(!reader.can_zero_copy(0, 0)?);
    assert!(!reader.can_zero_copy(0, 1)?);
    Ok(())
}

#[test]
fn page_index_prunes_pages() -> Result<()> {
    // small pages so that one chunk holds several
    let options = WriteOptions {
        write_page_index: true,
        page_size: 512,
        dictionary: None,
        ..Default::default()
    };
    let columns = vec![(
        "id",
        Array::Int32((0..1000).map(Some).collect()),
    )];
    let schema = schema_of(&columns);
    let data = write_file(&options, schema, &[columns])?;

    let metadata = read_metadata(&mut Cursor::new(&data))?;
    let chunks = metadata.row_groups[0].columns();

    let column_indexes = read_column_indexes(&mut Cursor::new(&data), chunks)?;
    let offset_indexes = read_offset_indexes(&mut Cursor::new(&data), chunks)?;

    let column_index = column_indexes[0].as_ref().unwrap();
    let locations = offset_indexes[0].as_ref().unwrap();
    assert!(column_index.pages.len() > 1);
    assert_eq!(column_index.pages.len(), locations.len());

    // first_row_index is cumulative
    assert_eq!(locations[0].first_row_index, 0);
    let rows_of_first = locations[1].first_row_index;
    assert!(rows_of_first > 0);

    // a range provably beyond the first page prunes it
    let min = Scalar::Int32(rows_of_first as i32);
    let selected = column_index.pages_might_match(Some(&min), None)?;
    assert!(!selected.contains(&0));
    assert_eq!(*selected.last().unwrap(), column_index.pages.len() - 1);

    // boundary order of an ascending column
    assert_eq!(
        column_index.boundary_order,
        parquet_core::indexes::BoundaryOrder::Ascending
    );
    Ok(())
}
