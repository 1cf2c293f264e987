use crate::error::Result;
use crate::format::{BoundaryOrder, ColumnIndex, OffsetIndex, PageLocation, PageType};
use crate::schema::types::PhysicalType;
use crate::statistics::{compare, Scalar};
use crate::write::column_chunk::{data_page_num_values, data_page_statistics};
use crate::write::page::PageWriteSpec;

/// Builds the thrift [`ColumnIndex`] of one chunk from its page specs.
/// Returns `None` when any data page was written without statistics, in
/// which case no index is emitted for the chunk.
pub fn serialize_column_index(
    specs: &[PageWriteSpec],
    physical_type: PhysicalType,
) -> Result<Option<ColumnIndex>> {
    let mut null_pages = vec![];
    let mut min_values = vec![];
    let mut max_values = vec![];
    let mut null_counts = vec![];

    for spec in specs
        .iter()
        .filter(|spec| spec.header.type_ != PageType::DICTIONARY_PAGE)
    {
        let statistics = match data_page_statistics(spec) {
            Some(statistics) => statistics,
            None => return Ok(None),
        };
        let null_count = statistics.null_count.unwrap_or(0);
        match (&statistics.min_value, &statistics.max_value) {
            (Some(min), Some(max)) => {
                null_pages.push(false);
                min_values.push(min.clone());
                max_values.push(max.clone());
            }
            _ => {
                // a page without bounds is published as a null page
                null_pages.push(true);
                min_values.push(vec![]);
                max_values.push(vec![]);
            }
        }
        null_counts.push(null_count);
    }

    let boundary_order = compute_boundary_order(&null_pages, &min_values, &max_values, physical_type)?;

    Ok(Some(ColumnIndex {
        null_pages,
        min_values,
        max_values,
        boundary_order,
        null_counts: Some(null_counts),
    }))
}

/// Builds the thrift [`OffsetIndex`] of one chunk from its page specs.
/// `first_row_index` accumulates the logical rows of the preceding data
/// pages.
pub fn serialize_offset_index(specs: &[PageWriteSpec]) -> Result<OffsetIndex> {
    let mut page_locations = vec![];
    let mut first_row_index = 0i64;
    for spec in specs
        .iter()
        .filter(|spec| spec.header.type_ != PageType::DICTIONARY_PAGE)
    {
        page_locations.push(PageLocation {
            offset: spec.offset as i64,
            compressed_page_size: spec.header.compressed_page_size
                + spec.header_size as i32,
            first_row_index,
        });
        first_row_index += data_page_num_values(spec)? as i64;
    }
    Ok(OffsetIndex { page_locations })
}

fn compute_boundary_order(
    null_pages: &[bool],
    min_values: &[Vec<u8>],
    max_values: &[Vec<u8>],
    physical_type: PhysicalType,
) -> Result<BoundaryOrder> {
    let bounds = null_pages
        .iter()
        .zip(min_values.iter().zip(max_values.iter()))
        .filter(|(is_null, _)| !**is_null)
        .map(|(_, (min, max))| {
            Ok((
                Scalar::try_from_plain(physical_type, min)?,
                Scalar::try_from_plain(physical_type, max)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let ascending = bounds.windows(2).try_fold(true, |acc, window| {
        Result::Ok(
            acc && compare(&window[0].0, &window[1].0)?.is_le()
                && compare(&window[0].1, &window[1].1)?.is_le(),
        )
    })?;
    if ascending {
        return Ok(BoundaryOrder::ASCENDING);
    }
    let descending = bounds.windows(2).try_fold(true, |acc, window| {
        Result::Ok(
            acc && compare(&window[0].0, &window[1].0)?.is_ge()
                && compare(&window[0].1, &window[1].1)?.is_ge(),
        )
    })?;
    if descending {
        return Ok(BoundaryOrder::DESCENDING);
    }
    Ok(BoundaryOrder::UNORDERED)
}
