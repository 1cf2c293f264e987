use std::collections::HashSet;
use std::io::Write;

use crate::error::{Error, Result};
use crate::format::{ColumnChunk, ColumnMetaData, Encoding, PageType};
use crate::metadata::ColumnDescriptor;
use crate::page::CompressedPage;
use crate::schema::types::physical_type_to_type;
use crate::thrift::CompactWriter;
use crate::write::page::{write_page, PageWriteSpec};
use crate::write::statistics::reduce;
use crate::write::{DynIter, WriteOptions};

/// Writes a column chunk's pages followed by its thrift metadata,
/// returning the chunk, the bytes written, and the per-page specs (used
/// by the page index).
pub fn write_column_chunk<'a, W: Write>(
    writer: &mut W,
    mut offset: u64,
    descriptor: &ColumnDescriptor,
    options: &WriteOptions,
    pages: DynIter<'a, Result<CompressedPage>>,
) -> Result<(ColumnChunk, u64, Vec<PageWriteSpec>)> {
    let initial = offset;

    let mut specs = vec![];
    for page in pages {
        let page = page?;
        let spec = write_page(
            writer,
            offset,
            &page,
            options.write_checksum,
            options.dictionary,
        )?;
        offset += spec.bytes_written;
        specs.push(spec);
    }
    let mut bytes_written = offset - initial;

    let column_chunk = build_column_chunk(&specs, descriptor, options)?;

    // the chunk's metadata is appended after its pages
    let mut thrift_writer = CompactWriter::new(&mut *writer);
    column_chunk
        .meta_data
        .as_ref()
        .expect("built with inline metadata")
        .write_to(&mut thrift_writer)?;
    bytes_written += thrift_writer.written() as u64;

    Ok((column_chunk, bytes_written, specs))
}

fn build_column_chunk(
    specs: &[PageWriteSpec],
    descriptor: &ColumnDescriptor,
    options: &WriteOptions,
) -> Result<ColumnChunk> {
    // SPEC: the total compressed size is the total compressed size of
    // each page + the header size
    let total_compressed_size = specs
        .iter()
        .map(|spec| spec.header_size as i64 + spec.header.compressed_page_size as i64)
        .sum();
    let total_uncompressed_size = specs
        .iter()
        .map(|spec| spec.header_size as i64 + spec.header.uncompressed_page_size as i64)
        .sum();

    let mut data_page_offset = None;
    let mut dictionary_page_offset = None;
    let mut num_values = 0i64;
    for spec in specs {
        match spec.header.type_ {
            PageType::DICTIONARY_PAGE => dictionary_page_offset = Some(spec.offset as i64),
            PageType::DATA_PAGE | PageType::DATA_PAGE_V2 => {
                if data_page_offset.is_none() {
                    data_page_offset = Some(spec.offset as i64);
                }
                num_values += data_page_num_values(spec)? as i64;
            }
            _ => {}
        }
    }
    let data_page_offset = data_page_offset
        .ok_or_else(|| Error::Encode("a column chunk requires at least one data page".into()))?;

    let mut encodings = specs
        .iter()
        .map(|spec| match spec.header.type_ {
            PageType::DICTIONARY_PAGE => spec
                .header
                .dictionary_page_header
                .as_ref()
                .map(|header| header.encoding)
                .ok_or_else(|| Error::Encode("a dictionary page without its header".into())),
            _ => data_page_encoding(spec),
        })
        .collect::<Result<HashSet<_>>>()?
        .into_iter()
        .collect::<Vec<_>>();
    // levels are always hybrid-RLE encoded
    if descriptor.max_def_level() > 0 || descriptor.max_rep_level() > 0 {
        if !encodings.contains(&Encoding::RLE) {
            encodings.push(Encoding::RLE);
        }
    }
    encodings.sort_unstable_by_key(|encoding| encoding.0);

    let statistics = if options.write_statistics {
        let page_statistics = specs
            .iter()
            .filter(|spec| spec.header.type_ != PageType::DICTIONARY_PAGE)
            .map(|spec| data_page_statistics(spec))
            .collect::<Vec<_>>();
        reduce(&page_statistics, descriptor.physical_type())?
    } else {
        None
    };

    let (type_, _) = physical_type_to_type(&descriptor.physical_type());

    let metadata = ColumnMetaData {
        type_,
        encodings,
        path_in_schema: descriptor.path_in_schema().to_vec(),
        codec: options.compression.into(),
        num_values,
        total_uncompressed_size,
        total_compressed_size,
        key_value_metadata: None,
        data_page_offset,
        index_page_offset: None,
        dictionary_page_offset,
        statistics,
        encoding_stats: None,
        bloom_filter_offset: None,
        bloom_filter_length: None,
    };

    Ok(ColumnChunk {
        file_path: None, // same file
        file_offset: data_page_offset + total_compressed_size,
        meta_data: Some(metadata),
        offset_index_offset: None,
        offset_index_length: None,
        column_index_offset: None,
        column_index_length: None,
    })
}

pub(super) fn data_page_num_values(spec: &PageWriteSpec) -> Result<i32> {
    match spec.header.type_ {
        PageType::DATA_PAGE => spec
            .header
            .data_page_header
            .as_ref()
            .map(|header| header.num_values)
            .ok_or_else(|| Error::Encode("a data page without its header".into())),
        PageType::DATA_PAGE_V2 => spec
            .header
            .data_page_header_v2
            .as_ref()
            .map(|header| header.num_values)
            .ok_or_else(|| Error::Encode("a data page without its header".into())),
        _ => Ok(0),
    }
}

fn data_page_encoding(spec: &PageWriteSpec) -> Result<Encoding> {
    match spec.header.type_ {
        PageType::DATA_PAGE => spec
            .header
            .data_page_header
            .as_ref()
            .map(|header| header.encoding)
            .ok_or_else(|| Error::Encode("a data page without its header".into())),
        PageType::DATA_PAGE_V2 => spec
            .header
            .data_page_header_v2
            .as_ref()
            .map(|header| header.encoding)
            .ok_or_else(|| Error::Encode("a data page without its header".into())),
        other => Err(Error::Encode(format!("unexpected page type {}", other.0))),
    }
}

pub(super) fn data_page_statistics(spec: &PageWriteSpec) -> Option<&crate::format::Statistics> {
    match spec.header.type_ {
        PageType::DATA_PAGE => spec
            .header
            .data_page_header
            .as_ref()
            .and_then(|header| header.statistics.as_ref()),
        PageType::DATA_PAGE_V2 => spec
            .header
            .data_page_header_v2
            .as_ref()
            .and_then(|header| header.statistics.as_ref()),
        _ => None,
    }
}
