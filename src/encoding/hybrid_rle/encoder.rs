use std::io::Write;

use super::super::bitpacked;
use super::super::{ceil8, uleb128};
use crate::error::Result;

/// Minimum run of equal values for which an RLE run beats bit-packing.
const MIN_RLE_RUN: usize = 8;

/// Hybrid RLE/bit-packed encoding of `values` in `num_bits` each.
/// Runs of at least 8 equal values become RLE runs; everything else is
/// bit-packed in groups of 8.
pub fn encode<W: Write>(writer: &mut W, values: &[u32], num_bits: u8) -> Result<()> {
    let num_bits = num_bits as usize;
    let mut container = [0u8; 10];

    let mut i = 0;
    while i < values.len() {
        let run_end = run_length(&values[i..]) + i;

        if run_end - i >= MIN_RLE_RUN {
            write_rle_run(writer, values[i], run_end - i, num_bits, &mut container)?;
            i = run_end;
        } else {
            // accumulate groups of 8 until a long run starts or the
            // values end; the tail group is zero-padded
            let mut end = i;
            loop {
                end = std::cmp::min(end + 8, values.len());
                if end == values.len() || run_length(&values[end..]) >= MIN_RLE_RUN {
                    break;
                }
            }
            write_bitpacked_segment(writer, &values[i..end], num_bits)?;
            i = end;
        }
    }
    Ok(())
}

/// Length of the run of equal values at the start of `values`.
fn run_length(values: &[u32]) -> usize {
    match values.first() {
        None => 0,
        Some(first) => values.iter().take_while(|v| *v == first).count(),
    }
}

fn write_rle_run<W: Write>(
    writer: &mut W,
    value: u32,
    run_length: usize,
    num_bits: usize,
    container: &mut [u8; 10],
) -> Result<()> {
    let header = (run_length as u64) << 1;
    let used = uleb128::encode(header, container);
    writer.write_all(&container[..used])?;
    writer.write_all(&value.to_le_bytes()[..ceil8(num_bits)])?;
    Ok(())
}

fn write_bitpacked_segment<W: Write>(
    writer: &mut W,
    values: &[u32],
    num_bits: usize,
) -> Result<()> {
    let num_groups = ceil8(values.len());
    let header = ((num_groups as u64) << 1) | 1;
    let mut container = [0u8; 10];
    let used = uleb128::encode(header, &mut container);
    writer.write_all(&container[..used])?;

    // scratch rounded up to whole 32-value blocks, zero padded
    let blocks = (values.len() + bitpacked::BLOCK_LEN - 1) / bitpacked::BLOCK_LEN;
    let mut packed = vec![0u8; std::cmp::max(blocks, 1) * 4 * bitpacked::BLOCK_LEN];
    bitpacked::encode(values, num_bits, &mut packed);

    writer.write_all(&packed[..num_groups * num_bits])?;
    Ok(())
}
