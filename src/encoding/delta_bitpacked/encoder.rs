use super::super::{bitpacked, ceil8, uleb128, zigzag_leb128};
use super::{BLOCK_SIZE, MINIBLOCKS, VALUES_PER_MINIBLOCK};

/// Encodes `values` according to parquet's `DELTA_BINARY_PACKED`.
/// Deltas are computed with wrapping arithmetic so that any `i64` (and
/// thus any `i32`) sequence round-trips exactly, including the extreme
/// ranges.
pub fn encode(values: &[i64], buffer: &mut Vec<u8>) {
    let mut container = [0u8; 10];

    let encoded_len = uleb128::encode(BLOCK_SIZE as u64, &mut container);
    buffer.extend_from_slice(&container[..encoded_len]);

    let encoded_len = uleb128::encode(MINIBLOCKS as u64, &mut container);
    buffer.extend_from_slice(&container[..encoded_len]);

    let encoded_len = uleb128::encode(values.len() as u64, &mut container);
    buffer.extend_from_slice(&container[..encoded_len]);

    let first_value = values.first().copied().unwrap_or(0);
    let (container, encoded_len) = zigzag_leb128::encode(first_value);
    buffer.extend_from_slice(&container[..encoded_len]);

    let mut deltas = [0u64; BLOCK_SIZE];
    let mut prev = first_value;
    let mut index = 1;
    while index < values.len() {
        let block = &values[index..std::cmp::min(index + BLOCK_SIZE, values.len())];
        index += block.len();

        let mut min_delta = i64::MAX;
        let raw = block
            .iter()
            .map(|&v| {
                let delta = v.wrapping_sub(prev);
                prev = v;
                min_delta = min_delta.min(delta);
                delta
            })
            .collect::<Vec<_>>();

        for (delta, slot) in raw.iter().zip(deltas.iter_mut()) {
            *slot = delta.wrapping_sub(min_delta) as u64;
        }
        deltas[raw.len()..].fill(0);

        // <min delta> <miniblock bit widths> <miniblocks>
        let (container, encoded_len) = zigzag_leb128::encode(min_delta);
        buffer.extend_from_slice(&container[..encoded_len]);

        let used_miniblocks = ceil_div(raw.len(), VALUES_PER_MINIBLOCK);
        let widths: Vec<u8> = (0..MINIBLOCKS)
            .map(|m| {
                if m >= used_miniblocks {
                    return 0;
                }
                let start = m * VALUES_PER_MINIBLOCK;
                let end = std::cmp::min(start + VALUES_PER_MINIBLOCK, raw.len());
                deltas[start..end]
                    .iter()
                    .map(|&d| 64 - d.leading_zeros() as u8)
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        buffer.extend_from_slice(&widths);

        for (m, &num_bits) in widths.iter().enumerate().take(used_miniblocks) {
            if num_bits == 0 {
                continue;
            }
            let start = buffer.len();
            let bytes_needed = ceil8(VALUES_PER_MINIBLOCK * num_bits as usize);
            buffer.resize(start + bytes_needed, 0);
            bitpacked::encode64(
                &deltas[m * VALUES_PER_MINIBLOCK..(m + 1) * VALUES_PER_MINIBLOCK],
                num_bits as usize,
                &mut buffer[start..],
            );
        }
    }
}

#[inline]
fn ceil_div(value: usize, divisor: usize) -> usize {
    value / divisor + (value % divisor != 0) as usize
}
