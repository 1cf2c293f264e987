use bitpacking::BitPacker;
use bitpacking::BitPacker1x;

use super::BLOCK_LEN;
use crate::encoding::ceil8;

/// Encodes `u32` values into `compressed` using `num_bits` per value,
/// returning nothing: the caller sizes `compressed` to
/// `ceil8(decompressed.len() * num_bits)` rounded up to whole blocks.
pub fn encode(decompressed: &[u32], num_bits: usize, compressed: &mut [u8]) {
    if num_bits == 0 {
        return;
    }
    let chunks = decompressed.chunks_exact(BLOCK_LEN);
    let remainder = chunks.remainder();

    let block_bytes = ceil8(BLOCK_LEN * num_bits);

    let mut offset = 0;
    for chunk in chunks {
        encode_pack(chunk.try_into().unwrap(), num_bits as u8, &mut compressed[offset..]);
        offset += block_bytes;
    }

    if !remainder.is_empty() {
        let mut last_chunk = [0u32; BLOCK_LEN];
        last_chunk[..remainder.len()].copy_from_slice(remainder);
        encode_pack(last_chunk, num_bits as u8, &mut compressed[offset..]);
    }
}

/// Encodes one block of 32 `u32` values, returning the number of bytes
/// written.
#[inline]
pub fn encode_pack(decompressed: [u32; BLOCK_LEN], num_bits: u8, compressed: &mut [u8]) -> usize {
    BitPacker1x::new().compress(&decompressed, compressed, num_bits)
}

/// Encodes `u64` values into `compressed` using `num_bits` per value,
/// LSB-first, scalar kernel.
pub fn encode64(decompressed: &[u64], num_bits: usize, compressed: &mut [u8]) {
    if num_bits == 0 {
        return;
    }
    debug_assert!(num_bits <= 64);

    let mut bit_offset = 0usize;
    for &value in decompressed {
        let masked = if num_bits == 64 {
            value
        } else {
            value & ((1u64 << num_bits) - 1)
        };
        let mut remaining = num_bits;
        let mut acc = masked;
        while remaining > 0 {
            let byte = bit_offset / 8;
            let shift = bit_offset % 8;
            let available = 8 - shift;
            compressed[byte] |= ((acc << shift) & 0xFF) as u8;
            let written = std::cmp::min(available, remaining);
            acc >>= written;
            remaining -= written;
            bit_offset += written;
        }
    }
}
