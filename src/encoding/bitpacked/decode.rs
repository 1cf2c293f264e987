use bitpacking::BitPacker;
use bitpacking::BitPacker1x;

use super::BLOCK_LEN;

#[inline]
fn decode_pack(compressed: &[u8], num_bits: usize, pack: &mut [u32; BLOCK_LEN]) {
    let compressed_block_size = BLOCK_LEN * num_bits / 8;

    if compressed.len() < compressed_block_size {
        // last block of a stream may be cut short; pad it
        let mut buf = [0u8; 4 * BLOCK_LEN];
        buf[..compressed.len()].copy_from_slice(compressed);
        BitPacker1x::new().decompress(&buf[..compressed_block_size], pack, num_bits as u8);
    } else {
        BitPacker1x::new().decompress(&compressed[..compressed_block_size], pack, num_bits as u8);
    }
}

/// An [`Iterator`] of `u32` over a LSB-first bit-packed slice.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    compressed_chunks: std::slice::Chunks<'a, u8>,
    num_bits: usize,
    remaining: usize,
    current_pack_index: usize, // invariant: < BLOCK_LEN
    current_pack: [u32; BLOCK_LEN],
}

impl<'a> Decoder<'a> {
    pub fn new(compressed: &'a [u8], num_bits: usize, mut length: usize) -> Self {
        let compressed_block_size = std::cmp::max(BLOCK_LEN * num_bits / 8, 1);

        let mut compressed_chunks = compressed.chunks(compressed_block_size);
        let mut current_pack = [0u32; BLOCK_LEN];
        if num_bits == 0 {
            // all values are zero; nothing to read
            return Self {
                remaining: length,
                compressed_chunks: compressed[..0].chunks(1),
                num_bits,
                current_pack,
                current_pack_index: 0,
            };
        }
        if let Some(chunk) = compressed_chunks.next() {
            decode_pack(chunk, num_bits, &mut current_pack);
        } else {
            length = 0
        };

        Self {
            remaining: length,
            compressed_chunks,
            num_bits,
            current_pack,
            current_pack_index: 0,
        }
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.current_pack[self.current_pack_index];
        self.current_pack_index += 1;
        if self.current_pack_index == BLOCK_LEN {
            if let Some(chunk) = self.compressed_chunks.next() {
                decode_pack(chunk, self.num_bits, &mut self.current_pack);
            }
            self.current_pack_index = 0;
        }
        self.remaining -= 1;
        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Decoder<'a> {}

/// An [`Iterator`] of `u64` over a LSB-first bit-packed slice, scalar.
#[derive(Debug, Clone)]
pub struct Decoder64<'a> {
    compressed: &'a [u8],
    num_bits: usize,
    remaining: usize,
    bit_offset: usize,
}

impl<'a> Decoder64<'a> {
    pub fn new(compressed: &'a [u8], num_bits: usize, length: usize) -> Self {
        debug_assert!(num_bits <= 64);
        Self {
            compressed,
            num_bits,
            remaining: length,
            bit_offset: 0,
        }
    }
}

impl<'a> Iterator for Decoder64<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if self.num_bits == 0 {
            return Some(0);
        }

        let mut value = 0u64;
        let mut read = 0usize;
        while read < self.num_bits {
            let byte = *self.compressed.get(self.bit_offset / 8).unwrap_or(&0);
            let shift = self.bit_offset % 8;
            let available = 8 - shift;
            let take = std::cmp::min(available, self.num_bits - read);
            let bits = (byte >> shift) as u64 & ((1u64 << take) - 1);
            value |= bits << read;
            read += take;
            self.bit_offset += take;
        }
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Decoder64<'a> {}
