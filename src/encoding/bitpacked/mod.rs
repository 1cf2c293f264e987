//! LSB-first bit packing as used by hybrid RLE groups and delta
//! miniblocks. 32-bit values go through [`bitpacking::BitPacker1x`]
//! block kernels; 64-bit values (delta miniblocks of INT64 columns) go
//! through a scalar kernel, since the block kernels stop at 32 bits.
mod decode;
mod encode;

pub use decode::{Decoder, Decoder64};
pub use encode::{encode, encode64, encode_pack};

/// Number of values a packed block holds.
pub const BLOCK_LEN: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ceil8;

    #[test]
    fn test_decode() {
        // Test data: 0-7 with bit width 3
        // 0: 000
        // 1: 001
        // 2: 010
        // 3: 011
        // 4: 100
        // 5: 101
        // 6: 110
        // 7: 111
        let num_bits = 3;
        let length = 8;
        let data = vec![0b10001000u8, 0b11000110, 0b11111010];

        let decoded = Decoder::new(&data, num_bits, length).collect::<Vec<_>>();
        assert_eq!(decoded, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_encode() {
        let num_bits = 3;
        let unpacked = vec![0u32, 1, 2, 3, 4, 5, 6, 7];

        let mut packed = vec![0u8; 4 * BLOCK_LEN];
        encode(&unpacked, num_bits, &mut packed);

        let expected = vec![0b10001000u8, 0b11000110, 0b11111010];
        assert_eq!(&packed[..3], expected);
    }

    #[test]
    fn test_decode_bool() {
        let num_bits = 1;
        let length = 8;
        let data = vec![0b10101010];

        let decoded = Decoder::new(&data, num_bits, length).collect::<Vec<_>>();
        assert_eq!(decoded, vec![0, 1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn odd_lengths() {
        // [0, 1, 2, 3, 4, 5, 6, 0]x4 + [2]
        let data = &[0b10001000u8, 0b11000110, 0b00011010];
        let num_bits = 3;
        let copies = 4;
        let expected = std::iter::repeat(&[0u32, 1, 2, 3, 4, 5, 6, 0])
            .take(copies)
            .flatten()
            .copied()
            .chain(std::iter::once(2))
            .collect::<Vec<_>>();
        let data = std::iter::repeat(data)
            .take(copies)
            .flatten()
            .copied()
            .chain(std::iter::once(0b00000010u8))
            .collect::<Vec<_>>();

        let decoded = Decoder::new(&data, num_bits, expected.len()).collect::<Vec<_>>();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn u64_round_trip_wide() {
        for num_bits in [1usize, 7, 33, 63, 64] {
            let values = (0..100u64)
                .map(|i| {
                    if num_bits == 64 {
                        u64::MAX - i
                    } else {
                        (i * 0x9E37_79B9) & ((1u64 << num_bits) - 1)
                    }
                })
                .collect::<Vec<_>>();

            let mut packed = vec![0u8; ceil8(128 * num_bits)];
            encode64(&values, num_bits, &mut packed);

            let decoded = Decoder64::new(&packed, num_bits, values.len()).collect::<Vec<_>>();
            assert_eq!(decoded, values);
        }
    }

    #[test]
    fn u32_u64_kernels_agree() {
        let values = vec![3u32, 3, 0, 3, 2, 3, 3, 3, 3, 1, 3, 3, 3, 0, 3, 1];
        let num_bits = 2;

        let mut packed32 = vec![0u8; 4 * BLOCK_LEN];
        encode(&values, num_bits, &mut packed32);

        let wide = values.iter().map(|&v| v as u64).collect::<Vec<_>>();
        let mut packed64 = vec![0u8; 4 * BLOCK_LEN];
        encode64(&wide, num_bits, &mut packed64);

        assert_eq!(packed32[..4], packed64[..4]);
    }
}
