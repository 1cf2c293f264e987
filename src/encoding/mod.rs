pub mod bitpacked;
pub mod byte_stream_split;
pub mod delta_bitpacked;
pub mod hybrid_rle;
pub mod plain;
pub mod uleb128;
pub mod zigzag_leb128;

pub use crate::parquet_bridge::Encoding;

use crate::error::{Error, Result};

/// Reads the 4-byte little-endian length prefix of a level stream.
pub fn get_length(values: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = values
        .get(0..4)
        .ok_or_else(|| Error::InvalidPage("a level stream requires a 4-byte length prefix".into()))?
        .try_into()
        .unwrap();
    Ok(u32::from_le_bytes(bytes))
}

/// Returns the ceil of `value / 8`.
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}

/// Number of bits required to represent any value in `0..=max`.
#[inline]
pub fn log2(max: u64) -> u32 {
    64 - max.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2() {
        assert_eq!(log2(0), 0);
        assert_eq!(log2(1), 1);
        assert_eq!(log2(2), 2);
        assert_eq!(log2(3), 2);
        assert_eq!(log2(4), 3);
        assert_eq!(log2(7), 3);
    }

    #[test]
    fn length_prefix_requires_four_bytes() {
        assert!(get_length(&[1, 0]).is_err());
        assert_eq!(get_length(&[5, 0, 0, 0, 9]).unwrap(), 5);
    }
}
