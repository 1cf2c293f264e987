use crate::encoding::{hybrid_rle::HybridRleDecoder, log2};
use crate::error::{Error, Result};

/// Returns the number of bits a level stream of `max_level` uses per
/// level.
#[inline]
pub fn get_bit_width(max_level: i16) -> u32 {
    log2(max_level as u64)
}

/// Decodes a level stream (no length prefix) of `num_values` levels into
/// `levels`. When `max_level` is zero the stream is absent and every
/// level is zero.
pub fn decode_levels(
    buffer: &[u8],
    max_level: i16,
    num_values: usize,
    levels: &mut Vec<i16>,
) -> Result<()> {
    levels.clear();
    if max_level == 0 {
        levels.resize(num_values, 0);
        return Ok(());
    }
    let bit_width = get_bit_width(max_level);
    let decoder = HybridRleDecoder::try_new(buffer, bit_width, num_values)?;
    levels.reserve(num_values);
    for level in decoder {
        let level = level?;
        if level > max_level as u32 {
            return Err(Error::Decode(format!(
                "level {} exceeds the maximum level {} of its column",
                level, max_level
            )));
        }
        levels.push(level as i16);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::hybrid_rle;

    #[test]
    fn bit_widths() {
        assert_eq!(get_bit_width(0), 0);
        assert_eq!(get_bit_width(1), 1);
        assert_eq!(get_bit_width(2), 2);
        assert_eq!(get_bit_width(3), 2);
        assert_eq!(get_bit_width(7), 3);
    }

    #[test]
    fn required_levels_are_implicit() -> Result<()> {
        let mut levels = vec![];
        decode_levels(&[], 0, 5, &mut levels)?;
        assert_eq!(levels, vec![0, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let expected = vec![1i16, 0, 1, 0, 1, 1, 1, 0, 0, 1];
        let mut buffer = vec![];
        hybrid_rle::encode(
            &mut buffer,
            &expected.iter().map(|&l| l as u32).collect::<Vec<_>>(),
            1,
        )?;

        let mut levels = vec![];
        decode_levels(&buffer, 1, expected.len(), &mut levels)?;
        assert_eq!(levels, expected);
        Ok(())
    }

    #[test]
    fn out_of_range_level_errors() -> Result<()> {
        let mut buffer = vec![];
        hybrid_rle::encode(&mut buffer, &[3u32; 10], 2)?;
        let mut levels = vec![];
        assert!(decode_levels(&buffer, 1, 10, &mut levels).is_err());
        Ok(())
    }
}
