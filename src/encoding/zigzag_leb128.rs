use super::uleb128;
use crate::error::Result;

/// Decodes a zigzag-encoded LEB128 number, returning it and the number of
/// bytes consumed.
pub fn decode(values: &[u8]) -> Result<(i64, usize)> {
    let (u, consumed) = uleb128::decode(values)?;
    Ok(((u >> 1) as i64 ^ -((u & 1) as i64), consumed))
}

/// Encodes `value` into a fixed container, returning it and the number of
/// bytes used.
pub fn encode(value: i64) -> ([u8; 10], usize) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    let mut container = [0u8; 10];
    let encoded_len = uleb128::encode(zigzag, &mut container);
    (container, encoded_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() -> Result<()> {
        // see e.g. https://stackoverflow.com/a/2211086/931303
        let cases = vec![
            (0u8, 0i64),
            (1, -1),
            (2, 1),
            (3, -2),
            (4, 2),
            (5, -3),
            (6, 3),
            (7, -4),
            (8, 4),
            (9, -5),
        ];
        for (data, expected) in cases {
            let (result, _) = decode(&[data])?;
            assert_eq!(result, expected)
        }
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        for expected in (-1_000_000i64..=1_000_000).step_by(997) {
            let (container, len) = encode(expected);
            let (result, consumed) = decode(&container[..len])?;
            assert_eq!(consumed, len);
            assert_eq!(result, expected);
        }
        Ok(())
    }

    #[test]
    fn extremes() -> Result<()> {
        for expected in [i64::MIN, i64::MIN + 1, i64::MAX - 1, i64::MAX] {
            let (container, len) = encode(expected);
            assert_eq!(decode(&container[..len])?, (expected, len));
        }
        Ok(())
    }
}
