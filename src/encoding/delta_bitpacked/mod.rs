mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::encode;

/// Number of deltas per block.
pub(crate) const BLOCK_SIZE: usize = 128;
/// Number of miniblocks per block.
pub(crate) const MINIBLOCKS: usize = 4;
/// Number of values per miniblock.
pub(crate) const VALUES_PER_MINIBLOCK: usize = BLOCK_SIZE / MINIBLOCKS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn roundtrip(data: &[i64]) -> Result<()> {
        let mut buffer = vec![];
        encode(data, &mut buffer);
        let iter = Decoder::try_new(&buffer)?;

        let result = iter.collect::<Result<Vec<_>>>()?;
        assert_eq!(result, data);
        Ok(())
    }

    #[test]
    fn basic() -> Result<()> {
        roundtrip(&[1, 3, 1, 2, 3])
    }

    #[test]
    fn negative_value() -> Result<()> {
        roundtrip(&[1, 3, -1, 2, 3])
    }

    #[test]
    fn single() -> Result<()> {
        roundtrip(&[3])
    }

    #[test]
    fn empty() -> Result<()> {
        roundtrip(&[])
    }

    #[test]
    fn more_than_one_block() -> Result<()> {
        let mut data = vec![1i64, 3, -1, 2, 3, 10, 1];
        for x in 0..128 {
            data.push(x - 10)
        }
        roundtrip(&data)
    }

    #[test]
    fn some_miniblocks_empty() -> Result<()> {
        // 33 values: second miniblock has a single value, third and
        // fourth are absent
        roundtrip(&(0..33).map(|x| x * 7).collect::<Vec<_>>())
    }

    #[test]
    fn int32_extremes() -> Result<()> {
        roundtrip(&[i32::MIN as i64, i32::MAX as i64, i32::MIN as i64, 0])
    }

    #[test]
    fn int64_extremes() -> Result<()> {
        roundtrip(&[i64::MIN, i64::MAX, i64::MIN, -1, 1, 0, i64::MAX])
    }

    #[test]
    fn random_sequences() -> Result<()> {
        use rand::distributions::{Distribution, Uniform};
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let wide = Uniform::new_inclusive(i64::MIN, i64::MAX);
        let narrow = Uniform::new_inclusive(-1000i64, 1000);

        for length in [1usize, 31, 128, 129, 1000] {
            let data = (0..length).map(|_| narrow.sample(&mut rng)).collect::<Vec<_>>();
            roundtrip(&data)?;
            let data = (0..length).map(|_| wide.sample(&mut rng)).collect::<Vec<_>>();
            roundtrip(&data)?;
        }
        Ok(())
    }

    #[test]
    fn tiny_ascending_is_tiny() -> Result<()> {
        // constant delta of 1 packs to a header and an all-zero block
        let data = (1..=100).collect::<Vec<_>>();
        let mut buffer = vec![];
        encode(&data, &mut buffer);
        assert!(buffer.len() <= 20);

        let result = Decoder::try_new(&buffer)?.collect::<Result<Vec<_>>>()?;
        assert_eq!(result, data);
        Ok(())
    }
}
