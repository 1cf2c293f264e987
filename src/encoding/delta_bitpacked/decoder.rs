use super::super::{bitpacked, ceil8, uleb128, zigzag_leb128};
use crate::error::{Error, Result};

#[derive(Debug)]
struct MiniblockState {
    /// decoded stored values of the current miniblock
    values: Vec<u64>,
    index: usize,
}

/// Decoder of parquet's `DELTA_BINARY_PACKED`. Implements
/// `Iterator<Item = Result<i64>>`. Values are recovered with wrapping
/// additions, mirroring the encoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    values: &'a [u8],
    num_mini_blocks: usize,
    values_per_mini_block: usize,
    remaining: usize,
    /// the value to emit next; deltas are applied after emission
    next_value: i64,
    /// min_delta of the block currently being consumed
    min_delta: i64,
    /// bit widths of the block's miniblocks not yet consumed
    pending_widths: std::collections::VecDeque<u8>,
    current: MiniblockState,
    /// values still to be read from the current block
    block_remaining: usize,
}

impl<'a> Decoder<'a> {
    pub fn try_new(mut values: &'a [u8]) -> Result<Self> {
        let (block_size, consumed) = uleb128::decode(values).map_err(bad_header)?;
        values = &values[consumed..];
        let (num_mini_blocks, consumed) = uleb128::decode(values).map_err(bad_header)?;
        values = &values[consumed..];
        let (total_count, consumed) = uleb128::decode(values).map_err(bad_header)?;
        values = &values[consumed..];
        let (first_value, consumed) = zigzag_leb128::decode(values).map_err(bad_header)?;
        values = &values[consumed..];

        if num_mini_blocks == 0 || block_size == 0 {
            return Err(Error::InvalidDelta(
                "the header declares zero miniblocks or a zero block size".into(),
            ));
        }
        if block_size % 128 != 0 || block_size % num_mini_blocks != 0 {
            return Err(Error::InvalidDelta(format!(
                "block size {} is not a multiple of 128 divisible into {} miniblocks",
                block_size, num_mini_blocks
            )));
        }
        let values_per_mini_block = (block_size / num_mini_blocks) as usize;
        if values_per_mini_block % 8 != 0 {
            return Err(Error::InvalidDelta(format!(
                "miniblocks of {} values are not a multiple of 8",
                values_per_mini_block
            )));
        }

        Ok(Self {
            values,
            num_mini_blocks: num_mini_blocks as usize,
            values_per_mini_block,
            remaining: total_count as usize,
            next_value: first_value,
            min_delta: 0,
            pending_widths: Default::default(),
            current: MiniblockState {
                values: vec![],
                index: 0,
            },
            block_remaining: 0,
        })
    }

    fn load_block(&mut self) -> Result<()> {
        let (min_delta, consumed) = zigzag_leb128::decode(self.values).map_err(bad_header)?;
        self.values = &self.values[consumed..];
        self.min_delta = min_delta;

        if self.values.len() < self.num_mini_blocks {
            return Err(Error::InvalidDelta(
                "a block header ends before its miniblock bit widths".into(),
            ));
        }
        self.pending_widths = self.values[..self.num_mini_blocks].iter().copied().collect();
        self.values = &self.values[self.num_mini_blocks..];

        // number of deltas this block carries; all blocks but the last
        // are full
        self.block_remaining = std::cmp::min(
            self.remaining,
            self.num_mini_blocks * self.values_per_mini_block,
        );
        Ok(())
    }

    fn load_miniblock(&mut self) -> Result<()> {
        let num_bits = self.pending_widths.pop_front().ok_or_else(|| {
            Error::InvalidDelta("a block ran out of miniblocks before its values".into())
        })? as usize;

        let length = std::cmp::min(self.block_remaining, self.values_per_mini_block);
        if num_bits > 0 {
            let miniblock_length = ceil8(self.values_per_mini_block * num_bits);
            if miniblock_length > self.values.len() {
                return Err(Error::InvalidDelta(
                    "a miniblock declares more bytes than the stream holds".into(),
                ));
            }
            let (miniblock, remainder) = self.values.split_at(miniblock_length);
            self.values = remainder;
            self.current.values =
                bitpacked::Decoder64::new(miniblock, num_bits, length).collect();
        } else {
            self.current.values.clear();
            self.current.values.resize(length, 0);
        }
        self.current.index = 0;
        Ok(())
    }

    fn next_delta(&mut self) -> Result<i64> {
        if self.block_remaining == 0 {
            self.load_block()?;
        }
        if self.current.index == self.current.values.len() {
            self.load_miniblock()?;
        }
        let stored = self.current.values[self.current.index];
        self.current.index += 1;
        self.block_remaining -= 1;
        Ok(self.min_delta.wrapping_add(stored as i64))
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.next_value;
        if self.remaining > 0 {
            match self.next_delta() {
                Ok(delta) => self.next_value = result.wrapping_add(delta),
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Ok(result))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

fn bad_header(_: Error) -> Error {
    Error::InvalidDelta("the stream header is not valid".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_spec() -> Result<()> {
        let expected = (1i64..=5).collect::<Vec<_>>();
        // VALIDATED FROM SPARK==3.1.1
        // header: [128, 1, 4, 5, 2]
        // block size: 128, 1
        // mini-blocks: 4
        // elements: 5
        // first_value: 2 <=z> 1
        // block1: [2, 0, 0, 0, 0]
        // min_delta: 2 <=z> 1
        // bit_widths: [0, 0, 0, 0]
        let data = &[128, 1, 4, 5, 2, 2, 0, 0, 0, 0];

        let decoder = Decoder::try_new(data)?;
        let r = decoder.collect::<Result<Vec<_>>>()?;

        assert_eq!(expected, r);
        Ok(())
    }

    #[test]
    fn zero_miniblocks_is_an_error() {
        let data = &[128, 1, 0, 5, 2];
        assert!(Decoder::try_new(data).is_err());
    }

    #[test]
    fn truncated_block_is_an_error() -> Result<()> {
        // declares 5 values but carries no block
        let data = &[128, 1, 4, 5, 2];
        let decoder = Decoder::try_new(data)?;
        assert!(decoder.collect::<Result<Vec<_>>>().is_err());
        Ok(())
    }
}
