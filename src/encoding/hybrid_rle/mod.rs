// See https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3
mod bitmap;
mod decoder;
mod encoder;

pub use bitmap::{encode as bitpacked_encode, BitmapIter};
pub use decoder::Decoder;
pub use encoder::encode;

use crate::encoding::bitpacked;
use crate::error::{Error, Result};

/// A run of the hybrid stream, borrowed from its underlying slice.
#[derive(Debug, PartialEq, Eq)]
pub enum HybridEncoded<'a> {
    /// A bit-packed group: `data, number of values`.
    Bitpacked(&'a [u8], usize),
    /// An RLE run: `little-endian value bytes, run length`.
    Rle(&'a [u8], usize),
}

enum State<'a> {
    Bitpacked(bitpacked::Decoder<'a>),
    Rle { value: u32, length: usize },
    Finished,
}

/// An [`Iterator`] of `u32` over a hybrid RLE/bit-packed stream with a
/// known number of values. Yields an error when the stream is exhausted
/// before producing all declared values.
pub struct HybridRleDecoder<'a> {
    decoder: decoder::Decoder<'a>,
    state: State<'a>,
    num_bits: usize,
    remaining: usize,
}

impl<'a> HybridRleDecoder<'a> {
    pub fn try_new(data: &'a [u8], num_bits: u32, num_values: usize) -> Result<Self> {
        let num_bits = num_bits as usize;
        if num_bits > 32 {
            return Err(Error::InvalidRle(format!(
                "bit width {} exceeds the maximum of 32",
                num_bits
            )));
        }
        let mut this = Self {
            decoder: decoder::Decoder::new(data, num_bits),
            state: State::Finished,
            num_bits,
            remaining: num_values,
        };
        this.load_run()?;
        Ok(this)
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    fn load_run(&mut self) -> Result<()> {
        self.state = match self.decoder.next().transpose()? {
            Some(HybridEncoded::Bitpacked(packed, length)) => State::Bitpacked(
                bitpacked::Decoder::new(packed, self.num_bits, length.min(self.remaining)),
            ),
            Some(HybridEncoded::Rle(pack, length)) => {
                let mut bytes = [0u8; std::mem::size_of::<u32>()];
                pack.iter().zip(bytes.iter_mut()).for_each(|(src, dst)| *dst = *src);
                State::Rle {
                    value: u32::from_le_bytes(bytes),
                    length,
                }
            }
            None => State::Finished,
        };
        Ok(())
    }
}

impl<'a> Iterator for HybridRleDecoder<'a> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if self.num_bits == 0 {
            self.remaining -= 1;
            return Some(Ok(0));
        }
        loop {
            let next = match &mut self.state {
                State::Finished => {
                    return Some(Err(Error::Decode(
                        "hybrid RLE stream exhausted before all declared values".into(),
                    )))
                }
                State::Bitpacked(decoder) => decoder.next(),
                State::Rle { value, length } => {
                    if *length == 0 {
                        None
                    } else {
                        *length -= 1;
                        Some(*value)
                    }
                }
            };
            match next {
                Some(value) => {
                    self.remaining -= 1;
                    return Some(Ok(value));
                }
                None => {
                    if let Err(e) = self.load_run() {
                        return Some(Err(e));
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(values: &[u32], num_bits: u8) -> Result<()> {
        let mut buffer = vec![];
        encode(&mut buffer, values, num_bits)?;
        let decoder = HybridRleDecoder::try_new(&buffer, num_bits as u32, values.len())?;
        let result = decoder.collect::<Result<Vec<_>>>()?;
        assert_eq!(result, values);
        Ok(())
    }

    #[test]
    fn basics() -> Result<()> {
        roundtrip(&[0, 1, 2, 1, 2, 1, 1, 0, 3], 2)
    }

    #[test]
    fn long_runs_use_rle() -> Result<()> {
        let mut buffer = vec![];
        let values = vec![1u32; 1000];
        encode(&mut buffer, &values, 1)?;
        // a single RLE run: uleb header of (1000 << 1) + one value byte
        assert_eq!(buffer, vec![0xD0, 0x0F, 1]);
        roundtrip(&values, 1)
    }

    #[test]
    fn mixed_runs() -> Result<()> {
        let mut values = vec![0u32, 1, 2, 3, 1, 2, 0, 1];
        values.extend(std::iter::repeat(2).take(100));
        values.extend([0, 1, 3, 2, 1]);
        roundtrip(&values, 2)
    }

    #[test]
    fn empty_is_empty() -> Result<()> {
        roundtrip(&[], 2)
    }

    #[test]
    fn truncated_stream_errors() {
        // header declares one bit-packed group of 8 values but carries no bytes
        let data = [0b0000_0011u8];
        let decoder = HybridRleDecoder::try_new(&data, 3, 8).unwrap();
        let result = decoder.collect::<Result<Vec<_>>>();
        assert!(result.is_err());
    }

    #[test]
    fn zero_bit_width_yields_zeros() -> Result<()> {
        let decoder = HybridRleDecoder::try_new(&[], 0, 4)?;
        assert_eq!(decoder.collect::<Result<Vec<_>>>()?, vec![0, 0, 0, 0]);
        Ok(())
    }
}
