use super::super::uleb128;
use super::{super::ceil8, HybridEncoded};
use crate::error::{Error, Result};

/// An [`Iterator`] that, given a slice of bytes, returns [`HybridEncoded`]
/// runs.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    values: &'a [u8],
    num_bits: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(values: &'a [u8], num_bits: usize) -> Self {
        Self { values, num_bits }
    }

    /// Returns the number of bits being used by this decoder.
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<HybridEncoded<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.values.is_empty() {
            return None;
        }
        let (indicator, consumed) = match uleb128::decode(self.values) {
            Ok(x) => x,
            Err(_) => {
                self.values = &[];
                return Some(Err(Error::InvalidRle(
                    "run header is not a valid uleb128 number".into(),
                )));
            }
        };
        self.values = &self.values[consumed..];
        if indicator & 1 == 1 {
            // is bitpacking
            let num_groups = (indicator as usize) >> 1;
            let bytes = num_groups * self.num_bits;
            let bytes = std::cmp::min(bytes, self.values.len());
            let result = HybridEncoded::Bitpacked(&self.values[..bytes], num_groups * 8);
            self.values = &self.values[bytes..];
            Some(Ok(result))
        } else {
            // is rle; repeated-value uses a fixed width of
            // round-up-to-next-byte(bit-width)
            let run_length = (indicator as usize) >> 1;
            let rle_bytes = ceil8(self.num_bits);
            if rle_bytes > self.values.len() {
                self.values = &[];
                return Some(Err(Error::InvalidRle(
                    "RLE run declares more value bytes than the stream holds".into(),
                )));
            }
            let result = HybridEncoded::Rle(&self.values[..rle_bytes], run_length);
            self.values = &self.values[rle_bytes..];
            Some(Ok(result))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::super::super::bitpacked;

    #[test]
    fn bitpacked_run() -> Result<()> {
        let bit_width = 1usize;
        let length = 5;
        let values = [
            2, 0, 0, 0, // length
            0b00000011, 0b00001011, // data
        ];

        let mut decoder = Decoder::new(&values[4..6], bit_width);

        let run = decoder.next().unwrap()?;

        if let HybridEncoded::Bitpacked(values, _) = run {
            assert_eq!(values, &[0b00001011]);
            let result =
                bitpacked::Decoder::new(values, bit_width, length).collect::<Vec<_>>();
            assert_eq!(result, &[1, 1, 0, 1, 0]);
        } else {
            panic!()
        };
        Ok(())
    }

    #[test]
    fn rle_run() -> Result<()> {
        let bit_width = 1;
        let length = 8;
        let values = [
            2, 0, 0, 0,          // length
            0b00010000, // data
            0b00000001,
        ];

        let mut decoder = Decoder::new(&values[4..6], bit_width);

        let run = decoder.next().unwrap()?;

        if let HybridEncoded::Rle(values, items) = run {
            assert_eq!(values, &[0b00000001]);
            assert_eq!(items, length);
        } else {
            panic!()
        };
        Ok(())
    }

    #[test]
    fn rle_without_value_bytes_errors() {
        let values = [0b00010000u8];
        let mut decoder = Decoder::new(&values, 1);
        assert!(decoder.next().unwrap().is_err());
    }
}
