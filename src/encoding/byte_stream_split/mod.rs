mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::encode;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::types::NativeType;

    fn roundtrip<T: NativeType + PartialEq>(data: &[T]) -> Result<()> {
        let mut buffer = vec![];
        encode(data, &mut buffer);
        assert_eq!(buffer.len(), data.len() * std::mem::size_of::<T>());

        let decoder = Decoder::<T>::try_new(&buffer)?;
        let result = decoder.collect::<Result<Vec<_>>>()?;
        assert!(result == data);
        Ok(())
    }

    #[test]
    fn floats() -> Result<()> {
        roundtrip(&[0.1f32, -0.2, 3.0, f32::MAX, f32::MIN_POSITIVE])
    }

    #[test]
    fn doubles() -> Result<()> {
        roundtrip(&[0.1f64, -0.2, 3.0, f64::MAX, f64::MIN_POSITIVE])
    }

    #[test]
    fn integers() -> Result<()> {
        roundtrip(&[1i32, -1, i32::MAX, i32::MIN, 0])?;
        roundtrip(&[1i64, -1, i64::MAX, i64::MIN, 0])
    }

    #[test]
    fn planes_are_transposed() {
        let mut buffer = vec![];
        encode(&[0x0403_0201i32, 0x0807_0605], &mut buffer);
        assert_eq!(buffer, vec![0x01, 0x05, 0x02, 0x06, 0x03, 0x07, 0x04, 0x08]);
    }

    #[test]
    fn misaligned_input_errors() {
        assert!(Decoder::<f32>::try_new(&[0u8; 7]).is_err());
    }
}
