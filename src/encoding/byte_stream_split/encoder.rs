use crate::types::NativeType;

/// Encodes `data` according to `BYTE_STREAM_SPLIT`: all byte-0s of every
/// value, then all byte-1s, and so on. Output length equals input length.
pub fn encode<T: NativeType>(data: &[T], buffer: &mut Vec<u8>) {
    let element_size = std::mem::size_of::<T>();
    let num_elements = data.len();
    let start = buffer.len();
    buffer.resize(start + element_size * num_elements, 0);

    for (i, v) in data.iter().enumerate() {
        let value_bytes = v.to_le_bytes();
        let value_bytes_ref = value_bytes.as_ref();
        for n in 0..element_size {
            buffer[start + (num_elements * n) + i] = value_bytes_ref[n];
        }
    }
}
