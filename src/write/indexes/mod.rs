mod serialize;

pub use serialize::{serialize_column_index, serialize_offset_index};
