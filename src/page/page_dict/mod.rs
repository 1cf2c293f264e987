mod binary;
mod fixed_len_binary;
mod primitive;

pub use binary::BinaryPageDict;
pub use fixed_len_binary::FixedLenByteArrayPageDict;
pub use primitive::PrimitivePageDict;

use std::any::Any;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

use super::EncodedDictPage;

/// A dictionary of a column chunk, materialized once per chunk at its
/// dictionary page.
pub trait DictPage: std::fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn physical_type(&self) -> &PhysicalType;

    /// Number of distinct values.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decodes an uncompressed, PLAIN-encoded dictionary page body into a
/// typed dictionary.
pub fn read_dict_page(
    page: &EncodedDictPage,
    physical_type: PhysicalType,
) -> Result<Arc<dyn DictPage>> {
    match physical_type {
        PhysicalType::Boolean => Err(Error::InvalidPage(
            "boolean columns cannot be dictionary-encoded".into(),
        )),
        PhysicalType::Int32 => primitive::read::<i32>(&page.buffer, page.num_values),
        PhysicalType::Int64 => primitive::read::<i64>(&page.buffer, page.num_values),
        PhysicalType::Int96 => primitive::read::<crate::types::Int96>(&page.buffer, page.num_values),
        PhysicalType::Float => primitive::read::<f32>(&page.buffer, page.num_values),
        PhysicalType::Double => primitive::read::<f64>(&page.buffer, page.num_values),
        PhysicalType::ByteArray => binary::read(&page.buffer, page.num_values),
        PhysicalType::FixedLenByteArray(size) => {
            fixed_len_binary::read(&page.buffer, size, page.num_values)
        }
    }
}
