use std::any::Any;
use std::sync::Arc;

use crate::encoding::plain;
use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

use super::DictPage;

#[derive(Debug)]
pub struct PrimitivePageDict<T: NativeType> {
    values: Vec<T>,
}

impl<T: NativeType> PrimitivePageDict<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Result<T> {
        self.values.get(index).copied().ok_or_else(|| {
            Error::Decode(format!(
                "dictionary index {} is out of a dictionary of {} entries",
                index,
                self.values.len()
            ))
        })
    }
}

impl<T: NativeType> DictPage for PrimitivePageDict<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &T::TYPE
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

pub fn read<T: NativeType>(buf: &[u8], num_values: usize) -> Result<Arc<dyn DictPage>> {
    let size = std::mem::size_of::<T>();
    let typed_size = num_values
        .checked_mul(size)
        .filter(|needed| *needed <= buf.len())
        .ok_or_else(|| {
            Error::InvalidPage("the dictionary declares more values than its page holds".into())
        })?;
    let values = plain::decode_native::<T>(&buf[..typed_size])?.collect();
    Ok(Arc::new(PrimitivePageDict::new(values)))
}
