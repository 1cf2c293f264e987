use std::any::Any;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

use super::DictPage;

#[derive(Debug)]
pub struct FixedLenByteArrayPageDict {
    values: Vec<u8>,
    physical_type: PhysicalType,
    size: usize,
}

impl FixedLenByteArrayPageDict {
    pub fn new(values: Vec<u8>, size: usize) -> Self {
        Self {
            values,
            physical_type: PhysicalType::FixedLenByteArray(size),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn value(&self, index: usize) -> Result<&[u8]> {
        let start = index * self.size;
        self.values.get(start..start + self.size).ok_or_else(|| {
            Error::Decode(format!(
                "dictionary index {} is out of a dictionary of {} entries",
                index,
                self.len()
            ))
        })
    }
}

impl DictPage for FixedLenByteArrayPageDict {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &self.physical_type
    }

    fn len(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.values.len() / self.size
        }
    }
}

pub fn read(buf: &[u8], size: usize, num_values: usize) -> Result<Arc<dyn DictPage>> {
    let length = size.checked_mul(num_values).ok_or_else(|| {
        Error::InvalidPage("the dictionary declares more values than addressable".into())
    })?;
    let values = buf
        .get(..length)
        .ok_or_else(|| {
            Error::InvalidPage("the dictionary declares more values than its page holds".into())
        })?
        .to_vec();
    Ok(Arc::new(FixedLenByteArrayPageDict::new(values, size)))
}
