use std::any::Any;
use std::sync::Arc;

use crate::encoding::plain::BinaryIter;
use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

use super::DictPage;

/// All distinct byte-array values of a chunk, packed back to back with
/// an offsets table.
#[derive(Debug)]
pub struct BinaryPageDict {
    values: Vec<u8>,
    offsets: Vec<u32>,
}

impl BinaryPageDict {
    pub fn new(values: Vec<u8>, offsets: Vec<u32>) -> Self {
        Self { values, offsets }
    }

    pub fn value(&self, index: usize) -> Result<&[u8]> {
        let start = self.offsets.get(index).copied().ok_or_else(|| {
            Error::Decode(format!(
                "dictionary index {} is out of a dictionary of {} entries",
                index,
                self.len()
            ))
        })? as usize;
        let end = self.offsets[index + 1] as usize;
        Ok(&self.values[start..end])
    }
}

impl DictPage for BinaryPageDict {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &PhysicalType::ByteArray
    }

    fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }
}

pub fn read(buf: &[u8], num_values: usize) -> Result<Arc<dyn DictPage>> {
    let mut offsets = Vec::with_capacity(num_values + 1);
    offsets.push(0u32);
    let mut values = vec![];
    for value in BinaryIter::new(buf, num_values) {
        let value = value?;
        values.extend_from_slice(value);
        offsets.push(values.len() as u32);
    }
    Ok(Arc::new(BinaryPageDict::new(values, offsets)))
}
