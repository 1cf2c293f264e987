use std::sync::Arc;

use crate::error::{Error, Result};
use crate::format::Statistics as ParquetStatistics;
use crate::schema::types::PhysicalType;
use crate::types::NativeType;

use super::{min_max_bytes, Statistics};

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveStatistics<T: NativeType> {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<T>,
    pub max_value: Option<T>,
}

impl<T: NativeType> Statistics for PrimitiveStatistics<T> {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &T::TYPE
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

fn decode<T: NativeType>(bytes: &[u8]) -> Result<T> {
    if bytes.len() != std::mem::size_of::<T>() {
        return Err(Error::InvalidMetadata(
            "the min/max of statistics must be plain encoded".into(),
        ));
    }
    Ok(crate::types::decode(bytes))
}

pub fn read<T: NativeType>(statistics: &ParquetStatistics) -> Result<Arc<dyn Statistics>> {
    let (min, max) = min_max_bytes(statistics);
    Ok(Arc::new(PrimitiveStatistics::<T> {
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: min.map(decode::<T>).transpose()?,
        max_value: max.map(decode::<T>).transpose()?,
    }))
}

pub fn write<T: NativeType>(statistics: &dyn Statistics) -> ParquetStatistics {
    // the caller dispatched on the physical type
    let statistics = statistics
        .as_any()
        .downcast_ref::<PrimitiveStatistics<T>>()
        .unwrap();
    ParquetStatistics {
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: statistics
            .min_value
            .map(|value| value.to_le_bytes().as_ref().to_vec()),
        max_value: statistics
            .max_value
            .map(|value| value.to_le_bytes().as_ref().to_vec()),
        is_min_value_exact: statistics.min_value.map(|_| true),
        is_max_value_exact: statistics.max_value.map(|_| true),
        min: None,
        max: None,
    }
}
