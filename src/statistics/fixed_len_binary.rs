use std::sync::Arc;

use crate::error::{Error, Result};
use crate::format::Statistics as ParquetStatistics;
use crate::schema::types::PhysicalType;

use super::{min_max_bytes, Statistics};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedLenStatistics {
    pub physical_type: PhysicalType,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<Vec<u8>>,
    pub max_value: Option<Vec<u8>>,
}

impl Statistics for FixedLenStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &self.physical_type
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

pub fn read(statistics: &ParquetStatistics, size: usize) -> Result<Arc<dyn Statistics>> {
    let (min, max) = min_max_bytes(statistics);
    let check = |bytes: &[u8]| {
        if bytes.len() != size {
            Err(Error::InvalidMetadata(format!(
                "the min/max of a FIXED_LEN_BYTE_ARRAY({}) column must be {} bytes",
                size, size
            )))
        } else {
            Ok(bytes.to_vec())
        }
    };
    Ok(Arc::new(FixedLenStatistics {
        physical_type: PhysicalType::FixedLenByteArray(size),
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: min.map(check).transpose()?,
        max_value: max.map(check).transpose()?,
    }))
}

pub fn write(statistics: &dyn Statistics) -> ParquetStatistics {
    let statistics = statistics
        .as_any()
        .downcast_ref::<FixedLenStatistics>()
        .unwrap();
    ParquetStatistics {
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: statistics.min_value.clone(),
        max_value: statistics.max_value.clone(),
        is_min_value_exact: statistics.min_value.as_ref().map(|_| true),
        is_max_value_exact: statistics.max_value.as_ref().map(|_| true),
        min: None,
        max: None,
    }
}
