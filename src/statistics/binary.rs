use std::sync::Arc;

use crate::error::Result;
use crate::format::Statistics as ParquetStatistics;
use crate::schema::types::PhysicalType;

use super::{min_max_bytes, Statistics};

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<Vec<u8>>,
    pub max_value: Option<Vec<u8>>,
}

impl Statistics for BinaryStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &PhysicalType::ByteArray
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

pub fn read(statistics: &ParquetStatistics) -> Result<Arc<dyn Statistics>> {
    let (min, max) = min_max_bytes(statistics);
    Ok(Arc::new(BinaryStatistics {
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: min.map(|bytes| bytes.to_vec()),
        max_value: max.map(|bytes| bytes.to_vec()),
    }))
}

pub fn write(statistics: &dyn Statistics) -> ParquetStatistics {
    let statistics = statistics
        .as_any()
        .downcast_ref::<BinaryStatistics>()
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
