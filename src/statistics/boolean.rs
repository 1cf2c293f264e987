use std::sync::Arc;

use crate::error::{Error, Result};
use crate::format::Statistics as ParquetStatistics;
use crate::schema::types::PhysicalType;

use super::{min_max_bytes, Statistics};

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<bool>,
    pub max_value: Option<bool>,
}

impl Statistics for BooleanStatistics {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn physical_type(&self) -> &PhysicalType {
        &PhysicalType::Boolean
    }

    fn null_count(&self) -> Option<i64> {
        self.null_count
    }
}

fn decode(bytes: &[u8]) -> Result<bool> {
    if bytes.len() != 1 {
        return Err(Error::InvalidMetadata(
            "the min/max of a boolean column is a single byte".into(),
        ));
    }
    Ok(bytes[0] != 0)
}

pub fn read(statistics: &ParquetStatistics) -> Result<Arc<dyn Statistics>> {
    let (min, max) = min_max_bytes(statistics);
    Ok(Arc::new(BooleanStatistics {
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: min.map(decode).transpose()?,
        max_value: max.map(decode).transpose()?,
    }))
}

pub fn write(statistics: &dyn Statistics) -> ParquetStatistics {
    let statistics = statistics
        .as_any()
        .downcast_ref::<BooleanStatistics>()
        .unwrap();
    ParquetStatistics {
        null_count: statistics.null_count,
        distinct_count: statistics.distinct_count,
        min_value: statistics.min_value.map(|value| vec![value as u8]),
        max_value: statistics.max_value.map(|value| vec![value as u8]),
        is_min_value_exact: statistics.min_value.map(|_| true),
        is_max_value_exact: statistics.max_value.map(|_| true),
        min: None,
        max: None,
    }
}
