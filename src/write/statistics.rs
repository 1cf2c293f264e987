//! The write-side statistics tracker and the reduction of page
//! statistics into chunk statistics.

use std::cmp::Ordering;

use crate::error::Result;
use crate::format::Statistics;
use crate::schema::types::PhysicalType;
use crate::statistics::{compare, Scalar};

/// Longest min/max payload the tracker keeps. Longer byte-array values
/// are skipped for min/max but still counted.
pub const MAX_STATISTICS_SIZE: usize = 256;

/// Tracks the running min/max and null count of one page or chunk.
///
/// Values arrive in insertion order as their plain-encoded payload. NaN
/// never becomes a bound, so columns holding only NaN publish no min/max.
#[derive(Debug, Clone)]
pub struct StatisticsTracker {
    physical_type: PhysicalType,
    min: Option<Vec<u8>>,
    max: Option<Vec<u8>>,
    null_count: i64,
    num_values: i64,
}

impl StatisticsTracker {
    pub fn new(physical_type: PhysicalType) -> Self {
        Self {
            physical_type,
            min: None,
            max: None,
            null_count: 0,
            num_values: 0,
        }
    }

    pub fn update_null(&mut self) {
        self.null_count += 1;
    }

    /// Tracks one present value, given as its plain-encoded payload
    /// (byte arrays without their length prefix).
    pub fn update(&mut self, bytes: &[u8], is_nan: bool) -> Result<()> {
        self.num_values += 1;
        if is_nan || bytes.len() > MAX_STATISTICS_SIZE {
            return Ok(());
        }
        let value = Scalar::try_from_plain(self.physical_type, bytes)?;
        let replace_min = match &self.min {
            None => true,
            Some(min) => {
                let min = Scalar::try_from_plain(self.physical_type, min)?;
                compare(&value, &min)? == Ordering::Less
            }
        };
        if replace_min {
            self.min = Some(bytes.to_vec());
        }
        let replace_max = match &self.max {
            None => true,
            Some(max) => {
                let max = Scalar::try_from_plain(self.physical_type, max)?;
                compare(&value, &max)? == Ordering::Greater
            }
        };
        if replace_max {
            self.max = Some(bytes.to_vec());
        }
        Ok(())
    }

    pub fn null_count(&self) -> i64 {
        self.null_count
    }

    /// Serializes the tracked state, emptying the tracker for the next
    /// page.
    pub fn flush(&mut self) -> Statistics {
        let statistics = Statistics {
            null_count: Some(self.null_count),
            distinct_count: None,
            min_value: self.min.take(),
            max_value: self.max.take(),
            is_min_value_exact: None,
            is_max_value_exact: None,
            min: None,
            max: None,
        };
        self.null_count = 0;
        self.num_values = 0;
        statistics
    }
}

/// Reduces the statistics of a chunk's pages into the chunk's
/// statistics. `None` page entries poison min/max but not null counts.
pub fn reduce(
    statistics: &[Option<&Statistics>],
    physical_type: PhysicalType,
) -> Result<Option<Statistics>> {
    if statistics.is_empty() {
        return Ok(None);
    }

    let mut null_count = Some(0i64);
    let mut min: Option<Vec<u8>> = None;
    let mut max: Option<Vec<u8>> = None;
    let mut all_have_min_max = true;

    for page in statistics {
        let page = match page {
            Some(page) => page,
            None => return Ok(None),
        };
        null_count = null_count.zip(page.null_count).map(|(a, b)| a + b);
        match (&page.min_value, &mut min) {
            (Some(page_min), Some(current)) => {
                let lhs = Scalar::try_from_plain(physical_type, page_min)?;
                let rhs = Scalar::try_from_plain(physical_type, current)?;
                if compare(&lhs, &rhs)? == Ordering::Less {
                    *current = page_min.clone();
                }
            }
            (Some(page_min), None) => min = Some(page_min.clone()),
            (None, _) => all_have_min_max = false,
        }
        match (&page.max_value, &mut max) {
            (Some(page_max), Some(current)) => {
                let lhs = Scalar::try_from_plain(physical_type, page_max)?;
                let rhs = Scalar::try_from_plain(physical_type, current)?;
                if compare(&lhs, &rhs)? == Ordering::Greater {
                    *current = page_max.clone();
                }
            }
            (Some(page_max), None) => max = Some(page_max.clone()),
            (None, _) => {}
        }
    }

    // a page without bounds (all-null or all-NaN) leaves the chunk's
    // bounds inexact only if other pages have them; drop them instead
    if !all_have_min_max {
        min = None;
        max = None;
    }

    Ok(Some(Statistics {
        null_count,
        distinct_count: None,
        min_value: min,
        max_value: max,
        is_min_value_exact: None,
        is_max_value_exact: None,
        min: None,
        max: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_min_max_and_nulls() -> Result<()> {
        let mut tracker = StatisticsTracker::new(PhysicalType::Int32);
        for value in [3i32, -7, 12, 0] {
            tracker.update(&value.to_le_bytes(), false)?;
        }
        tracker.update_null();
        tracker.update_null();

        let statistics = tracker.flush();
        assert_eq!(statistics.null_count, Some(2));
        assert_eq!(statistics.min_value, Some((-7i32).to_le_bytes().to_vec()));
        assert_eq!(statistics.max_value, Some(12i32.to_le_bytes().to_vec()));
        Ok(())
    }

    #[test]
    fn nan_never_becomes_a_bound() -> Result<()> {
        let mut tracker = StatisticsTracker::new(PhysicalType::Double);
        tracker.update(&f64::NAN.to_le_bytes(), true)?;
        tracker.update(&1.5f64.to_le_bytes(), false)?;
        let statistics = tracker.flush();
        assert_eq!(statistics.min_value, Some(1.5f64.to_le_bytes().to_vec()));
        assert_eq!(statistics.max_value, Some(1.5f64.to_le_bytes().to_vec()));

        // a column of only NaN publishes no bounds
        let mut tracker = StatisticsTracker::new(PhysicalType::Double);
        tracker.update(&f64::NAN.to_le_bytes(), true)?;
        let statistics = tracker.flush();
        assert_eq!(statistics.min_value, None);
        assert_eq!(statistics.max_value, None);
        Ok(())
    }

    #[test]
    fn long_byte_arrays_are_skipped() -> Result<()> {
        let mut tracker = StatisticsTracker::new(PhysicalType::ByteArray);
        tracker.update(&vec![0xFF; MAX_STATISTICS_SIZE + 1], false)?;
        tracker.update(b"short", false)?;
        let statistics = tracker.flush();
        assert_eq!(statistics.min_value, Some(b"short".to_vec()));
        assert_eq!(statistics.max_value, Some(b"short".to_vec()));
        Ok(())
    }

    #[test]
    fn reduce_folds_pages() -> Result<()> {
        let page1 = Statistics {
            null_count: Some(1),
            min_value: Some(5i32.to_le_bytes().to_vec()),
            max_value: Some(10i32.to_le_bytes().to_vec()),
            ..Default::default()
        };
        let page2 = Statistics {
            null_count: Some(2),
            min_value: Some(1i32.to_le_bytes().to_vec()),
            max_value: Some(7i32.to_le_bytes().to_vec()),
            ..Default::default()
        };
        let reduced = reduce(&[Some(&page1), Some(&page2)], PhysicalType::Int32)?.unwrap();
        assert_eq!(reduced.null_count, Some(3));
        assert_eq!(reduced.min_value, Some(1i32.to_le_bytes().to_vec()));
        assert_eq!(reduced.max_value, Some(10i32.to_le_bytes().to_vec()));
        Ok(())
    }
}
