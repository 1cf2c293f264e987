use crate::error::{Error, Result};
use crate::format;
use crate::parquet_bridge::BoundaryOrder;
use crate::schema::types::PhysicalType;
use crate::statistics::{compare, Scalar};

/// The index of one page: its min/max (absent for null pages) and null
/// count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageIndex {
    /// The minimum value in the page. `None` when every value is null.
    pub min: Option<Scalar>,
    /// The maximum value in the page. `None` when every value is null.
    pub max: Option<Scalar>,
    /// The number of null values in the page.
    pub null_count: Option<i64>,
    /// Whether every value of the page is null.
    pub is_null_page: bool,
}

impl PageIndex {
    /// Whether this page may contain a value in `[min, max]` (inclusive;
    /// `None` bounds are unbounded). Returns `false` only when the page
    /// is a null page or provably disjoint from the range.
    pub fn might_match(&self, min: Option<&Scalar>, max: Option<&Scalar>) -> Result<bool> {
        if self.is_null_page {
            return Ok(false);
        }
        let (page_min, page_max) = match (&self.min, &self.max) {
            (Some(page_min), Some(page_max)) => (page_min, page_max),
            // without statistics nothing is provable
            _ => return Ok(true),
        };
        if let Some(min) = min {
            if compare(page_max, min)?.is_lt() {
                return Ok(false);
            }
        }
        if let Some(max) = max {
            if compare(page_min, max)?.is_gt() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// The deserialized column index of one column chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPageIndexes {
    pub physical_type: PhysicalType,
    pub pages: Vec<PageIndex>,
    pub boundary_order: BoundaryOrder,
}

impl ColumnPageIndexes {
    /// Deserializes a thrift [`format::ColumnIndex`] for a column of
    /// `physical_type`.
    pub fn try_new(index: format::ColumnIndex, physical_type: PhysicalType) -> Result<Self> {
        let len = index.null_pages.len();
        if index.min_values.len() != len || index.max_values.len() != len {
            return Err(Error::InvalidMetadata(
                "a column index requires as many min/max entries as pages".into(),
            ));
        }
        let null_counts = index
            .null_counts
            .map(|counts| counts.into_iter().map(Some).collect::<Vec<_>>())
            .unwrap_or_else(|| vec![None; len]);

        let pages = index
            .min_values
            .iter()
            .zip(index.max_values.iter())
            .zip(index.null_pages.iter())
            .zip(null_counts)
            .map(|(((min, max), is_null), null_count)| {
                let (min, max) = if *is_null {
                    (None, None)
                } else {
                    (
                        Some(Scalar::try_from_plain(physical_type, min)?),
                        Some(Scalar::try_from_plain(physical_type, max)?),
                    )
                };
                Ok(PageIndex {
                    min,
                    max,
                    null_count,
                    is_null_page: *is_null,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            physical_type,
            pages,
            boundary_order: index.boundary_order.try_into()?,
        })
    }

    /// The pages that may contain a value in `[min, max]`, in page order.
    pub fn pages_might_match(
        &self,
        min: Option<&Scalar>,
        max: Option<&Scalar>,
    ) -> Result<Vec<usize>> {
        self.pages
            .iter()
            .enumerate()
            .filter_map(|(i, page)| match page.might_match(min, max) {
                Ok(true) => Some(Ok(i)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ColumnPageIndexes {
        ColumnPageIndexes::try_new(
            format::ColumnIndex {
                null_pages: vec![false, false, true],
                min_values: vec![
                    0i32.to_le_bytes().to_vec(),
                    100i32.to_le_bytes().to_vec(),
                    vec![],
                ],
                max_values: vec![
                    9i32.to_le_bytes().to_vec(),
                    199i32.to_le_bytes().to_vec(),
                    vec![],
                ],
                boundary_order: format::BoundaryOrder::ASCENDING,
                null_counts: Some(vec![0, 2, 10]),
            },
            PhysicalType::Int32,
        )
        .unwrap()
    }

    #[test]
    fn null_pages_never_match() -> Result<()> {
        let index = index();
        assert!(!index.pages[2].might_match(None, None)?);
        Ok(())
    }

    #[test]
    fn disjoint_ranges_are_pruned() -> Result<()> {
        let index = index();
        let min = Scalar::Int32(50);
        let max = Scalar::Int32(99);
        assert_eq!(
            index.pages_might_match(Some(&min), Some(&max))?,
            Vec::<usize>::new()
        );

        let min = Scalar::Int32(5);
        assert_eq!(index.pages_might_match(Some(&min), None)?, vec![0, 1]);

        let max = Scalar::Int32(100);
        assert_eq!(index.pages_might_match(None, Some(&max))?, vec![0, 1]);

        let max = Scalar::Int32(99);
        assert_eq!(index.pages_might_match(None, Some(&max))?, vec![0]);
        Ok(())
    }
}
