//! The page index: per-page statistics (column index) and page locations
//! (offset index), used to prune pages before decoding them.
mod index;
mod read;

pub use index::{ColumnPageIndexes, PageIndex};
pub use read::{read_column_indexes, read_offset_indexes};

pub use crate::format::PageLocation;
pub use crate::parquet_bridge::BoundaryOrder;
