mod basic_type;
mod converted_type;
mod parquet_type;
mod physical_type;
mod spec;

pub use basic_type::BasicTypeInfo;
pub use converted_type::{GroupConvertedType, PrimitiveConvertedType};
pub use parquet_type::ParquetType;
pub use physical_type::{physical_type_to_type, type_to_physical_type, PhysicalType};

pub use crate::parquet_bridge::{
    GroupLogicalType, IntegerType, PrimitiveLogicalType, Repetition, TimeUnit,
};

/// A logical type annotation of either a leaf or a group.
pub type LogicalType = PrimitiveLogicalType;
