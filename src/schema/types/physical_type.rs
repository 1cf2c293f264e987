use crate::error::{Error, Result};
use crate::format::Type;

/// The physical (on-disk) representation of a leaf column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(usize),
}

pub fn type_to_physical_type(type_: Type, length: Option<i32>) -> Result<PhysicalType> {
    Ok(match type_ {
        Type::BOOLEAN => PhysicalType::Boolean,
        Type::INT32 => PhysicalType::Int32,
        Type::INT64 => PhysicalType::Int64,
        Type::INT96 => PhysicalType::Int96,
        Type::FLOAT => PhysicalType::Float,
        Type::DOUBLE => PhysicalType::Double,
        Type::BYTE_ARRAY => PhysicalType::ByteArray,
        Type::FIXED_LEN_BYTE_ARRAY => {
            let length = length.ok_or_else(|| {
                Error::InvalidSchema("a length must be defined for FIXED_LEN_BYTE_ARRAY".into())
            })?;
            let length = usize::try_from(length).map_err(|_| {
                Error::InvalidSchema("a FIXED_LEN_BYTE_ARRAY length must be positive".into())
            })?;
            PhysicalType::FixedLenByteArray(length)
        }
        _ => {
            return Err(Error::InvalidSchema(format!(
                "physical type {} is not known to this reader",
                type_.0
            )))
        }
    })
}

pub fn physical_type_to_type(physical_type: &PhysicalType) -> (Type, Option<i32>) {
    match physical_type {
        PhysicalType::Boolean => (Type::BOOLEAN, None),
        PhysicalType::Int32 => (Type::INT32, None),
        PhysicalType::Int64 => (Type::INT64, None),
        PhysicalType::Int96 => (Type::INT96, None),
        PhysicalType::Float => (Type::FLOAT, None),
        PhysicalType::Double => (Type::DOUBLE, None),
        PhysicalType::ByteArray => (Type::BYTE_ARRAY, None),
        PhysicalType::FixedLenByteArray(length) => {
            (Type::FIXED_LEN_BYTE_ARRAY, Some(*length as i32))
        }
    }
}
