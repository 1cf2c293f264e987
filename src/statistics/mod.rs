//! Typed views of column statistics and the total order used to prune
//! row groups and pages.
mod binary;
mod boolean;
mod fixed_len_binary;
mod primitive;

pub use binary::BinaryStatistics;
pub use boolean::BooleanStatistics;
pub use fixed_len_binary::FixedLenStatistics;
pub use primitive::PrimitiveStatistics;

use std::any::Any;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::format;
use crate::schema::types::PhysicalType;
use crate::types::{self, Int96, NativeType};

/// A deserialized, typed view of a column chunk's or page's statistics.
pub trait Statistics: std::fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn physical_type(&self) -> &PhysicalType;

    fn null_count(&self) -> Option<i64>;
}

impl PartialEq for &dyn Statistics {
    fn eq(&self, other: &Self) -> bool {
        self.physical_type() == other.physical_type() && {
            serialize_statistics(*self) == serialize_statistics(*other)
        }
    }
}

/// Deserializes [`format::Statistics`] into a typed [`Statistics`].
/// Producers that wrote only the legacy `min`/`max` pair are accepted.
pub fn deserialize_statistics(
    statistics: &format::Statistics,
    physical_type: PhysicalType,
) -> Result<Arc<dyn Statistics>> {
    match physical_type {
        PhysicalType::Boolean => boolean::read(statistics),
        PhysicalType::Int32 => primitive::read::<i32>(statistics),
        PhysicalType::Int64 => primitive::read::<i64>(statistics),
        PhysicalType::Int96 => primitive::read::<Int96>(statistics),
        PhysicalType::Float => primitive::read::<f32>(statistics),
        PhysicalType::Double => primitive::read::<f64>(statistics),
        PhysicalType::ByteArray => binary::read(statistics),
        PhysicalType::FixedLenByteArray(size) => fixed_len_binary::read(statistics, size),
    }
}

/// Serializes a typed [`Statistics`] into [`format::Statistics`].
pub fn serialize_statistics(statistics: &dyn Statistics) -> format::Statistics {
    match statistics.physical_type() {
        PhysicalType::Boolean => boolean::write(statistics),
        PhysicalType::Int32 => primitive::write::<i32>(statistics),
        PhysicalType::Int64 => primitive::write::<i64>(statistics),
        PhysicalType::Int96 => primitive::write::<Int96>(statistics),
        PhysicalType::Float => primitive::write::<f32>(statistics),
        PhysicalType::Double => primitive::write::<f64>(statistics),
        PhysicalType::ByteArray => binary::write(statistics),
        PhysicalType::FixedLenByteArray(_) => fixed_len_binary::write(statistics),
    }
}

/// The minimum and maximum of some statistics, resolved from the modern
/// fields with a fallback to the legacy pair.
pub(crate) fn min_max_bytes(statistics: &format::Statistics) -> (Option<&[u8]>, Option<&[u8]>) {
    let min = statistics
        .min_value
        .as_deref()
        .or(statistics.min.as_deref());
    let max = statistics
        .max_value
        .as_deref()
        .or(statistics.max.as_deref());
    (min, max)
}

/// A single typed value, used to query statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Int96(Int96),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    FixedLenByteArray(Vec<u8>),
}

impl Scalar {
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            Scalar::Boolean(_) => PhysicalType::Boolean,
            Scalar::Int32(_) => PhysicalType::Int32,
            Scalar::Int64(_) => PhysicalType::Int64,
            Scalar::Int96(_) => PhysicalType::Int96,
            Scalar::Float(_) => PhysicalType::Float,
            Scalar::Double(_) => PhysicalType::Double,
            Scalar::ByteArray(_) => PhysicalType::ByteArray,
            Scalar::FixedLenByteArray(values) => PhysicalType::FixedLenByteArray(values.len()),
        }
    }

    /// Decodes a plain-encoded value of `physical_type`.
    pub fn try_from_plain(physical_type: PhysicalType, bytes: &[u8]) -> Result<Self> {
        let check = |size: usize| {
            if bytes.len() == size {
                Ok(())
            } else {
                Err(Error::InvalidMetadata(format!(
                    "statistics of {:?} must be {} plain-encoded bytes",
                    physical_type, size
                )))
            }
        };
        Ok(match physical_type {
            PhysicalType::Boolean => {
                check(1)?;
                Scalar::Boolean(bytes[0] != 0)
            }
            PhysicalType::Int32 => {
                check(4)?;
                Scalar::Int32(types::decode(bytes))
            }
            PhysicalType::Int64 => {
                check(8)?;
                Scalar::Int64(types::decode(bytes))
            }
            PhysicalType::Int96 => {
                check(12)?;
                Scalar::Int96(types::decode(bytes))
            }
            PhysicalType::Float => {
                check(4)?;
                Scalar::Float(types::decode(bytes))
            }
            PhysicalType::Double => {
                check(8)?;
                Scalar::Double(types::decode(bytes))
            }
            PhysicalType::ByteArray => Scalar::ByteArray(bytes.to_vec()),
            PhysicalType::FixedLenByteArray(size) => {
                check(size)?;
                Scalar::FixedLenByteArray(bytes.to_vec())
            }
        })
    }
}

/// Compares two scalars of the same physical type.
///
/// Integers compare signed; INT96 compares its 32-bit words from most to
/// least significant; floats use an order where NaN sorts after every
/// other value and equals itself; byte arrays compare lexicographically.
pub fn compare(lhs: &Scalar, rhs: &Scalar) -> Result<Ordering> {
    Ok(match (lhs, rhs) {
        (Scalar::Boolean(lhs), Scalar::Boolean(rhs)) => lhs.cmp(rhs),
        (Scalar::Int32(lhs), Scalar::Int32(rhs)) => lhs.cmp(rhs),
        (Scalar::Int64(lhs), Scalar::Int64(rhs)) => lhs.cmp(rhs),
        (Scalar::Int96(lhs), Scalar::Int96(rhs)) => NativeType::ord(lhs, rhs),
        (Scalar::Float(lhs), Scalar::Float(rhs)) => NativeType::ord(lhs, rhs),
        (Scalar::Double(lhs), Scalar::Double(rhs)) => NativeType::ord(lhs, rhs),
        (Scalar::ByteArray(lhs), Scalar::ByteArray(rhs)) => lhs.cmp(rhs),
        (Scalar::FixedLenByteArray(lhs), Scalar::FixedLenByteArray(rhs)) => lhs.cmp(rhs),
        _ => {
            return Err(Error::TypeMismatch(format!(
                "cannot compare {:?} with {:?}",
                lhs.physical_type(),
                rhs.physical_type()
            )))
        }
    })
}
