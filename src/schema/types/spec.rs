//! Invariant checks of the annotations a primitive may carry.
use crate::error::{Error, Result};

use super::{IntegerType, PhysicalType, PrimitiveConvertedType, PrimitiveLogicalType, TimeUnit};

fn check_decimal_invariants(
    physical_type: &PhysicalType,
    precision: usize,
    scale: usize,
) -> Result<()> {
    if precision < 1 {
        return Err(Error::InvalidSchema(format!(
            "DECIMAL requires a precision of at least 1, got {}",
            precision
        )));
    }
    if scale > precision {
        return Err(Error::InvalidSchema(format!(
            "DECIMAL scale {} cannot exceed its precision {}",
            scale, precision
        )));
    }

    match physical_type {
        PhysicalType::Int32 => {
            if precision > 9 {
                return Err(Error::InvalidSchema(format!(
                    "an INT32 cannot hold a DECIMAL of precision {}",
                    precision
                )));
            }
        }
        PhysicalType::Int64 => {
            if precision > 18 {
                return Err(Error::InvalidSchema(format!(
                    "an INT64 cannot hold a DECIMAL of precision {}",
                    precision
                )));
            }
        }
        PhysicalType::FixedLenByteArray(length) => {
            // maximum precision of `length` bytes: floor(log10(2^(8l - 1) - 1))
            let max_precision =
                (2f64.powi(8 * (*length as i32) - 1) - 1f64).log10().floor() as usize;
            if precision > max_precision {
                return Err(Error::InvalidSchema(format!(
                    "a FIXED_LEN_BYTE_ARRAY({}) cannot hold a DECIMAL of precision {}",
                    length, precision
                )));
            }
        }
        PhysicalType::ByteArray => {}
        _ => {
            return Err(Error::InvalidSchema(
                "DECIMAL can only annotate INT32, INT64, BYTE_ARRAY or FIXED_LEN_BYTE_ARRAY"
                    .into(),
            ))
        }
    };
    Ok(())
}

pub fn check_converted_invariants(
    physical_type: &PhysicalType,
    converted_type: &Option<PrimitiveConvertedType>,
) -> Result<()> {
    let converted_type = match converted_type {
        Some(converted) => converted,
        None => return Ok(()),
    };
    use PrimitiveConvertedType::*;

    match converted_type {
        Utf8 | Bson | Json | Enum => {
            if physical_type != &PhysicalType::ByteArray {
                return Err(Error::InvalidSchema(format!(
                    "{:?} can only annotate BYTE_ARRAY fields",
                    converted_type
                )));
            }
        }
        Decimal(precision, scale) => {
            check_decimal_invariants(physical_type, *precision, *scale)?;
        }
        Date | TimeMillis | Uint8 | Uint16 | Uint32 | Int8 | Int16 | Int32 => {
            if physical_type != &PhysicalType::Int32 {
                return Err(Error::InvalidSchema(format!(
                    "{:?} can only annotate INT32",
                    converted_type
                )));
            }
        }
        TimeMicros | TimestampMillis | TimestampMicros | Uint64 | Int64 => {
            if physical_type != &PhysicalType::Int64 {
                return Err(Error::InvalidSchema(format!(
                    "{:?} can only annotate INT64",
                    converted_type
                )));
            }
        }
        Interval => {
            if physical_type != &PhysicalType::FixedLenByteArray(12) {
                return Err(Error::InvalidSchema(
                    "INTERVAL can only annotate FIXED_LEN_BYTE_ARRAY(12)".into(),
                ));
            }
        }
    };
    Ok(())
}

pub fn check_logical_invariants(
    physical_type: &PhysicalType,
    logical_type: &Option<PrimitiveLogicalType>,
) -> Result<()> {
    let logical_type = match logical_type {
        Some(logical) => *logical,
        None => return Ok(()),
    };
    use PrimitiveLogicalType::*;

    match logical_type {
        Enum | String | Json | Bson => {
            if physical_type != &PhysicalType::ByteArray {
                return Err(Error::InvalidSchema(format!(
                    "{:?} can only annotate BYTE_ARRAY fields",
                    logical_type
                )));
            }
        }
        Decimal(precision, scale) => {
            check_decimal_invariants(physical_type, precision, scale)?;
        }
        Date => {
            if physical_type != &PhysicalType::Int32 {
                return Err(Error::InvalidSchema("DATE can only annotate INT32".into()));
            }
        }
        Time { unit, .. } => match (physical_type, unit) {
            (PhysicalType::Int32, TimeUnit::Milliseconds) => {}
            (PhysicalType::Int64, TimeUnit::Microseconds | TimeUnit::Nanoseconds) => {}
            _ => {
                return Err(Error::InvalidSchema(
                    "TIME requires INT32 for millis and INT64 for micros/nanos".into(),
                ))
            }
        },
        Timestamp { .. } => {
            if physical_type != &PhysicalType::Int64 {
                return Err(Error::InvalidSchema(
                    "TIMESTAMP can only annotate INT64".into(),
                ));
            }
        }
        Integer(integer) => match integer {
            IntegerType::Int8
            | IntegerType::Int16
            | IntegerType::Int32
            | IntegerType::UInt8
            | IntegerType::UInt16
            | IntegerType::UInt32 => {
                if physical_type != &PhysicalType::Int32 {
                    return Err(Error::InvalidSchema(
                        "INTEGER of up to 32 bits can only annotate INT32".into(),
                    ));
                }
            }
            IntegerType::Int64 | IntegerType::UInt64 => {
                if physical_type != &PhysicalType::Int64 {
                    return Err(Error::InvalidSchema(
                        "INTEGER of 64 bits can only annotate INT64".into(),
                    ));
                }
            }
        },
        Uuid => {
            if physical_type != &PhysicalType::FixedLenByteArray(16) {
                return Err(Error::InvalidSchema(
                    "UUID can only annotate FIXED_LEN_BYTE_ARRAY(16)".into(),
                ));
            }
        }
        Float16 => {
            if physical_type != &PhysicalType::FixedLenByteArray(2) {
                return Err(Error::InvalidSchema(
                    "FLOAT16 can only annotate FIXED_LEN_BYTE_ARRAY(2)".into(),
                ));
            }
        }
        Unknown => {}
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_bounds() {
        assert!(check_converted_invariants(
            &PhysicalType::Int32,
            &Some(PrimitiveConvertedType::Decimal(9, 2))
        )
        .is_ok());
        assert!(check_converted_invariants(
            &PhysicalType::Int32,
            &Some(PrimitiveConvertedType::Decimal(10, 2))
        )
        .is_err());
        assert!(check_converted_invariants(
            &PhysicalType::Int64,
            &Some(PrimitiveConvertedType::Decimal(18, 2))
        )
        .is_ok());
        assert!(check_converted_invariants(
            &PhysicalType::Int64,
            &Some(PrimitiveConvertedType::Decimal(19, 2))
        )
        .is_err());
    }

    #[test]
    fn uuid_requires_flba16() {
        assert!(check_logical_invariants(
            &PhysicalType::FixedLenByteArray(16),
            &Some(PrimitiveLogicalType::Uuid)
        )
        .is_ok());
        assert!(
            check_logical_invariants(&PhysicalType::ByteArray, &Some(PrimitiveLogicalType::Uuid))
                .is_err()
        );
    }

    #[test]
    fn time_units() {
        assert!(check_logical_invariants(
            &PhysicalType::Int32,
            &Some(PrimitiveLogicalType::Time {
                unit: TimeUnit::Milliseconds,
                is_adjusted_to_utc: false
            })
        )
        .is_ok());
        assert!(check_logical_invariants(
            &PhysicalType::Int32,
            &Some(PrimitiveLogicalType::Time {
                unit: TimeUnit::Nanoseconds,
                is_adjusted_to_utc: false
            })
        )
        .is_err());
    }
}
