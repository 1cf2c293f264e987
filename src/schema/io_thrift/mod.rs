mod from_thrift;
mod to_thrift;

pub use from_thrift::from_thrift;
pub use to_thrift::to_thrift;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::schema::types::{ParquetType, PhysicalType, PrimitiveLogicalType};
    use crate::schema::Repetition;

    #[test]
    fn round_trip() -> Result<()> {
        let tree = ParquetType::new_root(
            "schema".to_string(),
            vec![
                ParquetType::try_from_primitive(
                    "id".to_string(),
                    PhysicalType::Int64,
                    Repetition::Required,
                    None,
                    None,
                    Some(1),
                )?,
                ParquetType::try_from_primitive(
                    "name".to_string(),
                    PhysicalType::ByteArray,
                    Repetition::Optional,
                    None,
                    Some(PrimitiveLogicalType::String),
                    Some(2),
                )?,
                ParquetType::try_from_group(
                    "point".to_string(),
                    Repetition::Optional,
                    None,
                    None,
                    vec![
                        ParquetType::from_physical("x".to_string(), PhysicalType::Double),
                        ParquetType::from_physical("y".to_string(), PhysicalType::Double),
                    ],
                    None,
                )?,
            ],
        );

        let elements = to_thrift(&tree)?;
        assert_eq!(elements.len(), 6);
        assert_eq!(elements[0].num_children, Some(3));

        let read = from_thrift(&elements)?;
        assert_eq!(read, tree);
        Ok(())
    }

    #[test]
    fn truncated_tree_is_an_error() -> Result<()> {
        let tree = ParquetType::new_root(
            "schema".to_string(),
            vec![ParquetType::from_physical(
                "x".to_string(),
                PhysicalType::Double,
            )],
        );
        let mut elements = to_thrift(&tree)?;
        // claim one more child than the list holds
        elements[0].num_children = Some(2);
        assert!(from_thrift(&elements).is_err());
        Ok(())
    }

    #[test]
    fn empty_schema_is_an_error() {
        assert!(from_thrift(&[]).is_err());
    }
}
