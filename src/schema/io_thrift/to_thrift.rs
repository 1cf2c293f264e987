use crate::error::{Error, Result};
use crate::format::SchemaElement;
use crate::schema::types::{physical_type_to_type, ParquetType};

/// Flattens the schema tree into the thrift [`SchemaElement`] list, in
/// depth-first order.
pub fn to_thrift(schema: &ParquetType) -> Result<Vec<SchemaElement>> {
    if !schema.is_root() {
        return Err(Error::InvalidSchema(
            "only a root group can head the element list".into(),
        ));
    }
    let mut elements = vec![];
    flatten(schema, true, &mut elements);
    Ok(elements)
}

fn flatten(node: &ParquetType, is_root: bool, elements: &mut Vec<SchemaElement>) {
    match node {
        ParquetType::GroupType {
            basic_info,
            logical_type,
            converted_type,
            fields,
        } => {
            elements.push(SchemaElement {
                type_: None,
                type_length: None,
                repetition_type: if is_root {
                    None
                } else {
                    Some((*basic_info.repetition()).into())
                },
                name: basic_info.name().to_string(),
                num_children: Some(fields.len() as i32),
                converted_type: converted_type.map(|converted| converted.into()),
                scale: None,
                precision: None,
                field_id: basic_info.id(),
                logical_type: logical_type.map(|logical| logical.into()),
            });
            for field in fields {
                flatten(field, false, elements);
            }
        }
        ParquetType::PrimitiveType {
            basic_info,
            logical_type,
            converted_type,
            physical_type,
        } => {
            let (type_, type_length) = physical_type_to_type(physical_type);
            let converted: Option<(crate::format::ConvertedType, Option<(i32, i32)>)> =
                converted_type.map(|converted| converted.into());
            let (converted_type, decimal) = match converted {
                Some((converted, decimal)) => (Some(converted), decimal),
                None => (None, None),
            };
            elements.push(SchemaElement {
                type_: Some(type_),
                type_length,
                repetition_type: Some((*basic_info.repetition()).into()),
                name: basic_info.name().to_string(),
                num_children: None,
                converted_type,
                scale: decimal.map(|(_, scale)| scale),
                precision: decimal.map(|(precision, _)| precision),
                field_id: basic_info.id(),
                logical_type: logical_type.map(|logical| logical.into()),
            });
        }
    }
}
