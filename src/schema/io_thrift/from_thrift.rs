use crate::error::{Error, Result};
use crate::format::SchemaElement;
use crate::schema::types::{type_to_physical_type, ParquetType};
use crate::schema::Repetition;

/// Builds the schema tree out of the flat list of thrift
/// [`SchemaElement`]s. The list is walked exactly once; child counts that
/// point past the end of the list are rejected.
pub fn from_thrift(elements: &[SchemaElement]) -> Result<ParquetType> {
    if elements.is_empty() {
        return Err(Error::InvalidSchema("the schema has no root".into()));
    }
    let root = &elements[0];
    let num_children = root.num_children.unwrap_or(0);
    if num_children < 0 {
        return Err(Error::InvalidSchema(
            "the root declares a negative number of children".into(),
        ));
    }
    if root.type_.is_some() {
        return Err(Error::InvalidSchema("the root cannot be a leaf".into()));
    }

    let mut index = 1;
    let mut fields = Vec::with_capacity(num_children as usize);
    for _ in 0..num_children {
        let (next, field) = parse_node(elements, index)?;
        fields.push(field);
        index = next;
    }
    if index != elements.len() {
        return Err(Error::InvalidSchema(format!(
            "the schema tree covers {} elements but the list holds {}",
            index,
            elements.len()
        )));
    }

    Ok(ParquetType::new_root(root.name.clone(), fields))
}

fn parse_node(elements: &[SchemaElement], index: usize) -> Result<(usize, ParquetType)> {
    let element = elements.get(index).ok_or_else(|| {
        Error::InvalidSchema("a group declares more children than the schema holds".into())
    })?;

    let repetition = element
        .repetition_type
        .ok_or_else(|| Error::InvalidSchema("a non-root field requires a repetition".into()))?;
    let repetition: Repetition = repetition.try_into()?;

    match element.num_children {
        None | Some(0) => {
            let type_ = element.type_.ok_or_else(|| {
                Error::InvalidSchema("a leaf field requires a physical type".into())
            })?;
            let physical_type = type_to_physical_type(type_, element.type_length)?;

            let converted_type = element
                .converted_type
                .map(|converted| {
                    let decimal = element
                        .scale
                        .zip(element.precision)
                        .map(|(scale, precision)| (precision, scale));
                    (converted, decimal).try_into()
                })
                .transpose()?;

            let logical_type = element
                .logical_type
                .map(|logical| logical.try_into())
                .transpose()?;

            let field = ParquetType::try_from_primitive(
                element.name.clone(),
                physical_type,
                repetition,
                converted_type,
                logical_type,
                element.field_id,
            )?;
            Ok((index + 1, field))
        }
        Some(children) => {
            if children < 0 {
                return Err(Error::InvalidSchema(
                    "a group declares a negative number of children".into(),
                ));
            }
            let mut next = index + 1;
            let mut fields = Vec::with_capacity(children as usize);
            for _ in 0..children {
                let (after, field) = parse_node(elements, next)?;
                fields.push(field);
                next = after;
            }

            let converted_type = element
                .converted_type
                .map(|converted| converted.try_into())
                .transpose()?;
            let logical_type = element
                .logical_type
                .map(|logical| logical.try_into())
                .transpose()?;

            let field = ParquetType::try_from_group(
                element.name.clone(),
                repetition,
                converted_type,
                logical_type,
                fields,
                element.field_id,
            )?;
            Ok((next, field))
        }
    }
}
