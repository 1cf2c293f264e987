use crate::error::{Error, Result};
use crate::format::SchemaElement;
use crate::schema::io_thrift::{from_thrift, to_thrift};
use crate::schema::types::{ParquetType, PhysicalType};
use crate::schema::Repetition;

use super::column_descriptor::ColumnDescriptor;

/// A schema descriptor. This encapsulates the top-level schema of a file
/// together with a [`ColumnDescriptor`] per primitive (leaf) column, in
/// depth-first order.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    name: String,
    // The top-level schema (the "message" type).
    fields: Vec<ParquetType>,

    // All descriptors of the primitive columns, derived from `fields`.
    leaves: Vec<ColumnDescriptor>,
}

impl SchemaDescriptor {
    /// Creates a new schema descriptor from a root name and its fields.
    pub fn new(name: String, fields: Vec<ParquetType>) -> Self {
        let mut leaves = vec![];
        // element 0 is the root itself
        let mut element_index = 1;
        for field in &fields {
            let mut path = vec![];
            build_tree(field, 0, 0, &mut element_index, &mut leaves, &mut path);
        }

        Self {
            name,
            fields,
            leaves,
        }
    }

    /// Returns the [`ColumnDescriptor`] of the `i`th leaf.
    pub fn column(&self, i: usize) -> &ColumnDescriptor {
        &self.leaves[i]
    }

    /// Returns the leaf [`ColumnDescriptor`]s, in depth-first order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.leaves
    }

    /// Returns the number of leaf-level columns.
    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// Returns the root's fields.
    pub fn fields(&self) -> &[ParquetType] {
        &self.fields
    }

    /// Returns the schema's root name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_thrift(&self) -> Result<Vec<SchemaElement>> {
        to_thrift(&ParquetType::new_root(
            self.name.clone(),
            self.fields.clone(),
        ))
    }

    pub(crate) fn try_from_thrift(elements: &[SchemaElement]) -> Result<Self> {
        let root = from_thrift(elements)?;
        match root {
            ParquetType::GroupType {
                basic_info, fields, ..
            } => Ok(Self::new(basic_info.name().to_string(), fields)),
            ParquetType::PrimitiveType { .. } => {
                Err(Error::InvalidSchema("the root cannot be a leaf".into()))
            }
        }
    }
}

fn build_tree<'a>(
    tp: &'a ParquetType,
    mut max_rep_level: i16,
    mut max_def_level: i16,
    element_index: &mut usize,
    leaves: &mut Vec<ColumnDescriptor>,
    path_so_far: &mut Vec<&'a str>,
) {
    path_so_far.push(tp.name());
    match tp.get_basic_info().repetition() {
        Repetition::Optional => {
            max_def_level += 1;
        }
        Repetition::Repeated => {
            max_def_level += 1;
            max_rep_level += 1;
        }
        Repetition::Required => {}
    }

    let this_element = *element_index;
    *element_index += 1;

    match tp {
        ParquetType::PrimitiveType { physical_type, .. } => {
            let path_in_schema = path_so_far.iter().copied().map(String::from).collect();
            leaves.push(ColumnDescriptor::new(
                tp.clone(),
                *physical_type,
                max_def_level,
                max_rep_level,
                path_in_schema,
                this_element,
            ));
        }
        ParquetType::GroupType { ref fields, .. } => {
            for field in fields {
                build_tree(
                    field,
                    max_rep_level,
                    max_def_level,
                    element_index,
                    leaves,
                    path_so_far,
                );
                path_so_far.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_of_flat_schema() {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![
                ParquetType::try_from_primitive(
                    "required".to_string(),
                    PhysicalType::Int32,
                    Repetition::Required,
                    None,
                    None,
                    None,
                )
                .unwrap(),
                ParquetType::try_from_primitive(
                    "optional".to_string(),
                    PhysicalType::Int64,
                    Repetition::Optional,
                    None,
                    None,
                    None,
                )
                .unwrap(),
                ParquetType::try_from_primitive(
                    "repeated".to_string(),
                    PhysicalType::Double,
                    Repetition::Repeated,
                    None,
                    None,
                    None,
                )
                .unwrap(),
            ],
        );

        assert_eq!(schema.num_columns(), 3);
        assert_eq!(schema.column(0).max_def_level(), 0);
        assert_eq!(schema.column(0).max_rep_level(), 0);
        assert_eq!(schema.column(1).max_def_level(), 1);
        assert_eq!(schema.column(1).max_rep_level(), 0);
        assert_eq!(schema.column(2).max_def_level(), 1);
        assert_eq!(schema.column(2).max_rep_level(), 1);
        assert_eq!(schema.column(1).path_in_schema(), &["optional".to_string()]);
        // element 0 is the root
        assert_eq!(schema.column(0).element_index(), 1);
        assert_eq!(schema.column(2).element_index(), 3);
    }

    #[test]
    fn nested_paths() {
        let schema = SchemaDescriptor::new(
            "schema".to_string(),
            vec![ParquetType::try_from_group(
                "point".to_string(),
                Repetition::Optional,
                None,
                None,
                vec![
                    ParquetType::from_physical("x".to_string(), PhysicalType::Double),
                    ParquetType::from_physical("y".to_string(), PhysicalType::Double),
                ],
                None,
            )
            .unwrap()],
        );

        assert_eq!(schema.num_columns(), 2);
        assert_eq!(
            schema.column(0).path_in_schema(),
            &["point".to_string(), "x".to_string()]
        );
        // optional group + optional leaf
        assert_eq!(schema.column(0).max_def_level(), 2);
        assert_eq!(schema.column(1).element_index(), 3);
    }
}
