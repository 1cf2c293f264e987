use crate::schema::types::{ParquetType, PhysicalType};

/// A descriptor of a leaf-level primitive column.
/// This encapsulates the maximum definition and repetition levels and is
/// used to decode and re-assemble (possibly nested) data.
#[derive(Debug, PartialEq, Clone)]
pub struct ColumnDescriptor {
    // The "leaf" primitive type of this column
    primitive_type: ParquetType,

    physical_type: PhysicalType,

    // The maximum definition level for this column
    max_def_level: i16,

    // The maximum repetition level for this column
    max_rep_level: i16,

    // The path of this column, from the root's children down to the leaf.
    path_in_schema: Vec<String>,

    // Position of this leaf's element in the flattened schema.
    element_index: usize,
}

impl ColumnDescriptor {
    /// Creates a new descriptor for a leaf-level column.
    pub(crate) fn new(
        primitive_type: ParquetType,
        physical_type: PhysicalType,
        max_def_level: i16,
        max_rep_level: i16,
        path_in_schema: Vec<String>,
        element_index: usize,
    ) -> Self {
        Self {
            primitive_type,
            physical_type,
            max_def_level,
            max_rep_level,
            path_in_schema,
            element_index,
        }
    }

    /// Returns the maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// Returns the maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    /// The path of this column, from the root's children down to the leaf.
    pub fn path_in_schema(&self) -> &[String] {
        &self.path_in_schema
    }

    /// Position of this leaf's element in the flattened schema.
    pub fn element_index(&self) -> usize {
        self.element_index
    }

    /// Returns this leaf's [`ParquetType`].
    pub fn type_(&self) -> &ParquetType {
        &self.primitive_type
    }

    /// Returns this leaf's [`PhysicalType`].
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        self.primitive_type.name()
    }
}
