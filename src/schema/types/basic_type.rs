use super::Repetition;

/// Common type information of a node in the schema tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicTypeInfo {
    name: String,
    repetition: Repetition,
    id: Option<i32>,
    is_root: bool,
}

impl BasicTypeInfo {
    pub fn new(name: String, repetition: Repetition, id: Option<i32>, is_root: bool) -> Self {
        Self {
            name,
            repetition,
            id,
            is_root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repetition(&self) -> &Repetition {
        &self.repetition
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// Whether this node is the root of the schema. The root is always a
    /// group and carries no repetition of its own.
    pub fn is_root(&self) -> bool {
        self.is_root
    }
}
