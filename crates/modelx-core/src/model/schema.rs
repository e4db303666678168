use crate::qualified;
use crate::types::{TypeDescriptor, Value};

/// Member - a named, typed slot of a Model with its default value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,

    /// Declared type; authoritative for every aligned Field
    pub ty: TypeDescriptor,

    /// Value inherited by Fields that were never overridden
    pub default: Value,
}

impl Member {
    /// Create a member whose declared type is the default's runtime type
    pub fn new(name: String, default: Value) -> Self {
        Self {
            ty: default.type_descriptor(),
            name,
            default,
        }
    }
}

/// Model - an ordered list of Members that Instances are built from
///
/// Member order defines Field alignment for every Instance of the Model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub qualified_name: String,
    pub members: Vec<Member>,
}

impl Model {
    pub fn new(qualified_name: String) -> Self {
        Self {
            qualified_name,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        qualified::basename(&self.qualified_name)
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }
}
