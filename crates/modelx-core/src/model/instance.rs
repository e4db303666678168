use crate::qualified;
use crate::types::Value;

/// Field - an Instance's value for one Member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name of the aligned Member
    pub name: String,

    pub value: Value,

    /// True while the Field tracks its Member's default
    pub is_inheriting: bool,
}

impl Field {
    /// A field that inherits the given default
    pub fn inheriting(name: String, default: Value) -> Self {
        Self {
            name,
            value: default,
            is_inheriting: true,
        }
    }
}

/// Instance - a set of Field values built against a Model
///
/// Invariant: field names and order equal the Model's member names and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub qualified_name: String,

    /// Qualified name of the owning Model
    pub model: String,

    pub fields: Vec<Field>,
}

impl Instance {
    pub fn new(qualified_name: String, model: String) -> Self {
        Self {
            qualified_name,
            model,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        qualified::basename(&self.qualified_name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}
