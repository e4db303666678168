use std::fmt;

/// Primitive scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Decimal,
    Int,
    UInt,
    String,
}

impl PrimitiveKind {
    /// All primitive kinds in declaration order
    pub const ALL: [PrimitiveKind; 5] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Decimal,
        PrimitiveKind::Int,
        PrimitiveKind::UInt,
        PrimitiveKind::String,
    ];

    /// Stable persisted tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Int => "int",
            PrimitiveKind::UInt => "uint",
            PrimitiveKind::String => "string",
        }
    }

    /// Inverse of [`PrimitiveKind::tag`]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Declared type of a Member (and therefore of the aligned Fields)
///
/// Collections nest without limit; a reference carries the qualified name of
/// the Model its target Instance must be built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Collection(Box<TypeDescriptor>),
    InstanceReference { target_model: String },
}

impl TypeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn decimal() -> Self {
        Self::primitive(PrimitiveKind::Decimal)
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveKind::Int)
    }

    pub fn uint() -> Self {
        Self::primitive(PrimitiveKind::UInt)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn collection(item_type: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(Box::new(item_type))
    }

    pub fn reference(target_model: impl Into<String>) -> Self {
        TypeDescriptor::InstanceReference {
            target_model: target_model.into(),
        }
    }

    /// Item type if this is a collection
    pub fn item_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Collection(item) => Some(item),
            _ => None,
        }
    }

    /// Number of collection layers (0 for primitives and references)
    pub fn depth(&self) -> usize {
        match self {
            TypeDescriptor::Collection(item) => 1 + item.depth(),
            _ => 0,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{}", kind),
            TypeDescriptor::Collection(item) => write!(f, "collection<{}>", item),
            TypeDescriptor::InstanceReference { target_model } => {
                write!(f, "reference<{}>", target_model)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_tag("float"), None);
    }

    #[test]
    fn test_display_nested() {
        let ty = TypeDescriptor::collection(TypeDescriptor::collection(TypeDescriptor::string()));
        assert_eq!(ty.to_string(), "collection<collection<string>>");
        assert_eq!(ty.depth(), 2);
        assert_eq!(
            TypeDescriptor::reference("one.model_one").to_string(),
            "reference<one.model_one>"
        );
    }

    #[test]
    fn test_item_type() {
        let ty = TypeDescriptor::collection(TypeDescriptor::int());
        assert_eq!(ty.item_type(), Some(&TypeDescriptor::int()));
        assert_eq!(TypeDescriptor::int().item_type(), None);
    }
}
