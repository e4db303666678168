use std::fmt;
use std::str::FromStr;

use super::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::errors::{ModelXError, Result};

/// Decimal literal kept as its exact text
///
/// Accepts `[-+]?digits[.digits][(e|E)[-+]?digits]`. No numeric conversion is
/// ever applied, so precision is whatever the literal carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Parse and validate a decimal literal
    ///
    /// # Errors
    /// * `InvalidLiteral` - text is not a decimal number
    pub fn parse(literal: &str) -> Result<Self> {
        if is_decimal_literal(literal) {
            Ok(Self(literal.to_string()))
        } else {
            Err(ModelXError::InvalidLiteral {
                kind: PrimitiveKind::Decimal.tag().to_string(),
                literal: literal.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Decimal {
    type Err = ModelXError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_decimal_literal(s: &str) -> bool {
    fn digits(s: &str) -> usize {
        s.bytes().take_while(u8::is_ascii_digit).count()
    }

    let s = s.strip_prefix(['-', '+']).unwrap_or(s);
    let int_len = digits(s);
    if int_len == 0 {
        return false;
    }
    let mut rest = &s[int_len..];

    if let Some(frac) = rest.strip_prefix('.') {
        let frac_len = digits(frac);
        if frac_len == 0 {
            return false;
        }
        rest = &frac[frac_len..];
    }

    if let Some(exp) = rest.strip_prefix(['e', 'E']) {
        let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
        let exp_len = digits(exp);
        if exp_len == 0 {
            return false;
        }
        rest = &exp[exp_len..];
    }

    rest.is_empty()
}

/// A primitive value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Bool(bool),
    Decimal(Decimal),
    Int(i64),
    UInt(u64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Scalar::Bool(_) => PrimitiveKind::Bool,
            Scalar::Decimal(_) => PrimitiveKind::Decimal,
            Scalar::Int(_) => PrimitiveKind::Int,
            Scalar::UInt(_) => PrimitiveKind::UInt,
            Scalar::String(_) => PrimitiveKind::String,
        }
    }

    /// Canonical text form (`true`/`false` for booleans, strings verbatim)
    pub fn literal(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Decimal(d) => d.as_str().to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }

    /// Parse a literal back into the given primitive kind
    ///
    /// # Errors
    /// * `InvalidLiteral` - the text is not valid for `kind`
    pub fn parse(kind: PrimitiveKind, literal: &str) -> Result<Self> {
        let invalid = || ModelXError::InvalidLiteral {
            kind: kind.tag().to_string(),
            literal: literal.to_string(),
        };

        match kind {
            PrimitiveKind::Bool => match literal {
                "true" => Ok(Scalar::Bool(true)),
                "false" => Ok(Scalar::Bool(false)),
                _ => Err(invalid()),
            },
            PrimitiveKind::Decimal => Decimal::parse(literal).map(Scalar::Decimal),
            PrimitiveKind::Int => literal.parse().map(Scalar::Int).map_err(|_| invalid()),
            PrimitiveKind::UInt => literal.parse().map(Scalar::UInt).map_err(|_| invalid()),
            PrimitiveKind::String => Ok(Scalar::String(literal.to_string())),
        }
    }
}

/// A typed value
///
/// Sequences carry their item type so that an empty sequence still knows what
/// it holds; references carry the Model their target must be built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Scalar(Scalar),
    Sequence {
        item_type: TypeDescriptor,
        items: Vec<Value>,
    },
    Reference {
        target_model: String,
        target_instance: String,
    },
}

impl Value {
    pub fn bool(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Value::Scalar(Scalar::Int(value))
    }

    pub fn uint(value: u64) -> Self {
        Value::Scalar(Scalar::UInt(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(value.into()))
    }

    /// Decimal from its literal text
    ///
    /// # Errors
    /// * `InvalidLiteral` - text is not a decimal number
    pub fn decimal(literal: &str) -> Result<Self> {
        Decimal::parse(literal).map(|d| Value::Scalar(Scalar::Decimal(d)))
    }

    pub fn empty_sequence(item_type: TypeDescriptor) -> Self {
        Value::Sequence {
            item_type,
            items: Vec::new(),
        }
    }

    /// Build a homogeneous sequence
    ///
    /// # Errors
    /// * `HeterogeneousSequence` - an element does not conform to `item_type`
    pub fn sequence(item_type: TypeDescriptor, items: Vec<Value>) -> Result<Self> {
        check_items(&item_type, &items)?;
        Ok(Value::Sequence { item_type, items })
    }

    pub fn reference(target_model: impl Into<String>, target_instance: impl Into<String>) -> Self {
        Value::Reference {
            target_model: target_model.into(),
            target_instance: target_instance.into(),
        }
    }

    /// Append an element to a sequence
    ///
    /// # Errors
    /// * `TypeMismatch` - `self` is not a sequence
    /// * `HeterogeneousSequence` - `item` does not conform to the item type
    pub fn push(&mut self, item: Value) -> Result<()> {
        match self {
            Value::Sequence { item_type, items } => {
                if !item.conforms_to(item_type) {
                    return Err(ModelXError::HeterogeneousSequence {
                        index: items.len(),
                        expected: item_type.to_string(),
                        found: item.type_descriptor().to_string(),
                    });
                }
                items.push(item);
                Ok(())
            }
            other => Err(ModelXError::TypeMismatch {
                expected: "collection".to_string(),
                found: other.type_descriptor().to_string(),
            }),
        }
    }

    /// Runtime type of this value
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Value::Scalar(scalar) => TypeDescriptor::Primitive(scalar.kind()),
            Value::Sequence { item_type, .. } => TypeDescriptor::collection(item_type.clone()),
            Value::Reference { target_model, .. } => TypeDescriptor::reference(target_model),
        }
    }

    /// Whether this value (and every nested element) has type `ty`
    pub fn conforms_to(&self, ty: &TypeDescriptor) -> bool {
        match (self, ty) {
            (Value::Scalar(scalar), TypeDescriptor::Primitive(kind)) => scalar.kind() == *kind,
            (Value::Sequence { item_type, items }, TypeDescriptor::Collection(expected)) => {
                item_type == expected.as_ref() && items.iter().all(|v| v.conforms_to(expected))
            }
            (
                Value::Reference { target_model, .. },
                TypeDescriptor::InstanceReference {
                    target_model: expected,
                },
            ) => target_model == expected,
            _ => false,
        }
    }

    /// Require this value to have type `ty`
    ///
    /// # Errors
    /// * `TypeMismatch` - the value has another type
    pub fn check_type(&self, ty: &TypeDescriptor) -> Result<()> {
        if self.conforms_to(ty) {
            Ok(())
        } else {
            Err(ModelXError::TypeMismatch {
                expected: ty.to_string(),
                found: self.type_descriptor().to_string(),
            })
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Every `(target_model, target_instance)` pair reachable from this value
    pub fn references(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        collect_references(self, &mut out);
        out
    }
}

fn check_items(item_type: &TypeDescriptor, items: &[Value]) -> Result<()> {
    match items
        .iter()
        .enumerate()
        .find(|(_, item)| !item.conforms_to(item_type))
    {
        Some((index, item)) => Err(ModelXError::HeterogeneousSequence {
            index,
            expected: item_type.to_string(),
            found: item.type_descriptor().to_string(),
        }),
        None => Ok(()),
    }
}

fn collect_references<'a>(value: &'a Value, out: &mut Vec<(&'a str, &'a str)>) {
    match value {
        Value::Scalar(_) => {}
        Value::Sequence { items, .. } => {
            for item in items {
                collect_references(item, out);
            }
        }
        Value::Reference {
            target_model,
            target_instance,
        } => out.push((target_model, target_instance)),
    }
}
