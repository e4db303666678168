//! Value codec
//!
//! Scalars keep their exact literal text, sequences write one `<Value/>` per
//! element under `<Items>`, references write the target Instance's qualified
//! name. Type information is embedded only when asked for; sequence elements
//! never carry it.

use modelx_core::{InstanceResolver, Scalar, TypeDescriptor, Value};

use super::names::{INSTANCE, ITEMS, LITERAL, VALUE};
use super::types::{nesting, read_type, write_type};
use crate::errors::{depth_exceeded, integrity_error, parse_error, type_mismatch, Result};
use crate::xml::Element;

/// Encode a value as a `<Value>` node
///
/// Sequence elements are re-checked against the item type so a
/// heterogeneous sequence can never reach disk. Collections nested deeper
/// than `max_depth` are refused here with the same bound the decoder
/// applies, so everything that encodes can be read back.
///
/// # Errors
/// * `TypeMismatch` - a sequence element does not conform to the item type
/// * `InvalidInput` - collection nesting deeper than `max_depth`
pub fn encode_value(value: &Value, include_type_info: bool, max_depth: usize) -> Result<Element> {
    let ty = value.type_descriptor();
    if nesting(&ty) > max_depth {
        return Err(depth_exceeded(max_depth));
    }
    encode_checked(value, include_type_info)
}

fn encode_checked(value: &Value, include_type_info: bool) -> Result<Element> {
    let mut node = Element::new(VALUE);
    if include_type_info {
        write_type(&mut node, &value.type_descriptor());
    }

    match value {
        Value::Scalar(scalar) => node.set_attr(LITERAL, scalar.literal()),
        Value::Sequence { item_type, items } => {
            let mut list = Element::new(ITEMS);
            for item in items {
                if !item.conforms_to(item_type) {
                    return Err(type_mismatch(item_type, item.type_descriptor()));
                }
                list.push_child(encode_checked(item, false)?);
            }
            node.push_child(list);
        }
        Value::Reference {
            target_instance, ..
        } => node.set_attr(INSTANCE, target_instance.as_str()),
    }

    Ok(node)
}

/// Decodes `<Value>` nodes, resolving references against a project tree
pub struct ValueDecoder<'a> {
    resolver: &'a dyn InstanceResolver,
    max_depth: usize,
}

impl<'a> ValueDecoder<'a> {
    pub fn new(resolver: &'a dyn InstanceResolver, max_depth: usize) -> Self {
        Self {
            resolver,
            max_depth,
        }
    }

    /// Decode a value node
    ///
    /// With `declared` the node's own type attributes are ignored; without it
    /// the type is read from the node.
    ///
    /// # Errors
    /// * `Parse` - malformed node, bad literal, or nesting deeper than allowed
    /// * `UnsupportedType` - unknown type tag
    /// * `Integrity` - a reference target is missing or of the wrong Model
    pub fn decode(&self, node: &Element, declared: Option<&TypeDescriptor>) -> Result<Value> {
        node.expect_name(VALUE)?;
        match declared {
            Some(ty) => self.decode_as(node, ty, 0),
            None => {
                let ty = read_type(node, self.max_depth)?;
                self.decode_as(node, &ty, 0)
            }
        }
    }

    fn decode_as(&self, node: &Element, ty: &TypeDescriptor, depth: usize) -> Result<Value> {
        if depth > self.max_depth {
            return Err(parse_error(format!(
                "value nesting exceeds maximum depth {}",
                self.max_depth
            )));
        }

        match ty {
            TypeDescriptor::Primitive(kind) => {
                let literal = node.require_attr(LITERAL)?;
                Scalar::parse(*kind, literal)
                    .map(Value::Scalar)
                    .map_err(|e| parse_error(e.to_string()))
            }
            TypeDescriptor::Collection(item_type) => {
                let items = node
                    .require_child(ITEMS)?
                    .children_named(VALUE)?
                    .into_iter()
                    .map(|child| self.decode_as(child, item_type, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Sequence {
                    item_type: item_type.as_ref().clone(),
                    items,
                })
            }
            TypeDescriptor::InstanceReference { target_model } => {
                let target = node.require_attr(INSTANCE)?;
                self.resolver
                    .resolve_reference(target_model, target)
                    .map_err(|e| integrity_error(target, e.to_string()))?;
                Ok(Value::reference(target_model.as_str(), target))
            }
        }
    }
}
