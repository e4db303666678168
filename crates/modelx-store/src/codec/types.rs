//! TypeDescriptor codec
//!
//! A type is written as attributes on the node that carries it:
//! `Type="int"`, `Type="reference" Model="one.m"`, or `Type="collection"`
//! with a nested `<ItemType/>` child describing the item type.

use modelx_core::{PrimitiveKind, TypeDescriptor};

use super::names::{COLLECTION_TAG, ITEM_TYPE, MODEL, REFERENCE_TAG, TYPE};
use crate::errors::{parse_error, unsupported_type, Result};
use crate::xml::Element;

/// Write `ty` onto `node`
pub fn write_type(node: &mut Element, ty: &TypeDescriptor) {
    match ty {
        TypeDescriptor::Primitive(kind) => node.set_attr(TYPE, kind.tag()),
        TypeDescriptor::Collection(item) => {
            node.set_attr(TYPE, COLLECTION_TAG);
            let mut item_node = Element::new(ITEM_TYPE);
            write_type(&mut item_node, item);
            node.push_child(item_node);
        }
        TypeDescriptor::InstanceReference { target_model } => {
            node.set_attr(TYPE, REFERENCE_TAG);
            node.set_attr(MODEL, target_model.as_str());
        }
    }
}

/// Number of collection levels wrapping the innermost item type
///
/// This is the depth [`read_type`] compares against its `max_depth`.
pub fn nesting(ty: &TypeDescriptor) -> usize {
    match ty {
        TypeDescriptor::Collection(item) => 1 + nesting(item),
        _ => 0,
    }
}

/// Read the type carried by `node`
///
/// The target Model of a reference is kept as data and not resolved here.
///
/// # Errors
/// * `UnsupportedType` - unknown type tag
/// * `Parse` - missing attribute or `ItemType`, or nesting deeper than `max_depth`
pub fn read_type(node: &Element, max_depth: usize) -> Result<TypeDescriptor> {
    read_type_at(node, 0, max_depth)
}

fn read_type_at(node: &Element, depth: usize, max_depth: usize) -> Result<TypeDescriptor> {
    if depth > max_depth {
        return Err(parse_error(format!(
            "type nesting exceeds maximum depth {}",
            max_depth
        )));
    }

    let tag = node.require_attr(TYPE)?;
    match tag {
        COLLECTION_TAG => {
            let item = read_type_at(node.require_child(ITEM_TYPE)?, depth + 1, max_depth)?;
            Ok(TypeDescriptor::collection(item))
        }
        REFERENCE_TAG => Ok(TypeDescriptor::reference(node.require_attr(MODEL)?)),
        other => PrimitiveKind::from_tag(other)
            .map(TypeDescriptor::Primitive)
            .ok_or_else(|| unsupported_type(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelx_core::ExErrorKind;

    fn round_trip(ty: &TypeDescriptor) -> TypeDescriptor {
        let mut node = Element::new("Value");
        write_type(&mut node, ty);
        read_type(&node, 64).unwrap()
    }

    #[test]
    fn test_primitives() {
        for kind in PrimitiveKind::ALL {
            let ty = TypeDescriptor::Primitive(kind);
            assert_eq!(round_trip(&ty), ty);
        }
    }

    #[test]
    fn test_nested_collection_layout() {
        let ty = TypeDescriptor::collection(TypeDescriptor::collection(TypeDescriptor::string()));
        let mut node = Element::new("Value");
        write_type(&mut node, &ty);

        assert_eq!(node.attr("Type"), Some("collection"));
        let inner = node.child("ItemType").unwrap();
        assert_eq!(inner.attr("Type"), Some("collection"));
        assert_eq!(inner.child("ItemType").unwrap().attr("Type"), Some("string"));

        assert_eq!(read_type(&node, 64).unwrap(), ty);
    }

    #[test]
    fn test_reference_keeps_model() {
        let ty = TypeDescriptor::reference("one.model_one");
        let mut node = Element::new("Value");
        write_type(&mut node, &ty);

        assert_eq!(node.attr("Model"), Some("one.model_one"));
        assert_eq!(read_type(&node, 64).unwrap(), ty);
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        let node = Element::new("Value").with_attr("Type", "float");
        let err = read_type(&node, 64).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnsupportedType);
    }

    #[test]
    fn test_missing_item_type_is_parse_error() {
        let node = Element::new("Value").with_attr("Type", "collection");
        let err = read_type(&node, 64).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
    }

    #[test]
    fn test_depth_guard() {
        let ty = TypeDescriptor::collection(TypeDescriptor::collection(TypeDescriptor::int()));
        let mut node = Element::new("Value");
        write_type(&mut node, &ty);

        assert!(read_type(&node, 2).is_ok());
        assert_eq!(read_type(&node, 1).unwrap_err().kind(), ExErrorKind::Parse);
        assert_eq!(nesting(&ty), 2);
        assert_eq!(nesting(&TypeDescriptor::reference("one.m")), 0);
    }
}
