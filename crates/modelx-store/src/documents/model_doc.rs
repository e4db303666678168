//! Model document
//!
//! `<Model QualifiedName=".."><Members><Member Name=".."><Value Type=".." ../></Member></Members></Model>`
//!
//! Member values always embed their type; it is the only place a Member's
//! declared type is persisted.

use modelx_core::ops::model_ops;
use modelx_core::{Model, Project, Value};

use super::QUALIFIED_NAME;
use crate::codec::names::VALUE;
use crate::codec::{encode_value, ValueDecoder};
use crate::errors::{integrity_error, type_mismatch, Result};
use crate::xml::Element;

const MODEL: &str = "Model";
const MEMBERS: &str = "Members";
const MEMBER: &str = "Member";
const NAME: &str = "Name";

/// # Errors
/// * `TypeMismatch` - a default does not have its Member's declared type
/// * `InvalidInput` - a default is nested deeper than `max_depth`
pub fn write_model(model: &Model, max_depth: usize) -> Result<Element> {
    let mut members = Element::new(MEMBERS);
    for member in &model.members {
        if !member.default.conforms_to(&member.ty) {
            return Err(type_mismatch(&member.ty, member.default.type_descriptor())
                .with_qualified_name(model.qualified_name.as_str()));
        }
        members.push_child(
            Element::new(MEMBER)
                .with_attr(NAME, member.name.as_str())
                .with_child(
                    encode_value(&member.default, true, max_depth)
                        .map_err(|e| e.with_qualified_name(model.qualified_name.as_str()))?,
                ),
        );
    }

    Ok(Element::new(MODEL)
        .with_attr(QUALIFIED_NAME, model.qualified_name.as_str())
        .with_child(members))
}

/// Append the Members listed in a Model document to the skeleton Model
///
/// Returns the number of Members added.
///
/// # Errors
/// * `Integrity` - the document describes another Model, or a reference does not resolve
/// * `Parse` / `UnsupportedType` - malformed document or value
/// * `AlreadyExists` - a Member is listed twice or already present
pub fn read_model(
    project: &mut Project,
    expected: &str,
    root: &Element,
    max_depth: usize,
) -> Result<usize> {
    root.expect_name(MODEL)?;
    let declared = root.require_attr(QUALIFIED_NAME)?;
    if declared != expected {
        return Err(integrity_error(
            expected,
            format!("document declares model {}", declared),
        ));
    }
    project.get_model(expected)?;

    let members = {
        let decoder = ValueDecoder::new(&*project, max_depth);
        root.require_child(MEMBERS)?
            .children_named(MEMBER)?
            .into_iter()
            .map(|node| {
                let name = node.require_attr(NAME)?;
                let value = decoder.decode(node.require_child(VALUE)?, None)?;
                Ok((name.to_string(), value))
            })
            .collect::<Result<Vec<(String, Value)>>>()
            .map_err(|e| e.with_qualified_name(expected))?
    };

    let count = members.len();
    for (name, default) in members {
        model_ops::add_member(project, expected, &name, default)?;
    }
    Ok(count)
}
