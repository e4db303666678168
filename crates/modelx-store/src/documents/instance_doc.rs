//! Instance document
//!
//! Field values never embed a type: the Member's declared type is
//! authoritative and is re-derived from the already loaded Model on read.

use modelx_core::ops::instance_ops;
use modelx_core::{qualified, Instance, Project, Value};

use super::{MODEL, QUALIFIED_NAME};
use crate::codec::names::VALUE;
use crate::codec::{encode_value, ValueDecoder};
use crate::errors::{integrity_error, parse_error, Result};
use crate::xml::Element;

const INSTANCE: &str = "Instance";
const FIELDS: &str = "Fields";
const FIELD: &str = "Field";
const NAME: &str = "Name";
const IS_INHERITING: &str = "IsInheriting";

/// # Errors
/// * `TypeMismatch` - a sequence value is heterogeneous
/// * `InvalidInput` - a value is nested deeper than `max_depth`
pub fn write_instance(instance: &Instance, max_depth: usize) -> Result<Element> {
    let mut fields = Element::new(FIELDS);
    for field in &instance.fields {
        fields.push_child(
            Element::new(FIELD)
                .with_attr(NAME, field.name.as_str())
                .with_attr(IS_INHERITING, field.is_inheriting.to_string())
                .with_child(encode_value(&field.value, false, max_depth)?),
        );
    }

    Ok(Element::new(INSTANCE)
        .with_attr(QUALIFIED_NAME, instance.qualified_name.as_str())
        .with_attr(MODEL, instance.model.as_str())
        .with_child(fields))
}

/// Overwrite the Fields of a skeleton Instance from its document
///
/// Fields are matched to Members by exact name, then by the last dotted
/// segment. Fields are never created. A missing `IsInheriting` keeps the
/// current flag. Returns the number of Fields overwritten.
///
/// # Errors
/// * `Integrity` - name or Model mismatch, unknown Field, unresolved reference
/// * `Parse` / `UnsupportedType` - malformed document or value
pub fn read_instance(
    project: &mut Project,
    expected: &str,
    root: &Element,
    max_depth: usize,
) -> Result<usize> {
    root.expect_name(INSTANCE)?;
    let declared = root.require_attr(QUALIFIED_NAME)?;
    if declared != expected {
        return Err(integrity_error(
            expected,
            format!("document declares instance {}", declared),
        ));
    }

    let model_name = project.get_instance(expected)?.model.clone();
    let declared_model = root.require_attr(MODEL)?;
    if declared_model != model_name {
        return Err(integrity_error(
            expected,
            format!(
                "document declares model {}, tree has {}",
                declared_model, model_name
            ),
        ));
    }

    let updates = {
        let model = project.get_model(&model_name)?;
        let decoder = ValueDecoder::new(&*project, max_depth);
        root.require_child(FIELDS)?
            .children_named(FIELD)?
            .into_iter()
            .map(|node| {
                let name = node.require_attr(NAME)?;
                let member = model
                    .member(name)
                    .or_else(|| model.member(qualified::basename(name)))
                    .ok_or_else(|| {
                        integrity_error(
                            expected,
                            format!("field {} has no member in {}", name, model_name),
                        )
                    })?;
                let value = decoder.decode(node.require_child(VALUE)?, Some(&member.ty))?;
                let inheriting = node.attr(IS_INHERITING).map(parse_flag).transpose()?;
                Ok((member.name.clone(), value, inheriting))
            })
            .collect::<Result<Vec<(String, Value, Option<bool>)>>>()
            .map_err(|e| e.with_qualified_name(expected))?
    };

    let count = updates.len();
    for (field, value, inheriting) in updates {
        let current = project
            .get_instance(expected)?
            .field(&field)
            .map(|f| f.is_inheriting)
            .ok_or_else(|| {
                integrity_error(expected, format!("instance has no field {}", field))
            })?;
        instance_ops::overwrite_field(
            project,
            expected,
            &field,
            value,
            inheriting.unwrap_or(current),
        )?;
    }
    Ok(count)
}

fn parse_flag(text: &str) -> Result<bool> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(parse_error(format!(
            "IsInheriting must be true or false, found '{}'",
            other
        ))),
    }
}
