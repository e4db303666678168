use super::project::{InstanceResolver, Project};
use crate::errors::{ModelXError, Result};
use crate::model::{Field, Member, Model};
use crate::qualified;
use crate::types::Value;

/// Create an empty Model in a namespace
///
/// # Returns
/// The qualified name of the new Model
///
/// # Errors
/// * `InvalidName` - `name` is empty or contains a separator
/// * `NamespaceNotFound` - `namespace` does not exist
/// * `AlreadyExists` - the qualified name is used by another entity
pub fn create_model(project: &mut Project, namespace: &str, name: &str) -> Result<String> {
    qualified::validate_segment(name)?;
    project.get_namespace(namespace)?;

    let qualified_name = qualified::join(namespace, name);
    if project.is_name_taken(&qualified_name) {
        return Err(ModelXError::AlreadyExists { qualified_name });
    }

    project
        .models
        .insert(qualified_name.clone(), Model::new(qualified_name.clone()));
    project
        .namespace_mut(namespace)?
        .models
        .push(qualified_name.clone());

    Ok(qualified_name)
}

/// Append a Member to a Model
///
/// The declared type is the default's runtime type. Every existing Instance
/// of the Model gains an inheriting Field at the same position.
///
/// # Errors
/// * `ModelNotFound` - no such Model
/// * `InvalidName` - `name` is empty or contains a separator
/// * `DuplicateMember` - the Model already has a Member with this name
/// * `DanglingReference` / `ReferenceModelMismatch` - `default` holds an unresolved reference
pub fn add_member(project: &mut Project, model: &str, name: &str, default: Value) -> Result<()> {
    qualified::validate_segment(name)?;
    if project.get_model(model)?.member(name).is_some() {
        return Err(ModelXError::DuplicateMember {
            model: model.to_string(),
            member: name.to_string(),
        });
    }
    project.check_references(&default)?;

    let instances: Vec<String> = project
        .instances_of(model)
        .iter()
        .map(|i| i.qualified_name.clone())
        .collect();
    for qn in instances {
        project
            .instance_mut(&qn)?
            .fields
            .push(Field::inheriting(name.to_string(), default.clone()));
    }

    project
        .model_mut(model)?
        .members
        .push(Member::new(name.to_string(), default));

    Ok(())
}

/// Replace a Member's default value
///
/// Inheriting Fields of every Instance follow the new default; overridden
/// Fields are left alone.
///
/// # Errors
/// * `ModelNotFound` / `MemberNotFound`
/// * `TypeMismatch` - `default` does not have the Member's declared type
/// * `DanglingReference` / `ReferenceModelMismatch` - unresolved reference
pub fn set_member_default(
    project: &mut Project,
    model: &str,
    member: &str,
    default: Value,
) -> Result<()> {
    let declared = project
        .get_model(model)?
        .member(member)
        .ok_or_else(|| ModelXError::MemberNotFound {
            model: model.to_string(),
            member: member.to_string(),
        })?
        .ty
        .clone();
    default.check_type(&declared)?;
    project.check_references(&default)?;

    let instances: Vec<String> = project
        .instances_of(model)
        .iter()
        .map(|i| i.qualified_name.clone())
        .collect();
    for qn in instances {
        if let Some(field) = project.instance_mut(&qn)?.field_mut(member) {
            if field.is_inheriting {
                field.value = default.clone();
            }
        }
    }

    if let Some(slot) = project
        .model_mut(model)?
        .members
        .iter_mut()
        .find(|m| m.name == member)
    {
        slot.default = default;
    }

    Ok(())
}

/// Remove a Model
///
/// # Errors
/// * `ModelNotFound` - no such Model
/// * `ModelInUse` - an Instance is still built from it
pub fn remove_model(project: &mut Project, model: &str) -> Result<()> {
    project.get_model(model)?;
    if let Some(inst) = project.instances_of(model).first() {
        return Err(ModelXError::ModelInUse {
            model: model.to_string(),
            instance: inst.qualified_name.clone(),
        });
    }

    project.models.remove(model);
    project
        .namespace_mut(qualified::parent(model))?
        .models
        .retain(|m| m != model);

    Ok(())
}
