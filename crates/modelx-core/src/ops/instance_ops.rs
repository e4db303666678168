use super::project::{InstanceResolver, Project};
use crate::errors::{ModelXError, Result};
use crate::model::{Field, Instance};
use crate::qualified;
use crate::types::{TypeDescriptor, Value};

/// Create an Instance of a Model
///
/// One inheriting Field is created per Member, in Member order.
///
/// # Returns
/// The qualified name of the new Instance
///
/// # Errors
/// * `InvalidName` - `name` is empty or contains a separator
/// * `NamespaceNotFound` / `ModelNotFound`
/// * `AlreadyExists` - the qualified name is used by another entity
pub fn create_instance(
    project: &mut Project,
    namespace: &str,
    name: &str,
    model: &str,
) -> Result<String> {
    qualified::validate_segment(name)?;
    project.get_namespace(namespace)?;

    let qualified_name = qualified::join(namespace, name);
    if project.is_name_taken(&qualified_name) {
        return Err(ModelXError::AlreadyExists { qualified_name });
    }

    let fields = project
        .get_model(model)?
        .members
        .iter()
        .map(|m| Field::inheriting(m.name.clone(), m.default.clone()))
        .collect();

    let mut instance = Instance::new(qualified_name.clone(), model.to_string());
    instance.fields = fields;

    project.instances.insert(qualified_name.clone(), instance);
    project
        .namespace_mut(namespace)?
        .instances
        .push(qualified_name.clone());

    Ok(qualified_name)
}

/// Explicitly assign a Field value
///
/// Always clears `is_inheriting`, even if `value` equals the current default.
/// Use [`reset_field`] to make the Field inherit again.
///
/// # Errors
/// * `InstanceNotFound` / `FieldNotFound`
/// * `TypeMismatch` - `value` does not have the Member's declared type
/// * `DanglingReference` / `ReferenceModelMismatch` - unresolved reference
pub fn set_field(project: &mut Project, instance: &str, field: &str, value: Value) -> Result<()> {
    let declared = declared_type(project, instance, field)?;
    value.check_type(&declared)?;
    project.check_references(&value)?;

    overwrite_field(project, instance, field, value, false)
}

/// Make a Field inherit its Member's current default again
///
/// # Errors
/// * `InstanceNotFound` / `FieldNotFound` / `MemberNotFound`
pub fn reset_field(project: &mut Project, instance: &str, field: &str) -> Result<()> {
    let model = project.get_instance(instance)?.model.clone();
    let default = project
        .get_model(&model)?
        .member(field)
        .ok_or_else(|| ModelXError::MemberNotFound {
            model: model.clone(),
            member: field.to_string(),
        })?
        .default
        .clone();

    overwrite_field(project, instance, field, default, true)
}

/// Store a Field value and inheritance flag without type checks
///
/// Used when restoring a persisted Instance; never creates a Field.
///
/// # Errors
/// * `InstanceNotFound` / `FieldNotFound`
pub fn overwrite_field(
    project: &mut Project,
    instance: &str,
    field: &str,
    value: Value,
    is_inheriting: bool,
) -> Result<()> {
    let slot = project
        .instance_mut(instance)?
        .field_mut(field)
        .ok_or_else(|| ModelXError::FieldNotFound {
            instance: instance.to_string(),
            field: field.to_string(),
        })?;

    slot.value = value;
    slot.is_inheriting = is_inheriting;
    Ok(())
}

/// Remove an Instance
///
/// # Errors
/// * `InstanceNotFound` - no such Instance
/// * `InstanceInUse` - a member default or field still references it
pub fn remove_instance(project: &mut Project, instance: &str) -> Result<()> {
    project.get_instance(instance)?;
    if let Some(referrer) = project.referrer_of(instance) {
        return Err(ModelXError::InstanceInUse {
            instance: instance.to_string(),
            referrer,
        });
    }

    project.instances.remove(instance);
    project
        .namespace_mut(qualified::parent(instance))?
        .instances
        .retain(|i| i != instance);

    Ok(())
}

fn declared_type(project: &Project, instance: &str, field: &str) -> Result<TypeDescriptor> {
    let model = &project.get_instance(instance)?.model;
    project
        .get_model(model)?
        .member(field)
        .map(|m| m.ty.clone())
        .ok_or_else(|| ModelXError::FieldNotFound {
            instance: instance.to_string(),
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::model_ops::{add_member, create_model, set_member_default};

    fn setup() -> (Project, String, String) {
        let mut project = Project::new();
        let model = create_model(&mut project, "", "model_one").unwrap();
        add_member(&mut project, &model, "int_mem", Value::int(64)).unwrap();
        add_member(&mut project, &model, "bool_mem", Value::bool(true)).unwrap();
        let inst = create_instance(&mut project, "", "instance_one", &model).unwrap();
        (project, model, inst)
    }

    #[test]
    fn test_instance_fields_align_with_members() {
        let (project, model, inst) = setup();
        let members: Vec<_> = project
            .get_model(&model)
            .unwrap()
            .members
            .iter()
            .map(|m| m.name.clone())
            .collect();
        let fields: Vec<_> = project
            .get_instance(&inst)
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.clone())
            .collect();

        assert_eq!(members, fields);
        assert!(project
            .get_instance(&inst)
            .unwrap()
            .fields
            .iter()
            .all(|f| f.is_inheriting));
    }

    #[test]
    fn test_set_field_overrides() {
        let (mut project, _, inst) = setup();
        set_field(&mut project, &inst, "int_mem", Value::int(13)).unwrap();

        let field = project.get_instance(&inst).unwrap().field("int_mem").unwrap();
        assert_eq!(field.value, Value::int(13));
        assert!(!field.is_inheriting);
    }

    #[test]
    fn test_set_field_to_default_value_still_overrides() {
        let (mut project, _, inst) = setup();
        set_field(&mut project, &inst, "int_mem", Value::int(64)).unwrap();

        let field = project.get_instance(&inst).unwrap().field("int_mem").unwrap();
        assert!(!field.is_inheriting);
    }

    #[test]
    fn test_reset_field_restores_inheritance() {
        let (mut project, model, inst) = setup();
        set_field(&mut project, &inst, "int_mem", Value::int(13)).unwrap();
        set_member_default(&mut project, &model, "int_mem", Value::int(99)).unwrap();

        // Overridden field ignores the new default
        assert_eq!(
            project.get_instance(&inst).unwrap().field("int_mem").unwrap().value,
            Value::int(13)
        );

        reset_field(&mut project, &inst, "int_mem").unwrap();

        let field = project.get_instance(&inst).unwrap().field("int_mem").unwrap();
        assert_eq!(field.value, Value::int(99));
        assert!(field.is_inheriting);
    }

    #[test]
    fn test_inheriting_field_follows_default() {
        let (mut project, model, inst) = setup();
        set_member_default(&mut project, &model, "bool_mem", Value::bool(false)).unwrap();

        let field = project.get_instance(&inst).unwrap().field("bool_mem").unwrap();
        assert_eq!(field.value, Value::bool(false));
        assert!(field.is_inheriting);
    }

    #[test]
    fn test_set_field_type_mismatch() {
        let (mut project, _, inst) = setup();
        let result = set_field(&mut project, &inst, "int_mem", Value::string("13"));

        assert!(matches!(result, Err(ModelXError::TypeMismatch { .. })));
    }

    #[test]
    fn test_unknown_field() {
        let (mut project, _, inst) = setup();
        let result = set_field(&mut project, &inst, "nope", Value::int(1));

        assert!(matches!(result, Err(ModelXError::FieldNotFound { .. })));
    }

    #[test]
    fn test_remove_referenced_instance_fails() {
        let (mut project, model, inst) = setup();
        add_member(
            &mut project,
            &model,
            "link",
            Value::reference(model.clone(), inst.clone()),
        )
        .unwrap();

        assert!(matches!(
            remove_instance(&mut project, &inst),
            Err(ModelXError::InstanceInUse { .. })
        ));
    }

    #[test]
    fn test_remove_instance() {
        let (mut project, _, inst) = setup();
        remove_instance(&mut project, &inst).unwrap();

        assert!(project.find_instance(&inst).is_none());
        assert!(project.root().instances.is_empty());
    }
}
