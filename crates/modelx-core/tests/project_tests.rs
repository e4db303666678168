#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use modelx_core::errors::{ExError, ExErrorKind, ModelXError};
use modelx_core::ops::{instance_ops, model_ops, namespace_ops};
use modelx_core::{Project, TypeDescriptor, Value};

#[test]
fn test_sample_project_shape() {
    let project = common::sample_project();

    let namespaces: Vec<_> = project
        .namespaces()
        .iter()
        .map(|ns| ns.qualified_name.clone())
        .collect();
    assert_eq!(namespaces, vec!["one", "one.two"]);

    let model = project.get_model("one.two.model_one").unwrap();
    assert_eq!(model.members.len(), 6);
    assert_eq!(
        model.member("collection_int").unwrap().ty,
        TypeDescriptor::collection(TypeDescriptor::int())
    );

    let inst = project.get_instance("one.two.instance_one").unwrap();
    assert_eq!(inst.model, "one.two.model_one");
    assert_eq!(inst.field("int_mem").unwrap().value, Value::int(13));
    assert!(!inst.field("int_mem").unwrap().is_inheriting);
    assert!(inst.field("uint_mem").unwrap().is_inheriting);
}

#[test]
fn test_fields_stay_aligned_after_member_added() {
    let mut project = common::sample_project();
    model_ops::add_member(
        &mut project,
        "one.two.model_one",
        "late_mem",
        Value::string("late"),
    )
    .unwrap();

    let model = project.get_model("one.two.model_one").unwrap();
    let inst = project.get_instance("one.two.instance_one").unwrap();
    assert_eq!(model.members.len(), inst.fields.len());
    for (member, field) in model.members.iter().zip(&inst.fields) {
        assert_eq!(member.name, field.name);
        assert!(field.value.conforms_to(&member.ty));
    }
}

#[test]
fn test_nested_collections() {
    let mut project = Project::new();
    let model = model_ops::create_model(&mut project, "", "m").unwrap();

    let inner_ty = TypeDescriptor::collection(TypeDescriptor::string());
    let inner = Value::sequence(
        TypeDescriptor::string(),
        vec![Value::string("a"), Value::string("b")],
    )
    .unwrap();
    let outer = Value::sequence(inner_ty.clone(), vec![inner.clone(), inner]).unwrap();
    model_ops::add_member(&mut project, &model, "nested", outer).unwrap();

    let member = project.get_model(&model).unwrap().member("nested").unwrap();
    assert_eq!(member.ty, TypeDescriptor::collection(inner_ty));
    assert_eq!(member.ty.depth(), 2);
}

#[test]
fn test_references_between_instances() {
    let mut project = Project::new();
    let target_model = model_ops::create_model(&mut project, "", "target").unwrap();
    let target = instance_ops::create_instance(&mut project, "", "t", &target_model).unwrap();

    let holder_model = model_ops::create_model(&mut project, "", "holder").unwrap();
    model_ops::add_member(
        &mut project,
        &holder_model,
        "link",
        Value::reference(target_model.clone(), target.clone()),
    )
    .unwrap();
    let holder = instance_ops::create_instance(&mut project, "", "h", &holder_model).unwrap();

    assert_eq!(project.referrer_of(&target).as_deref(), Some("holder"));

    // Reference to an instance of the wrong model
    let err = instance_ops::set_field(
        &mut project,
        &holder,
        "link",
        Value::reference(target_model.clone(), holder.clone()),
    )
    .unwrap_err();
    assert!(matches!(err, ModelXError::ReferenceModelMismatch { .. }));
    assert_eq!(ExError::from(err).kind(), ExErrorKind::Integrity);
}

#[test]
fn test_remove_namespace_subtree() {
    let mut project = common::sample_project();
    namespace_ops::remove_namespace(&mut project, "one").unwrap();

    assert!(project.namespaces().is_empty());
    assert!(project.models().is_empty());
    assert!(project.instances().is_empty());
}

#[test]
fn test_error_kinds_for_tree_operations() {
    let mut project = common::sample_project();

    let err: ExError = model_ops::create_model(&mut project, "missing", "m")
        .unwrap_err()
        .into();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.code(), "ERR_NOT_FOUND");

    let err: ExError = model_ops::create_model(&mut project, "one.two", "model_one")
        .unwrap_err()
        .into();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    assert_eq!(err.qualified_name(), Some("one.two.model_one"));

    let err: ExError = instance_ops::set_field(
        &mut project,
        "one.two.instance_one",
        "bool_mem",
        Value::int(1),
    )
    .unwrap_err()
    .into();
    assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
}
