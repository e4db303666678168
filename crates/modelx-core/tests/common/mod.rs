use modelx_core::ops::{instance_ops, model_ops, namespace_ops};
use modelx_core::{Project, TypeDescriptor, Value};

/// Build the sample project used across scenario tests
///
/// Namespaces `one` and `one.two`, a Model `one.two.model_one` with one
/// Member per primitive kind plus an int collection, and an Instance
/// `one.two.instance_one` overriding `int_mem`.
#[allow(dead_code)]
pub fn sample_project() -> Project {
    let mut project = Project::new();
    namespace_ops::ensure_namespace(&mut project, "one.two").unwrap();

    let model = model_ops::create_model(&mut project, "one.two", "model_one").unwrap();
    model_ops::add_member(&mut project, &model, "int_mem", Value::int(64)).unwrap();
    model_ops::add_member(&mut project, &model, "uint_mem", Value::uint(1024)).unwrap();
    model_ops::add_member(&mut project, &model, "bool_mem", Value::bool(true)).unwrap();
    model_ops::add_member(
        &mut project,
        &model,
        "string_mem",
        Value::string("some random string"),
    )
    .unwrap();
    model_ops::add_member(
        &mut project,
        &model,
        "dec_mem",
        Value::decimal("14.32").unwrap(),
    )
    .unwrap();
    model_ops::add_member(&mut project, &model, "collection_int", int_sequence(1..=6)).unwrap();

    let inst =
        instance_ops::create_instance(&mut project, "one.two", "instance_one", &model).unwrap();
    instance_ops::set_field(&mut project, &inst, "int_mem", Value::int(13)).unwrap();

    project
}

/// Sequence of int values
#[allow(dead_code)]
pub fn int_sequence(range: impl IntoIterator<Item = i64>) -> Value {
    Value::sequence(
        TypeDescriptor::int(),
        range.into_iter().map(Value::int).collect(),
    )
    .unwrap()
}
