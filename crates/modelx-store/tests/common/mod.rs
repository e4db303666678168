use modelx_core::ops::{instance_ops, model_ops, namespace_ops};
use modelx_core::{Project, TypeDescriptor, Value};
use modelx_store::{ProjectRegistry, StoreOptions};
use std::path::Path;

/// Project with namespaces `one`, `two`, `three`, Model `one.model_one`
/// covering every primitive kind plus `collection_int`, and Instance
/// `one.instance_one` overriding `int_mem` to 13
#[allow(dead_code)]
pub fn scenario_project() -> Project {
    let mut project = Project::new();
    for ns in ["one", "two", "three"] {
        namespace_ops::create_namespace(&mut project, "", ns).unwrap();
    }

    let model = model_ops::create_model(&mut project, "one", "model_one").unwrap();
    let members = [
        ("int_mem", Value::int(64)),
        ("uint_mem", Value::uint(1024)),
        ("bool_mem", Value::bool(true)),
        ("string_mem", Value::string("some random string")),
        ("dec_mem", Value::decimal("14.32").unwrap()),
        ("collection_int", int_sequence(1..=6)),
    ];
    for (name, default) in members {
        model_ops::add_member(&mut project, &model, name, default).unwrap();
    }

    let inst = instance_ops::create_instance(&mut project, "one", "instance_one", &model).unwrap();
    instance_ops::set_field(&mut project, &inst, "int_mem", Value::int(13)).unwrap();

    project
}

#[allow(dead_code)]
pub fn int_sequence(range: impl IntoIterator<Item = i64>) -> Value {
    Value::sequence(
        TypeDescriptor::int(),
        range.into_iter().map(Value::int).collect(),
    )
    .unwrap()
}

/// Commit `project` to `dir` with default options
#[allow(dead_code)]
pub async fn commit_to(project: &Project, dir: &Path) -> modelx_store::CommitReport {
    let mut registry = ProjectRegistry::new(StoreOptions::default());
    registry.add(project, dir);
    registry.commit(project).await.unwrap()
}

/// Open `dir` into a fresh project with default options
#[allow(dead_code)]
pub async fn open_from(dir: &Path) -> Project {
    let mut project = Project::new();
    let mut registry = ProjectRegistry::new(StoreOptions::default());
    registry.add(&project, dir);
    registry.open(&mut project).await.unwrap();
    project
}
