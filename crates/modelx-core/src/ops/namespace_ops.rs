use std::collections::HashSet;

use super::project::Project;
use crate::errors::{ModelXError, Result};
use crate::model::Namespace;
use crate::qualified;

/// Create a child namespace
///
/// # Returns
/// The qualified name of the new namespace
///
/// # Errors
/// * `InvalidName` - `name` is empty or contains a separator
/// * `NamespaceNotFound` - `parent` does not exist
/// * `AlreadyExists` - the qualified name is used by another entity
pub fn create_namespace(project: &mut Project, parent: &str, name: &str) -> Result<String> {
    qualified::validate_segment(name)?;
    project.get_namespace(parent)?;

    let qualified_name = qualified::join(parent, name);
    if project.is_name_taken(&qualified_name) {
        return Err(ModelXError::AlreadyExists { qualified_name });
    }

    project
        .namespaces
        .insert(qualified_name.clone(), Namespace::new(qualified_name.clone()));
    project
        .namespace_mut(parent)?
        .children
        .push(qualified_name.clone());

    Ok(qualified_name)
}

/// Make sure a namespace path exists, creating missing intermediates
///
/// Idempotent. The empty name is the root and always exists.
///
/// # Errors
/// * `InvalidName` - a segment is invalid
/// * `AlreadyExists` - a segment is already a Model or Instance
pub fn ensure_namespace(project: &mut Project, qualified_name: &str) -> Result<()> {
    let mut current = String::new();
    for segment in qualified::segments(qualified_name) {
        let next = qualified::join(&current, segment);
        if project.find_namespace(&next).is_none() {
            create_namespace(project, &current, segment)?;
        }
        current = next;
    }
    Ok(())
}

/// Remove a namespace and everything below it
///
/// # Errors
/// * `CannotRemoveRoot` - `qualified_name` is the root
/// * `NamespaceNotFound` - no such namespace
/// * `ModelInUse` - an Instance outside the subtree is built from a Model inside it
/// * `InstanceInUse` - an entity outside the subtree references an Instance inside it
pub fn remove_namespace(project: &mut Project, qualified_name: &str) -> Result<()> {
    if qualified_name.is_empty() {
        return Err(ModelXError::CannotRemoveRoot);
    }
    project.get_namespace(qualified_name)?;

    let subtree = collect_subtree(project, qualified_name);
    let models: HashSet<&str> = subtree
        .iter()
        .flat_map(|ns| project.namespaces[ns.as_str()].models.iter())
        .map(String::as_str)
        .collect();
    let instances: HashSet<&str> = subtree
        .iter()
        .flat_map(|ns| project.namespaces[ns.as_str()].instances.iter())
        .map(String::as_str)
        .collect();

    if let Some(outside) = project.instances().into_iter().find(|i| {
        !instances.contains(i.qualified_name.as_str()) && models.contains(i.model.as_str())
    }) {
        return Err(ModelXError::ModelInUse {
            model: outside.model.clone(),
            instance: outside.qualified_name.clone(),
        });
    }

    for instance in &instances {
        let outside_referrer = project
            .models()
            .into_iter()
            .filter(|m| !models.contains(m.qualified_name.as_str()))
            .find(|m| {
                m.members
                    .iter()
                    .any(|mem| mem.default.references().iter().any(|(_, i)| i == instance))
            })
            .map(|m| m.qualified_name.clone())
            .or_else(|| {
                project
                    .instances()
                    .into_iter()
                    .filter(|i| !instances.contains(i.qualified_name.as_str()))
                    .find(|i| {
                        i.fields
                            .iter()
                            .any(|f| f.value.references().iter().any(|(_, t)| t == instance))
                    })
                    .map(|i| i.qualified_name.clone())
            });
        if let Some(referrer) = outside_referrer {
            return Err(ModelXError::InstanceInUse {
                instance: instance.to_string(),
                referrer,
            });
        }
    }

    let models: Vec<String> = models.into_iter().map(str::to_string).collect();
    let instances: Vec<String> = instances.into_iter().map(str::to_string).collect();
    for qn in instances {
        project.instances.remove(&qn);
    }
    for qn in models {
        project.models.remove(&qn);
    }
    for qn in &subtree {
        project.namespaces.remove(qn);
    }

    let parent = qualified::parent(qualified_name);
    project
        .namespace_mut(parent)?
        .children
        .retain(|c| c != qualified_name);

    Ok(())
}

fn collect_subtree(project: &Project, qualified_name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![qualified_name.to_string()];
    while let Some(qn) = stack.pop() {
        if let Some(ns) = project.find_namespace(&qn) {
            stack.extend(ns.children.iter().cloned());
        }
        out.push(qn);
    }
    out
}
