use std::collections::HashMap;

use modelx_core_types::ProjectId;

use crate::errors::{ModelXError, Result};
use crate::model::{Instance, Model, Namespace};
use crate::types::Value;

/// Resolves Instance references by qualified name
///
/// The value codec decodes references through this seam so it can be used
/// against any tree that can answer "which Model is this Instance built from".
pub trait InstanceResolver {
    /// Qualified name of the Model the Instance is built from, if it exists
    fn instance_model(&self, qualified_name: &str) -> Option<&str>;

    /// Check that `target_instance` exists and is built from `target_model`
    ///
    /// # Errors
    /// * `DanglingReference` - no such Instance
    /// * `ReferenceModelMismatch` - the Instance has another Model
    fn resolve_reference(&self, target_model: &str, target_instance: &str) -> Result<()> {
        match self.instance_model(target_instance) {
            None => Err(ModelXError::DanglingReference {
                instance: target_instance.to_string(),
            }),
            Some(found) if found != target_model => Err(ModelXError::ReferenceModelMismatch {
                instance: target_instance.to_string(),
                expected: target_model.to_string(),
                found: found.to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Resolve every reference nested in `value`
    fn check_references(&self, value: &Value) -> Result<()> {
        value
            .references()
            .into_iter()
            .try_for_each(|(model, instance)| self.resolve_reference(model, instance))
    }
}

/// In-memory project tree
///
/// Namespaces, Models and Instances are stored by qualified name; tree shape
/// and ordering live in each `Namespace`'s child lists. Not thread-safe.
#[derive(Debug, Clone)]
pub struct Project {
    id: ProjectId,
    pub(crate) namespaces: HashMap<String, Namespace>,
    pub(crate) models: HashMap<String, Model>,
    pub(crate) instances: HashMap<String, Instance>,
}

impl Project {
    /// Create an empty project holding only the root namespace
    pub fn new() -> Self {
        let mut namespaces = HashMap::new();
        namespaces.insert(String::new(), Namespace::new(String::new()));
        Self {
            id: ProjectId::new(),
            namespaces,
            models: HashMap::new(),
            instances: HashMap::new(),
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn root(&self) -> &Namespace {
        // Root is inserted in new() and can never be removed
        &self.namespaces[""]
    }

    pub fn find_namespace(&self, qualified_name: &str) -> Option<&Namespace> {
        self.namespaces.get(qualified_name)
    }

    pub fn find_model(&self, qualified_name: &str) -> Option<&Model> {
        self.models.get(qualified_name)
    }

    pub fn find_instance(&self, qualified_name: &str) -> Option<&Instance> {
        self.instances.get(qualified_name)
    }

    /// # Errors
    /// * `NamespaceNotFound`
    pub fn get_namespace(&self, qualified_name: &str) -> Result<&Namespace> {
        self.namespaces
            .get(qualified_name)
            .ok_or_else(|| ModelXError::NamespaceNotFound {
                qualified_name: qualified_name.to_string(),
            })
    }

    /// # Errors
    /// * `ModelNotFound`
    pub fn get_model(&self, qualified_name: &str) -> Result<&Model> {
        self.models
            .get(qualified_name)
            .ok_or_else(|| ModelXError::ModelNotFound {
                qualified_name: qualified_name.to_string(),
            })
    }

    /// # Errors
    /// * `InstanceNotFound`
    pub fn get_instance(&self, qualified_name: &str) -> Result<&Instance> {
        self.instances
            .get(qualified_name)
            .ok_or_else(|| ModelXError::InstanceNotFound {
                qualified_name: qualified_name.to_string(),
            })
    }

    pub(crate) fn namespace_mut(&mut self, qualified_name: &str) -> Result<&mut Namespace> {
        self.namespaces
            .get_mut(qualified_name)
            .ok_or_else(|| ModelXError::NamespaceNotFound {
                qualified_name: qualified_name.to_string(),
            })
    }

    pub(crate) fn model_mut(&mut self, qualified_name: &str) -> Result<&mut Model> {
        self.models
            .get_mut(qualified_name)
            .ok_or_else(|| ModelXError::ModelNotFound {
                qualified_name: qualified_name.to_string(),
            })
    }

    pub(crate) fn instance_mut(&mut self, qualified_name: &str) -> Result<&mut Instance> {
        self.instances
            .get_mut(qualified_name)
            .ok_or_else(|| ModelXError::InstanceNotFound {
                qualified_name: qualified_name.to_string(),
            })
    }

    /// Whether any entity kind already uses this qualified name
    pub fn is_name_taken(&self, qualified_name: &str) -> bool {
        self.namespaces.contains_key(qualified_name)
            || self.models.contains_key(qualified_name)
            || self.instances.contains_key(qualified_name)
    }

    /// All namespaces except the root, depth-first in creation order
    pub fn namespaces(&self) -> Vec<&Namespace> {
        self.walk().into_iter().filter(|ns| !ns.is_root()).collect()
    }

    /// All models, in the order their namespaces are walked
    pub fn models(&self) -> Vec<&Model> {
        self.walk()
            .into_iter()
            .flat_map(|ns| ns.models.iter())
            .filter_map(|qn| self.models.get(qn))
            .collect()
    }

    /// All instances, in the order their namespaces are walked
    pub fn instances(&self) -> Vec<&Instance> {
        self.walk()
            .into_iter()
            .flat_map(|ns| ns.instances.iter())
            .filter_map(|qn| self.instances.get(qn))
            .collect()
    }

    /// Instances built from the given model, in tree order
    pub fn instances_of(&self, model: &str) -> Vec<&Instance> {
        self.instances()
            .into_iter()
            .filter(|inst| inst.model == model)
            .collect()
    }

    /// First entity (member default or field) holding a reference to `instance`
    pub fn referrer_of(&self, instance: &str) -> Option<String> {
        let refers = |value: &Value| value.references().iter().any(|(_, i)| *i == instance);

        self.models()
            .into_iter()
            .find(|m| m.members.iter().any(|mem| refers(&mem.default)))
            .map(|m| m.qualified_name.clone())
            .or_else(|| {
                self.instances()
                    .into_iter()
                    .find(|i| i.fields.iter().any(|f| refers(&f.value)))
                    .map(|i| i.qualified_name.clone())
            })
    }

    fn walk(&self) -> Vec<&Namespace> {
        let mut out = Vec::with_capacity(self.namespaces.len());
        let mut stack = vec![self.root()];
        while let Some(ns) = stack.pop() {
            out.push(ns);
            // Reverse so the first child is visited first
            stack.extend(
                ns.children
                    .iter()
                    .rev()
                    .filter_map(|qn| self.namespaces.get(qn)),
            );
        }
        out
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceResolver for Project {
    fn instance_model(&self, qualified_name: &str) -> Option<&str> {
        self.instances
            .get(qualified_name)
            .map(|inst| inst.model.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project() {
        let project = Project::new();
        assert!(project.root().is_root());
        assert!(project.namespaces().is_empty());
        assert!(project.models().is_empty());
        assert!(project.instances().is_empty());
    }

    #[test]
    fn test_get_missing_entities() {
        let project = Project::new();
        assert!(matches!(
            project.get_model("nope"),
            Err(ModelXError::ModelNotFound { .. })
        ));
        assert!(matches!(
            project.get_instance("nope"),
            Err(ModelXError::InstanceNotFound { .. })
        ));
        assert!(project.get_namespace("").is_ok());
    }

    #[test]
    fn test_resolve_reference_errors() {
        let mut project = Project::new();
        project.instances.insert(
            "i".to_string(),
            Instance::new("i".to_string(), "m".to_string()),
        );

        assert!(project.resolve_reference("m", "i").is_ok());
        assert!(matches!(
            project.resolve_reference("other", "i"),
            Err(ModelXError::ReferenceModelMismatch { .. })
        ));
        assert!(matches!(
            project.resolve_reference("m", "missing"),
            Err(ModelXError::DanglingReference { .. })
        ));
    }
}
