//! Table of contents document
//!
//! ```xml
//! <Project>
//!   <Namespaces><Namespace QualifiedName="one"/></Namespaces>
//!   <Models><Model QualifiedName="one.model_one"/></Models>
//!   <Instances><Instance QualifiedName="one.i" Model="one.model_one"/></Instances>
//! </Project>
//! ```

use modelx_core::ops::{instance_ops, model_ops, namespace_ops};
use modelx_core::{qualified, Project};

use super::{MODEL, QUALIFIED_NAME};
use crate::errors::{integrity_error, Result};
use crate::xml::Element;

const PROJECT: &str = "Project";
const NAMESPACES: &str = "Namespaces";
const NAMESPACE: &str = "Namespace";
const MODELS: &str = "Models";
const INSTANCES: &str = "Instances";
const INSTANCE: &str = "Instance";

/// Every entity of a project, in tree order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    pub namespaces: Vec<String>,
    pub models: Vec<String>,
    /// `(instance, model)` qualified-name pairs
    pub instances: Vec<(String, String)>,
}

impl TableOfContents {
    pub fn from_project(project: &Project) -> Self {
        Self {
            namespaces: project
                .namespaces()
                .iter()
                .map(|ns| ns.qualified_name.clone())
                .collect(),
            models: project
                .models()
                .iter()
                .map(|m| m.qualified_name.clone())
                .collect(),
            instances: project
                .instances()
                .iter()
                .map(|i| (i.qualified_name.clone(), i.model.clone()))
                .collect(),
        }
    }

    pub fn to_element(&self) -> Element {
        let namespaces = self.namespaces.iter().fold(Element::new(NAMESPACES), |el, qn| {
            el.with_child(Element::new(NAMESPACE).with_attr(QUALIFIED_NAME, qn.as_str()))
        });
        let models = self.models.iter().fold(Element::new(MODELS), |el, qn| {
            el.with_child(Element::new(MODEL).with_attr(QUALIFIED_NAME, qn.as_str()))
        });
        let instances = self
            .instances
            .iter()
            .fold(Element::new(INSTANCES), |el, (qn, model)| {
                el.with_child(
                    Element::new(INSTANCE)
                        .with_attr(QUALIFIED_NAME, qn.as_str())
                        .with_attr(MODEL, model.as_str()),
                )
            });

        Element::new(PROJECT)
            .with_child(namespaces)
            .with_child(models)
            .with_child(instances)
    }

    /// # Errors
    /// * `Parse` - unexpected element, missing list or attribute
    pub fn from_element(root: &Element) -> Result<Self> {
        root.expect_name(PROJECT)?;

        let namespaces = root
            .require_child(NAMESPACES)?
            .children_named(NAMESPACE)?
            .into_iter()
            .map(|el| el.require_attr(QUALIFIED_NAME).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        let models = root
            .require_child(MODELS)?
            .children_named(MODEL)?
            .into_iter()
            .map(|el| el.require_attr(QUALIFIED_NAME).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        let instances = root
            .require_child(INSTANCES)?
            .children_named(INSTANCE)?
            .into_iter()
            .map(|el| {
                Ok((
                    el.require_attr(QUALIFIED_NAME)?.to_string(),
                    el.require_attr(MODEL)?.to_string(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            namespaces,
            models,
            instances,
        })
    }

    /// Rebuild the skeleton tree: namespaces, then empty Models, then
    /// Instances bound to their Models
    ///
    /// # Errors
    /// * `Integrity` - an Instance names a Model that is not listed
    /// * `AlreadyExists` - a Model or Instance is already in the tree
    /// * `InvalidInput` - a qualified name has an invalid segment
    pub fn apply(&self, project: &mut Project) -> Result<()> {
        for qn in &self.namespaces {
            namespace_ops::ensure_namespace(project, qn)?;
        }

        for qn in &self.models {
            let parent = qualified::parent(qn);
            namespace_ops::ensure_namespace(project, parent)?;
            model_ops::create_model(project, parent, qualified::basename(qn))?;
        }

        for (qn, model) in &self.instances {
            if project.find_model(model).is_none() {
                return Err(integrity_error(
                    qn,
                    format!("instance model {} not found", model),
                ));
            }
            let parent = qualified::parent(qn);
            namespace_ops::ensure_namespace(project, parent)?;
            instance_ops::create_instance(project, parent, qualified::basename(qn), model)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelx_core::ExErrorKind;

    fn sample() -> TableOfContents {
        TableOfContents {
            namespaces: vec!["one".into(), "one.two".into(), "three".into()],
            models: vec!["one.two.model_one".into()],
            instances: vec![("one.two.instance_one".into(), "one.two.model_one".into())],
        }
    }

    #[test]
    fn test_element_shape() {
        let root = sample().to_element();
        assert_eq!(root.name, "Project");
        let instance = &root.child("Instances").unwrap().children[0];
        assert_eq!(instance.attr("QualifiedName"), Some("one.two.instance_one"));
        assert_eq!(instance.attr("Model"), Some("one.two.model_one"));

        assert_eq!(TableOfContents::from_element(&root).unwrap(), sample());
    }

    #[test]
    fn test_apply_builds_skeleton() {
        let mut project = Project::new();
        sample().apply(&mut project).unwrap();

        assert!(project.find_namespace("three").is_some());
        assert!(project.get_model("one.two.model_one").unwrap().members.is_empty());
        assert_eq!(
            project.get_instance("one.two.instance_one").unwrap().model,
            "one.two.model_one"
        );
        assert_eq!(TableOfContents::from_project(&project), sample());
    }

    #[test]
    fn test_apply_creates_missing_parents() {
        let toc = TableOfContents {
            namespaces: vec![],
            models: vec!["a.b.m".into()],
            instances: vec![],
        };
        let mut project = Project::new();
        toc.apply(&mut project).unwrap();

        assert!(project.find_namespace("a").is_some());
        assert!(project.find_namespace("a.b").is_some());
    }

    #[test]
    fn test_unknown_model_is_integrity_error() {
        let toc = TableOfContents {
            namespaces: vec![],
            models: vec![],
            instances: vec![("i".into(), "missing".into())],
        };
        let err = toc.apply(&mut Project::new()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Integrity);
    }

    #[test]
    fn test_existing_model_is_rejected() {
        let mut project = Project::new();
        sample().apply(&mut project).unwrap();

        let err = sample().apply(&mut project).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[test]
    fn test_missing_list_is_parse_error() {
        let root = Element::new("Project").with_child(Element::new("Namespaces"));
        let err = TableOfContents::from_element(&root).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
    }
}
