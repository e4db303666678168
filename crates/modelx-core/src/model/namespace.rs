use crate::qualified;

/// Namespace - a node of the project tree
///
/// Children are held by qualified name; the entities themselves live in the
/// owning `Project`. Each list keeps creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Dot-separated path from the root (empty for the root)
    pub qualified_name: String,

    /// Child namespaces in creation order
    pub children: Vec<String>,

    /// Models declared directly in this namespace
    pub models: Vec<String>,

    /// Instances declared directly in this namespace
    pub instances: Vec<String>,
}

impl Namespace {
    pub fn new(qualified_name: String) -> Self {
        Self {
            qualified_name,
            children: Vec::new(),
            models: Vec::new(),
            instances: Vec::new(),
        }
    }

    /// Last segment of the qualified name
    pub fn name(&self) -> &str {
        qualified::basename(&self.qualified_name)
    }

    pub fn is_root(&self) -> bool {
        self.qualified_name.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.models.is_empty() && self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_namespace() {
        let ns = Namespace::new("one.two".to_string());
        assert_eq!(ns.name(), "two");
        assert!(!ns.is_root());
        assert!(ns.is_empty());
        assert!(Namespace::new(String::new()).is_root());
    }
}
