//! Per-entity documents
//!
//! Each document converts between a part of the project tree and an
//! [`Element`](crate::xml::Element). Documents never touch the filesystem;
//! the coordinators own all I/O.

pub mod instance_doc;
pub mod model_doc;
pub mod toc;

pub use toc::TableOfContents;

pub(crate) const QUALIFIED_NAME: &str = "QualifiedName";
pub(crate) const MODEL: &str = "Model";
