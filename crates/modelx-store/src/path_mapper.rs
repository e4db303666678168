//! Qualified name to document path mapping
//!
//! Namespace segments become nested directories; the leaf segment is
//! prefixed with a per-kind marker so a Model and an Instance with the same
//! qualified name never share a file. All paths are relative to the project
//! directory.

use std::path::PathBuf;

use modelx_core::qualified;

/// Reserved table-of-contents document at the project root
pub const TOC_FILE: &str = "toc.xml";

const EXTENSION: &str = "xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Model,
    Instance,
}

impl EntityKind {
    fn marker(&self) -> &'static str {
        match self {
            EntityKind::Model => "m-",
            EntityKind::Instance => "i-",
        }
    }
}

/// Relative path of the document persisting `qualified_name`
///
/// Injective over valid qualified names: segments never contain `.` or a
/// path separator, so the marker and extension cannot be forged.
pub fn path_for(kind: EntityKind, qualified_name: &str) -> PathBuf {
    let mut path: PathBuf = qualified::segments(qualified::parent(qualified_name)).collect();
    path.push(format!(
        "{}{}.{}",
        kind.marker(),
        qualified::basename(qualified_name),
        EXTENSION
    ));
    path
}

pub fn toc_path() -> PathBuf {
    PathBuf::from(TOC_FILE)
}
