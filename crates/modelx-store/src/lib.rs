//! ModelX Store - XML persistence for project trees
//!
//! Provides:
//! - Deterministic qualified-name to document path mapping
//! - Type and value codecs over a small XML element layer
//! - Table of contents, Model and Instance documents
//! - Commit (write all, then delete orphans) and ordered open coordinators
//! - A registry binding projects to directories

pub mod codec;
pub mod commit;
pub mod config;
pub mod documents;
pub mod errors;
pub mod fs;
pub mod open;
pub mod path_mapper;
pub mod registry;
pub mod xml;

// Re-export key types
pub use commit::{commit, CommitReport};
pub use config::StoreOptions;
pub use errors::Result;
pub use open::{open, OpenReport};
pub use path_mapper::{path_for, EntityKind, TOC_FILE};
pub use registry::ProjectRegistry;
