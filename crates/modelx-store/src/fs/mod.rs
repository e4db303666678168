//! Filesystem primitives used by the coordinators

pub mod atomic;
pub mod walk;

pub use atomic::atomic_write;
pub use walk::{prune_empty_parents, snapshot_files};
