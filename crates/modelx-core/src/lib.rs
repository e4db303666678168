//! ModelX Core - in-memory project tree
//!
//! This crate provides the host-side data model persisted by `modelx-store`:
//! - Namespaces, Models (ordered Members with typed defaults) and Instances
//!   (ordered Fields with an inheritance flag)
//! - The closed type system: primitives, homogeneous collections and
//!   instance references
//! - Tree operations that keep Instance fields aligned with Model members
//! - The shared error facility and structured logging macros

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod qualified;
pub mod types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ModelXError, Result};
pub use model::{Field, Instance, Member, Model, Namespace};
pub use ops::{InstanceResolver, Project};
pub use types::{Decimal, PrimitiveKind, Scalar, TypeDescriptor, Value};
