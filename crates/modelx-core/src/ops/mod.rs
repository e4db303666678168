pub mod instance_ops;
pub mod model_ops;
pub mod namespace_ops;
pub mod project;

pub use project::{InstanceResolver, Project};
