pub mod instance;
pub mod namespace;
pub mod schema;

pub use instance::{Field, Instance};
pub use namespace::Namespace;
pub use schema::{Member, Model};
