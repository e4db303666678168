//! Closed type and value model
//!
//! `TypeDescriptor` and `Value` are exhaustive sum types: adding a primitive
//! kind is an enum change that every codec match must handle.

pub mod descriptor;
pub mod value;

pub use descriptor::{PrimitiveKind, TypeDescriptor};
pub use value::{Decimal, Scalar, Value};
