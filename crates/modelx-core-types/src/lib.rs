//! Core types shared across ModelX crates
//!
//! This crate provides foundational types used by the error handling,
//! logging and persistence layers:
//!
//! - **Correlation types**: RequestId, ProjectId, RequestContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{ProjectId, RequestContext, RequestId};
