//! Command Schema - typed value model and schema descriptors
//!
//! This crate contains the pure data structures used to describe and validate
//! command payloads: a typed JSON-like value model, schema descriptors with
//! constraints, and the caller-role lattice. It performs no I/O and holds no
//! locks; everything here is synchronous computation over in-memory documents.

mod descriptor;
mod error;
mod role;
mod value;

pub use descriptor::*;
pub use error::*;
pub use role::*;
pub use value::*;
