//! Command Engine - definitions, dictionary, and instance lifecycle
//!
//! This crate turns schema descriptors into a command catalogue: definitions
//! loaded from layered documents into a dictionary, and command instances
//! that validate inbound payloads and walk a guarded lifecycle state machine
//! until completion, error, or cancellation.
//!
//! Every operation is a synchronous computation over in-memory documents; the
//! surrounding dispatcher owns concurrency and serializes mutation per
//! instance.

pub use command_schema;

mod definition;
mod dictionary;
mod error;
mod instance;
mod state;

pub use definition::*;
pub use dictionary::*;
pub use error::*;
pub use instance::*;
pub use state::*;
