//! Tether - device-side command runtime
//!
//! This crate ties the command engine together for a device:
//! - a [`Device`] facade that loads command definitions, registers handlers,
//!   authorizes callers, and accepts inbound command documents
//! - a [`StatePropertySet`] that publishes name → typed-value device state
//!   with synchronous change notifications

// Re-export engine crates
pub use command_engine;
pub use command_schema;

mod device;
mod state;

pub use device::*;
pub use state::*;
