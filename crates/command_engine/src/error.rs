//! Engine error taxonomy
//!
//! Errors here are values returned from operations, never control flow for
//! expected outcomes. Chained causes stay available to callers through
//! `std::error::Error::source`; the externally serialized error object
//! collapses a chain to the outermost code and message.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use command_schema::{SCHEMA_ERROR_DOMAIN, SchemaError};

/// Error domain reported for command engine failures.
pub const COMMAND_ERROR_DOMAIN: &str = "command_engine";

/// Errors produced by dictionary loading and instance operations.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error("duplicate command definition: {name}")]
    DuplicateCommandDefinition { name: String },

    #[error("invalid command name: {name}")]
    InvalidCommandName { name: String },

    #[error("command parameters failed validation")]
    CommandFailed {
        #[source]
        cause: SchemaError,
    },

    #[error("operation illegal in the current state: {message}")]
    InvalidState { message: String },

    #[error("command has been destroyed")]
    CommandDestroyed,

    #[error("failed to load command definition '{name}'")]
    DefinitionLoad {
        name: String,
        #[source]
        cause: SchemaError,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CommandError {
    /// Stable wire code for this error kind. Context wrappers report the code
    /// of the schema failure they carry.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateCommandDefinition { .. } => "duplicate_command_definition",
            Self::InvalidCommandName { .. } => "invalid_command_name",
            Self::CommandFailed { .. } => "command_failed",
            Self::InvalidState { .. } => "invalid_state",
            Self::CommandDestroyed => "command_destroyed",
            Self::DefinitionLoad { cause, .. } => cause.code(),
            Self::Schema(cause) => cause.code(),
        }
    }

    /// Error domain this kind belongs to.
    pub fn domain(&self) -> &'static str {
        match self {
            Self::DefinitionLoad { .. } | Self::Schema(_) => SCHEMA_ERROR_DOMAIN,
            _ => COMMAND_ERROR_DOMAIN,
        }
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Info
// ─────────────────────────────────────────────────────────────────────────────

/// Error record attached to an aborted command: a domain, a code, and a
/// human-readable message. Inner chained causes are not preserved here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub domain: String,
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(
        domain: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Wire representation: only the code and message are exposed.
    pub fn to_document(&self) -> serde_json::Value {
        json!({
            "code": self.code,
            "message": self.message,
        })
    }
}

impl From<&CommandError> for ErrorInfo {
    /// Collapse an error (and any chain beneath it) to its outermost
    /// domain, code, and message.
    fn from(error: &CommandError) -> Self {
        Self::new(error.domain(), error.code(), error.to_string())
    }
}
