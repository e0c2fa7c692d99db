//! Schema error taxonomy
//!
//! Every variant maps to a stable snake_case wire code via [`SchemaError::code`].
//! Parsing and validation fail fast: the first violation found is returned,
//! with nested failures preserved as chained causes.

use thiserror::Error;

/// Error domain reported for schema parsing and validation failures.
pub const SCHEMA_ERROR_DOMAIN: &str = "command_schema";

/// Errors produced by schema parsing and value validation.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("expected a JSON object")]
    JsonObjectExpected,

    #[error("required property missing: {name}")]
    PropertyMissing { name: String },

    #[error("property not permitted by schema: {name}")]
    UnknownProperty { name: String },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("out of range: {message}")]
    OutOfRange { message: String },

    #[error("unknown type: {name}")]
    UnknownType { name: String },

    #[error("invalid property definition: {message}")]
    InvalidPropertyDefinition {
        message: String,
        #[source]
        cause: Option<Box<SchemaError>>,
    },

    #[error("invalid object schema: {message}")]
    InvalidObjectSchema { message: String },

    #[error("invalid minimal role: {value}")]
    InvalidMinimalRole { value: String },
}

impl SchemaError {
    /// Stable wire code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::JsonObjectExpected => "json_object_expected",
            Self::PropertyMissing { .. } => "parameter_missing",
            Self::UnknownProperty { .. } => "unexpected_parameter",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::OutOfRange { .. } => "out_of_range",
            Self::UnknownType { .. } => "unknown_type",
            Self::InvalidPropertyDefinition { .. } => "invalid_parameter_definition",
            Self::InvalidObjectSchema { .. } => "invalid_object_schema",
            Self::InvalidMinimalRole { .. } => "invalid_minimal_role",
        }
    }

    /// Type disagreement between a value (or schema key) and the expected kind.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Malformed property definition with no deeper cause.
    pub fn invalid_property(message: impl Into<String>) -> Self {
        Self::InvalidPropertyDefinition {
            message: message.into(),
            cause: None,
        }
    }

    /// Malformed property definition wrapping the error that made it so.
    pub fn invalid_property_caused(message: impl Into<String>, cause: SchemaError) -> Self {
        Self::InvalidPropertyDefinition {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// The innermost chained cause, or `self` when nothing is chained.
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            Self::InvalidPropertyDefinition {
                cause: Some(inner), ..
            } => inner.root_cause(),
            other => other,
        }
    }
}
