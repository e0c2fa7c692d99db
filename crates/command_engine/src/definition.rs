//! Command definitions
//!
//! A definition describes one named command: its parameter schema (always
//! object-kinded), optional progress and results schemas, and an optional
//! minimal-role requirement. Definitions are immutable once the dictionary
//! finishes loading them and are shared with instances via `Arc`.

use command_schema::{Descriptor, Role, SchemaError};

/// Definition of one remotely-invocable command.
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    /// Package half of the fully-qualified name
    pub package: String,
    /// Command half of the fully-qualified name
    pub command: String,
    /// Parameter schema, object-kinded
    pub parameters: Descriptor,
    /// Progress schema; absent means the command reports no progress
    pub progress: Option<Descriptor>,
    /// Results schema; absent means the command produces no results
    pub results: Option<Descriptor>,
    /// Least-privileged caller role permitted to invoke this command
    pub minimal_role: Option<Role>,
}

impl CommandDefinition {
    /// Parse a command-definition document: `parameters` (required),
    /// `progress` and `results` (optional), `minimalRole` (optional). Each
    /// schema block is a bare property-name → schema map.
    pub fn from_document(
        package: &str,
        command: &str,
        doc: &serde_json::Value,
    ) -> Result<Self, SchemaError> {
        let map = doc.as_object().ok_or(SchemaError::JsonObjectExpected)?;

        let parameters_doc = map
            .get("parameters")
            .ok_or_else(|| SchemaError::PropertyMissing {
                name: "parameters".to_string(),
            })?;
        let parameters = schema_block(parameters_doc, "parameters")?;
        let progress = match map.get("progress") {
            None => None,
            Some(doc) => Some(schema_block(doc, "progress")?),
        };
        let results = match map.get("results") {
            None => None,
            Some(doc) => Some(schema_block(doc, "results")?),
        };

        let minimal_role = match map.get("minimalRole") {
            None => None,
            Some(serde_json::Value::String(role)) => Some(Role::parse(role)?),
            Some(other) => {
                return Err(SchemaError::InvalidMinimalRole {
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            package: package.to_string(),
            command: command.to_string(),
            parameters,
            progress,
            results,
            minimal_role,
        })
    }

    /// Fully-qualified `"package.command"` name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.package, self.command)
    }
}

fn schema_block(doc: &serde_json::Value, key: &str) -> Result<Descriptor, SchemaError> {
    if !doc.is_object() {
        return Err(SchemaError::InvalidObjectSchema {
            message: format!("'{}' must be an object schema", key),
        });
    }
    Descriptor::object_from_properties(doc)
}
