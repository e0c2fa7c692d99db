//! Schema descriptors - parsing and validation
//!
//! A [`Descriptor`] describes the shape a value must satisfy: a kind plus
//! kind-specific constraints, with an optional display name, default value,
//! and minimal-role requirement. Descriptors parse themselves from schema
//! documents and validate candidate values against themselves.
//!
//! Recognized schema keys: `type`, `displayName`, `default`, `items`,
//! `isRequired`, `minimum`, `maximum`, `minLength`, `maxLength`, `enum`,
//! `metadata`, `properties`, `additionalProperties`, `required`,
//! `minimalRole`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SchemaError;
use crate::role::Role;
use crate::value::Value;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Keys that constrain a specific kind; presence on any other kind is an error.
const CONSTRAINT_KEYS: &[&str] = &[
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
    "enum",
    "metadata",
    "items",
    "properties",
    "additionalProperties",
    "required",
];

// ─────────────────────────────────────────────────────────────────────────────
// Descriptor Types
// ─────────────────────────────────────────────────────────────────────────────

/// Enumerated string literals with optional per-value metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    /// Allowed literal values (at least one).
    pub values: Vec<String>,
    /// Optional metadata attached to the enumeration.
    pub metadata: Option<Value>,
}

/// Kind-specific shape and constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// Boolean value, no constraints
    Boolean,
    /// Integer with optional inclusive bounds
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    /// Floating-point number with optional inclusive bounds
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    /// String with optional length bounds and enumerated values
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        one_of: Option<OneOf>,
    },
    /// Homogeneous array
    Array { items: Box<Descriptor> },
    /// Object with declared properties
    Object {
        properties: BTreeMap<String, Descriptor>,
        required: BTreeSet<String>,
        additional_properties: bool,
    },
}

impl Kind {
    /// Kind name as it appears in schema documents and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::Integer { .. } => "integer",
            Kind::Number { .. } => "number",
            Kind::String { .. } => "string",
            Kind::Array { .. } => "array",
            Kind::Object { .. } => "object",
        }
    }
}

/// The shape a value must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Kind plus kind-specific constraints
    pub kind: Kind,
    /// Human-readable display name
    pub display_name: Option<String>,
    /// Default value; always satisfies the descriptor's own constraints
    pub default: Option<Value>,
    /// Least-privileged caller role permitted to write this value
    pub minimal_role: Option<Role>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

impl Descriptor {
    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            display_name: None,
            default: None,
            minimal_role: None,
        }
    }

    /// Object descriptor that accepts only an empty object.
    pub fn empty_object() -> Self {
        Self::with_kind(Kind::Object {
            properties: BTreeMap::new(),
            required: BTreeSet::new(),
            additional_properties: false,
        })
    }

    /// Parse a schema-definition document.
    ///
    /// A bare type-name string (`"integer"`) is shorthand for
    /// `{"type": "integer"}`. When `type` is absent it is inferred from the
    /// presence of a type-specific key where that is unambiguous.
    pub fn parse(doc: &serde_json::Value) -> Result<Self, SchemaError> {
        if let Some(name) = doc.as_str() {
            let kind = build_kind(name, &JsonMap::new())?;
            return Ok(Self::with_kind(kind));
        }
        let map = doc.as_object().ok_or(SchemaError::JsonObjectExpected)?;
        Self::parse_map(map)
    }

    /// Build an object descriptor from a bare property-name → schema map, the
    /// wire shape used by command parameter/progress/results blocks. Undeclared
    /// properties are not permitted.
    pub fn object_from_properties(doc: &serde_json::Value) -> Result<Self, SchemaError> {
        let (properties, required) = parse_properties(doc)?;
        Ok(Self::with_kind(Kind::Object {
            properties,
            required,
            additional_properties: false,
        }))
    }

    fn parse_map(map: &JsonMap) -> Result<Self, SchemaError> {
        let type_name = match map.get("type") {
            Some(serde_json::Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(SchemaError::type_mismatch("string", json_type_name(other)));
            }
            None => infer_type(map)?,
        };

        let kind = build_kind(&type_name, map)?;
        check_constraint_keys(&kind, map)?;

        let display_name = match map.get("displayName") {
            None => None,
            Some(serde_json::Value::String(name)) => Some(name.clone()),
            Some(other) => {
                return Err(SchemaError::type_mismatch("string", json_type_name(other)));
            }
        };

        let minimal_role = match map.get("minimalRole") {
            None => None,
            Some(serde_json::Value::String(role)) => Some(Role::parse(role)?),
            Some(other) => {
                return Err(SchemaError::InvalidMinimalRole {
                    value: json_type_name(other).to_string(),
                });
            }
        };

        let mut descriptor = Self {
            kind,
            display_name,
            default: None,
            minimal_role,
        };

        // A declared default must satisfy the descriptor's own constraints.
        if let Some(default_doc) = map.get("default") {
            let default = Value::from_json(default_doc)?;
            descriptor.validate(&default).map_err(|cause| {
                SchemaError::invalid_property_caused(
                    "default value does not satisfy the schema",
                    cause,
                )
            })?;
            descriptor.default = Some(default);
        }

        Ok(descriptor)
    }
}

/// Infer the type name from the presence of type-specific keys.
fn infer_type(map: &JsonMap) -> Result<String, SchemaError> {
    if map.contains_key("properties")
        || map.contains_key("additionalProperties")
        || map.contains_key("required")
    {
        return Ok("object".to_string());
    }
    if map.contains_key("items") {
        return Ok("array".to_string());
    }
    if map.contains_key("minLength") || map.contains_key("maxLength") {
        return Ok("string".to_string());
    }
    if let Some(entries) = map.get("enum") {
        return infer_enum_type(entries);
    }
    Err(SchemaError::UnknownType {
        name: "unspecified".to_string(),
    })
}

/// An enum can only imply the string kind; its entries must agree on a type.
fn infer_enum_type(entries: &serde_json::Value) -> Result<String, SchemaError> {
    let entry_type = check_enum_entries(entries)?;
    if entry_type != "string" {
        return Err(SchemaError::type_mismatch("string", entry_type));
    }
    Ok("string".to_string())
}

/// Validate enum entry agreement and return the shared entry type name.
fn check_enum_entries(entries: &serde_json::Value) -> Result<&'static str, SchemaError> {
    let entries = entries
        .as_array()
        .ok_or_else(|| SchemaError::type_mismatch("array", json_type_name(entries)))?;
    let Some(first) = entries.first() else {
        return Err(SchemaError::invalid_property(
            "enum must list at least one value",
        ));
    };
    let entry_type = json_type_name(first);
    for entry in entries {
        if json_type_name(entry) != entry_type {
            return Err(SchemaError::invalid_property(
                "enum entries must all share one type",
            ));
        }
    }
    Ok(entry_type)
}

fn build_kind(name: &str, map: &JsonMap) -> Result<Kind, SchemaError> {
    match name {
        "boolean" => Ok(Kind::Boolean),
        "integer" => Ok(Kind::Integer {
            minimum: int_key(map, "minimum")?,
            maximum: int_key(map, "maximum")?,
        }),
        "number" => Ok(Kind::Number {
            minimum: float_key(map, "minimum")?,
            maximum: float_key(map, "maximum")?,
        }),
        "string" => {
            let one_of = match map.get("enum") {
                None => None,
                Some(entries) => Some(parse_one_of(entries, map.get("metadata"))?),
            };
            Ok(Kind::String {
                min_length: length_key(map, "minLength")?,
                max_length: length_key(map, "maxLength")?,
                one_of,
            })
        }
        "array" => {
            let items_doc = map.get("items").ok_or_else(|| SchemaError::PropertyMissing {
                name: "items".to_string(),
            })?;
            let items = Descriptor::parse(items_doc).map_err(|cause| {
                SchemaError::invalid_property_caused("invalid array item schema", cause)
            })?;
            Ok(Kind::Array {
                items: Box::new(items),
            })
        }
        "object" => {
            let (properties, mut required) = match map.get("properties") {
                None => (BTreeMap::new(), BTreeSet::new()),
                Some(doc) => parse_properties(doc)?,
            };
            if let Some(required_doc) = map.get("required") {
                let names = required_doc.as_array().ok_or_else(|| {
                    SchemaError::type_mismatch("array", json_type_name(required_doc))
                })?;
                for name in names {
                    let name = name
                        .as_str()
                        .ok_or_else(|| SchemaError::type_mismatch("string", json_type_name(name)))?;
                    if !properties.contains_key(name) {
                        return Err(SchemaError::InvalidObjectSchema {
                            message: format!("required property '{}' is not declared", name),
                        });
                    }
                    required.insert(name.to_string());
                }
            }
            let additional_properties = match map.get("additionalProperties") {
                None => false,
                Some(flag) => flag
                    .as_bool()
                    .ok_or_else(|| SchemaError::type_mismatch("boolean", json_type_name(flag)))?,
            };
            Ok(Kind::Object {
                properties,
                required,
                additional_properties,
            })
        }
        other => Err(SchemaError::UnknownType {
            name: other.to_string(),
        }),
    }
}

fn parse_one_of(
    entries: &serde_json::Value,
    metadata: Option<&serde_json::Value>,
) -> Result<OneOf, SchemaError> {
    let entry_type = check_enum_entries(entries)?;
    if entry_type != "string" {
        return Err(SchemaError::type_mismatch("string", entry_type));
    }
    // check_enum_entries guarantees an array of strings here
    let values = entries
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.as_str().map(str::to_string))
        .collect();
    let metadata = match metadata {
        None => None,
        Some(doc) => Some(Value::from_json(doc)?),
    };
    Ok(OneOf { values, metadata })
}

/// Parse a property-name → schema map, honoring per-property `isRequired`.
fn parse_properties(
    doc: &serde_json::Value,
) -> Result<(BTreeMap<String, Descriptor>, BTreeSet<String>), SchemaError> {
    let map = doc.as_object().ok_or(SchemaError::JsonObjectExpected)?;
    let mut properties = BTreeMap::new();
    let mut required = BTreeSet::new();
    for (name, prop_doc) in map {
        let descriptor = Descriptor::parse(prop_doc).map_err(|cause| {
            SchemaError::invalid_property_caused(format!("property '{}'", name), cause)
        })?;
        if let Some(flag) = prop_doc.get("isRequired") {
            let flag = flag
                .as_bool()
                .ok_or_else(|| SchemaError::type_mismatch("boolean", json_type_name(flag)))?;
            if flag {
                required.insert(name.clone());
            }
        }
        properties.insert(name.clone(), descriptor);
    }
    Ok((properties, required))
}

/// Constraint keys are only legal on their matching kind.
fn check_constraint_keys(kind: &Kind, map: &JsonMap) -> Result<(), SchemaError> {
    let allowed: &[&str] = match kind {
        Kind::Boolean => &[],
        Kind::Integer { .. } | Kind::Number { .. } => &["minimum", "maximum"],
        Kind::String { .. } => &["minLength", "maxLength", "enum", "metadata"],
        Kind::Array { .. } => &["items"],
        Kind::Object { .. } => &["properties", "additionalProperties", "required"],
    };
    for key in map.keys() {
        if CONSTRAINT_KEYS.contains(&key.as_str()) && !allowed.contains(&key.as_str()) {
            return Err(SchemaError::type_mismatch(
                format!("a kind accepting '{}'", key),
                kind.name(),
            ));
        }
    }
    Ok(())
}

fn int_key(map: &JsonMap, key: &str) -> Result<Option<i64>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(doc) => match doc.as_i64() {
            Some(value) => Ok(Some(value)),
            None => Err(SchemaError::type_mismatch("integer", json_type_name(doc))),
        },
    }
}

fn float_key(map: &JsonMap, key: &str) -> Result<Option<f64>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(doc) => match doc.as_f64() {
            Some(value) => Ok(Some(value)),
            None => Err(SchemaError::type_mismatch("number", json_type_name(doc))),
        },
    }
}

fn length_key(map: &JsonMap, key: &str) -> Result<Option<usize>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(doc) => match doc.as_u64() {
            Some(value) => Ok(Some(value as usize)),
            None => Err(SchemaError::type_mismatch("integer", json_type_name(doc))),
        },
    }
}

fn json_type_name(doc: &serde_json::Value) -> &'static str {
    match doc {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

impl Descriptor {
    /// Validate a value against this descriptor.
    ///
    /// Never mutates the candidate and never applies defaults; default
    /// application is the explicit [`Descriptor::fill_defaults`] step.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        match (&self.kind, value) {
            (Kind::Boolean, Value::Bool(_)) => Ok(()),
            (Kind::Integer { minimum, maximum }, Value::Int(v)) => {
                if let Some(min) = minimum {
                    if v < min {
                        return Err(out_of_range(v, "below the minimum", min));
                    }
                }
                if let Some(max) = maximum {
                    if v > max {
                        return Err(out_of_range(v, "above the maximum", max));
                    }
                }
                Ok(())
            }
            // An integer satisfies a number schema; the reverse does not hold.
            (Kind::Number { minimum, maximum }, Value::Int(v)) => {
                check_number_range(*v as f64, *minimum, *maximum)
            }
            (Kind::Number { minimum, maximum }, Value::Float(v)) => {
                check_number_range(*v, *minimum, *maximum)
            }
            (
                Kind::String {
                    min_length,
                    max_length,
                    one_of,
                },
                Value::String(s),
            ) => {
                let length = s.chars().count();
                if let Some(min) = min_length {
                    if length < *min {
                        return Err(SchemaError::OutOfRange {
                            message: format!(
                                "string of length {} is shorter than the minimum {}",
                                length, min
                            ),
                        });
                    }
                }
                if let Some(max) = max_length {
                    if length > *max {
                        return Err(SchemaError::OutOfRange {
                            message: format!(
                                "string of length {} is longer than the maximum {}",
                                length, max
                            ),
                        });
                    }
                }
                if let Some(one_of) = one_of {
                    if !one_of.values.iter().any(|allowed| allowed == s) {
                        return Err(SchemaError::OutOfRange {
                            message: format!("'{}' is not one of the allowed values", s),
                        });
                    }
                }
                Ok(())
            }
            (Kind::Array { items }, Value::Array(elements)) => {
                // first failure wins
                for element in elements {
                    items.validate(element)?;
                }
                Ok(())
            }
            (
                Kind::Object {
                    properties,
                    required,
                    additional_properties,
                },
                Value::Object(fields),
            ) => {
                if !additional_properties {
                    for name in fields.keys() {
                        if !properties.contains_key(name) {
                            return Err(SchemaError::UnknownProperty { name: name.clone() });
                        }
                    }
                }
                for name in required {
                    if !fields.contains_key(name) {
                        return Err(SchemaError::PropertyMissing { name: name.clone() });
                    }
                }
                for (name, field) in fields {
                    if let Some(descriptor) = properties.get(name) {
                        descriptor.validate(field)?;
                    }
                }
                Ok(())
            }
            _ => Err(SchemaError::type_mismatch(
                self.kind.name(),
                value.type_name(),
            )),
        }
    }

    /// Fill missing properties that declare defaults into an object's fields.
    ///
    /// Only meaningful for object kinds; other kinds have no properties to
    /// fill. Performed by callers as an explicit step before validation.
    pub fn fill_defaults(&self, fields: &mut BTreeMap<String, Value>) {
        if let Kind::Object { properties, .. } = &self.kind {
            for (name, property) in properties {
                if !fields.contains_key(name) {
                    if let Some(default) = &property.default {
                        fields.insert(name.clone(), default.clone());
                    }
                }
            }
        }
    }

    /// Declared property descriptor, for object kinds.
    pub fn property(&self, name: &str) -> Option<&Descriptor> {
        match &self.kind {
            Kind::Object { properties, .. } => properties.get(name),
            _ => None,
        }
    }

    /// Whether undeclared properties are permitted, for object kinds.
    pub fn allows_additional_properties(&self) -> bool {
        matches!(
            &self.kind,
            Kind::Object {
                additional_properties: true,
                ..
            }
        )
    }

    /// Whether this descriptor is object-kinded.
    pub fn is_object(&self) -> bool {
        matches!(&self.kind, Kind::Object { .. })
    }
}

fn out_of_range(value: &i64, relation: &str, bound: &i64) -> SchemaError {
    SchemaError::OutOfRange {
        message: format!("{} is {} {}", value, relation, bound),
    }
}

fn check_number_range(
    value: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<(), SchemaError> {
    if let Some(min) = minimum {
        if value < min {
            return Err(SchemaError::OutOfRange {
                message: format!("{} is below the minimum {}", value, min),
            });
        }
    }
    if let Some(max) = maximum {
        if value > max {
            return Err(SchemaError::OutOfRange {
                message: format!("{} is above the maximum {}", value, max),
            });
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(doc: serde_json::Value) -> Descriptor {
        Descriptor::parse(&doc).unwrap()
    }

    fn parse_err(doc: serde_json::Value) -> SchemaError {
        Descriptor::parse(&doc).unwrap_err()
    }

    #[test]
    fn parses_full_integer_schema() {
        let descriptor = parse(json!({"type": "integer", "minimum": 0, "maximum": 100}));
        assert_eq!(
            descriptor.kind,
            Kind::Integer {
                minimum: Some(0),
                maximum: Some(100)
            }
        );
    }

    #[test]
    fn bare_type_name_is_shorthand() {
        assert_eq!(parse(json!("integer")), parse(json!({"type": "integer"})));
        assert_eq!(parse(json!("boolean")), parse(json!({"type": "boolean"})));
    }

    #[test]
    fn infers_object_from_properties() {
        let descriptor = parse(json!({
            "properties": {"height": {"type": "integer"}},
            "required": ["height"]
        }));
        assert!(descriptor.is_object());
        assert!(descriptor.property("height").is_some());
    }

    #[test]
    fn infers_array_from_items() {
        let descriptor = parse(json!({"items": {"type": "string"}}));
        assert_eq!(descriptor.kind.name(), "array");
    }

    #[test]
    fn infers_string_from_enum_and_length_keys() {
        assert_eq!(parse(json!({"enum": ["on", "standby"]})).kind.name(), "string");
        assert_eq!(parse(json!({"minLength": 1})).kind.name(), "string");
    }

    #[test]
    fn unspecified_type_fails() {
        let err = parse_err(json!({"minimum": 3}));
        assert_eq!(err.code(), "unknown_type");
    }

    #[test]
    fn unrecognized_type_fails() {
        let err = parse_err(json!({"type": "quaternion"}));
        assert_eq!(err.code(), "unknown_type");
    }

    #[test]
    fn non_object_schema_document_fails() {
        let err = parse_err(json!(42));
        assert_eq!(err.code(), "json_object_expected");
    }

    #[test]
    fn constraint_keys_must_match_the_kind() {
        let err = parse_err(json!({"type": "integer", "minLength": 3}));
        assert_eq!(err.code(), "type_mismatch");

        let err = parse_err(json!({"type": "string", "minimum": 3}));
        assert_eq!(err.code(), "type_mismatch");

        let err = parse_err(json!({"type": "boolean", "enum": ["a"]}));
        assert_eq!(err.code(), "type_mismatch");
    }

    #[test]
    fn enum_rules() {
        let err = parse_err(json!({"type": "string", "enum": []}));
        assert_eq!(err.code(), "invalid_parameter_definition");

        let err = parse_err(json!({"enum": ["a", 1]}));
        assert_eq!(err.code(), "invalid_parameter_definition");

        // agreeing non-string entries are a kind mismatch, not a bad definition
        let err = parse_err(json!({"enum": [1, 2]}));
        assert_eq!(err.code(), "type_mismatch");
    }

    #[test]
    fn enum_metadata_is_carried() {
        let descriptor = parse(json!({
            "type": "string",
            "enum": ["low", "high"],
            "metadata": {"low": "quiet"}
        }));
        let Kind::String { one_of: Some(one_of), .. } = &descriptor.kind else {
            panic!("expected a string kind with enum");
        };
        assert_eq!(one_of.values, vec!["low", "high"]);
        assert!(one_of.metadata.is_some());
    }

    #[test]
    fn required_must_name_declared_properties() {
        let err = parse_err(json!({
            "type": "object",
            "properties": {"a": "integer"},
            "required": ["a", "b"]
        }));
        assert_eq!(err.code(), "invalid_object_schema");
    }

    #[test]
    fn is_required_marks_the_parent_required_set() {
        let descriptor = parse(json!({
            "type": "object",
            "properties": {
                "a": {"type": "integer", "isRequired": true},
                "b": {"type": "integer"}
            }
        }));
        let missing_a = Value::object_from_json(&json!({"b": 2})).unwrap();
        let err = descriptor.validate(&Value::Object(missing_a)).unwrap_err();
        assert_eq!(err.code(), "parameter_missing");

        let missing_b = Value::object_from_json(&json!({"a": 1})).unwrap();
        descriptor.validate(&Value::Object(missing_b)).unwrap();
    }

    #[test]
    fn invalid_minimal_role_fails() {
        let err = parse_err(json!({"type": "integer", "minimalRole": "admin"}));
        assert_eq!(err.code(), "invalid_minimal_role");
    }

    #[test]
    fn minimal_role_is_carried() {
        let descriptor = parse(json!({"type": "integer", "minimalRole": "manager"}));
        assert_eq!(descriptor.minimal_role, Some(Role::Manager));
    }

    #[test]
    fn default_must_satisfy_own_constraints() {
        let descriptor = parse(json!({"type": "integer", "maximum": 10, "default": 5}));
        assert_eq!(descriptor.default, Some(Value::Int(5)));

        let err = parse_err(json!({"type": "integer", "maximum": 10, "default": 11}));
        assert_eq!(err.code(), "invalid_parameter_definition");
        assert_eq!(err.root_cause().code(), "out_of_range");
    }

    #[test]
    fn nested_parse_failure_chains_the_innermost_error() {
        let err = parse_err(json!({
            "type": "object",
            "properties": {
                "outer": {
                    "type": "object",
                    "properties": {"inner": {"type": "whatever"}}
                }
            }
        }));
        assert_eq!(err.code(), "invalid_parameter_definition");
        assert_eq!(err.root_cause().code(), "unknown_type");
    }

    #[test]
    fn validates_integer_range() {
        let descriptor = parse(json!({"type": "integer", "minimum": 0, "maximum": 10}));
        descriptor.validate(&Value::Int(5)).unwrap();
        descriptor.validate(&Value::Int(0)).unwrap();
        descriptor.validate(&Value::Int(10)).unwrap();
        assert_eq!(descriptor.validate(&Value::Int(-1)).unwrap_err().code(), "out_of_range");
        assert_eq!(descriptor.validate(&Value::Int(11)).unwrap_err().code(), "out_of_range");
        assert_eq!(
            descriptor.validate(&Value::Float(5.0)).unwrap_err().code(),
            "type_mismatch"
        );
    }

    #[test]
    fn number_accepts_integers() {
        let descriptor = parse(json!({"type": "number", "minimum": 0.5, "maximum": 9.5}));
        descriptor.validate(&Value::Float(1.25)).unwrap();
        descriptor.validate(&Value::Int(3)).unwrap();
        assert_eq!(descriptor.validate(&Value::Int(10)).unwrap_err().code(), "out_of_range");
    }

    #[test]
    fn validates_string_constraints() {
        let descriptor = parse(json!({"type": "string", "minLength": 2, "maxLength": 4}));
        descriptor.validate(&Value::from("abc")).unwrap();
        assert_eq!(descriptor.validate(&Value::from("a")).unwrap_err().code(), "out_of_range");
        assert_eq!(
            descriptor.validate(&Value::from("abcde")).unwrap_err().code(),
            "out_of_range"
        );

        let descriptor = parse(json!({"type": "string", "enum": ["on", "standby"]}));
        descriptor.validate(&Value::from("on")).unwrap();
        assert_eq!(descriptor.validate(&Value::from("off")).unwrap_err().code(), "out_of_range");
    }

    #[test]
    fn validates_array_elements_first_failure_wins() {
        let descriptor = parse(json!({"type": "array", "items": {"type": "integer", "maximum": 5}}));
        descriptor
            .validate(&Value::from(vec![1i64, 2, 3]))
            .unwrap();
        let err = descriptor
            .validate(&Value::from(vec![1i64, 9, 12]))
            .unwrap_err();
        assert_eq!(err.code(), "out_of_range");
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn validates_object_properties() {
        let descriptor = parse(json!({
            "type": "object",
            "properties": {
                "height": {"type": "integer", "minimum": 0},
                "label": "string"
            },
            "required": ["height"]
        }));

        let ok = Value::object_from_json(&json!({"height": 3, "label": "x"})).unwrap();
        descriptor.validate(&Value::Object(ok)).unwrap();

        let missing = Value::object_from_json(&json!({"label": "x"})).unwrap();
        assert_eq!(
            descriptor.validate(&Value::Object(missing)).unwrap_err().code(),
            "parameter_missing"
        );

        let unknown = Value::object_from_json(&json!({"height": 3, "extra": 1})).unwrap();
        assert_eq!(
            descriptor.validate(&Value::Object(unknown)).unwrap_err().code(),
            "unexpected_parameter"
        );

        let bad = Value::object_from_json(&json!({"height": -2})).unwrap();
        assert_eq!(
            descriptor.validate(&Value::Object(bad)).unwrap_err().code(),
            "out_of_range"
        );
    }

    #[test]
    fn additional_properties_permits_undeclared_keys() {
        let descriptor = parse(json!({
            "type": "object",
            "properties": {"a": "integer"},
            "additionalProperties": true
        }));
        let fields = Value::object_from_json(&json!({"a": 1, "b": "anything"})).unwrap();
        descriptor.validate(&Value::Object(fields)).unwrap();
    }

    #[test]
    fn empty_object_schema_accepts_only_empty_objects() {
        let descriptor = Descriptor::empty_object();
        descriptor.validate(&Value::empty_object()).unwrap();
        let fields = Value::object_from_json(&json!({"a": 1})).unwrap();
        assert_eq!(
            descriptor.validate(&Value::Object(fields)).unwrap_err().code(),
            "unexpected_parameter"
        );
    }

    #[test]
    fn fill_defaults_fills_only_missing_properties() {
        let descriptor = parse(json!({
            "type": "object",
            "properties": {
                "volume": {"type": "integer", "default": 50},
                "muted": {"type": "boolean", "default": false},
                "label": "string"
            }
        }));

        let mut fields = Value::object_from_json(&json!({"volume": 10})).unwrap();
        descriptor.fill_defaults(&mut fields);
        assert_eq!(fields.get("volume"), Some(&Value::Int(10)));
        assert_eq!(fields.get("muted"), Some(&Value::Bool(false)));
        assert!(!fields.contains_key("label"));

        descriptor.validate(&Value::Object(fields)).unwrap();
    }

    #[test]
    fn object_from_properties_uses_the_bare_map_shape() {
        let descriptor = Descriptor::object_from_properties(&json!({
            "phrase": {
                "type": "string",
                "enum": ["beamMeUpScotty", "iPityDaFool"]
            },
            "volume": {"type": "integer", "minimum": 0, "maximum": 10},
            "progress": "integer"
        }))
        .unwrap();

        let fields =
            Value::object_from_json(&json!({"phrase": "iPityDaFool", "volume": 5, "progress": 1}))
                .unwrap();
        descriptor.validate(&Value::Object(fields)).unwrap();
        assert!(!descriptor.allows_additional_properties());
    }

    // Values generated according to a schema always validate against it.
    #[test]
    fn conforming_values_are_never_rejected() {
        let descriptor = parse(json!({
            "type": "object",
            "properties": {
                "count": {"type": "integer", "minimum": 0, "maximum": 3},
                "tags": {"type": "array", "items": {"type": "string", "maxLength": 3}},
                "mode": {"enum": ["a", "b"]}
            },
            "required": ["count"]
        }));

        for count in 0..=3i64 {
            for mode in ["a", "b"] {
                let fields = Value::object_from_json(&json!({
                    "count": count,
                    "tags": ["x", "yz"],
                    "mode": mode
                }))
                .unwrap();
                descriptor.validate(&Value::Object(fields)).unwrap();
            }
        }
    }
}
