//! Command instances
//!
//! A [`CommandInstance`] is one invocation bound to a command definition. It
//! validates the inbound parameter payload once at construction, walks a
//! guarded lifecycle state machine, validates progress and results payloads
//! against their schemas, and serializes its full observable state to a
//! wire-ready document.
//!
//! The instance holds no locks; the surrounding dispatcher must serialize
//! mutation per instance.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use serde_json::json;
use tracing::debug;

use command_schema::{Descriptor, SchemaError, Value, fields_to_json};

use crate::definition::CommandDefinition;
use crate::dictionary::CommandDictionary;
use crate::error::{CommandError, ErrorInfo};
use crate::state::{CommandOrigin, CommandState};

/// Observer notified synchronously at the end of each successful mutating
/// operation. Unsubscription is dropping the registered `Arc`; callbacks must
/// not re-enter the instance they were invoked for.
pub trait CommandObserver: Send + Sync {
    fn on_command_changed(&self, command: &CommandInstance);
}

/// One invocation of a defined command, tracked through its lifecycle.
#[derive(Debug)]
pub struct CommandInstance {
    name: String,
    id: Option<String>,
    origin: CommandOrigin,
    definition: Arc<CommandDefinition>,
    parameters: BTreeMap<String, Value>,
    progress: BTreeMap<String, Value>,
    results: BTreeMap<String, Value>,
    error: Option<ErrorInfo>,
    state: CommandState,
    observers: Vec<Weak<dyn CommandObserver>>,
}

impl CommandInstance {
    /// Construct an instance from an inbound command document.
    ///
    /// The document must be an object carrying a `name` that resolves in the
    /// dictionary; `parameters` defaults to an empty object. Declared
    /// parameter defaults are filled in before validation, and any parameter
    /// failure is wrapped as `command_failed` with the specific cause
    /// chained. An explicitly supplied `id` wins over the document's `id`
    /// key. The instance starts in the `queued` state.
    pub fn from_document(
        doc: &serde_json::Value,
        origin: CommandOrigin,
        dictionary: &CommandDictionary,
        id: Option<String>,
    ) -> Result<Self, CommandError> {
        let map = doc
            .as_object()
            .ok_or(CommandError::Schema(SchemaError::JsonObjectExpected))?;

        let name = map
            .get("name")
            .and_then(|name| name.as_str())
            .ok_or(CommandError::Schema(SchemaError::PropertyMissing {
                name: "name".to_string(),
            }))?;

        let definition =
            dictionary
                .find(name)
                .cloned()
                .ok_or_else(|| CommandError::InvalidCommandName {
                    name: name.to_string(),
                })?;

        let mut parameters = match map.get("parameters") {
            None => BTreeMap::new(),
            Some(doc) => Value::object_from_json(doc)
                .map_err(|cause| CommandError::CommandFailed { cause })?,
        };
        definition.parameters.fill_defaults(&mut parameters);
        definition
            .parameters
            .validate(&Value::Object(parameters.clone()))
            .map_err(|cause| CommandError::CommandFailed { cause })?;

        let id = id.or_else(|| {
            map.get("id")
                .and_then(|id| id.as_str())
                .map(str::to_string)
        });

        Ok(Self {
            name: name.to_string(),
            id,
            origin,
            definition,
            parameters,
            progress: BTreeMap::new(),
            results: BTreeMap::new(),
            error: None,
            state: CommandState::Queued,
            observers: Vec::new(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Fully-qualified command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Externally assigned identifier, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn origin(&self) -> CommandOrigin {
        self.origin
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    pub fn progress(&self) -> &BTreeMap<String, Value> {
        &self.progress
    }

    pub fn results(&self) -> &BTreeMap<String, Value> {
        &self.results
    }

    /// Error recorded by `abort`, if any.
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    /// The definition this instance was validated against.
    pub fn definition(&self) -> &Arc<CommandDefinition> {
        &self.definition
    }

    /// Assign the externally supplied identifier.
    ///
    /// Identifiers are assignable exactly once, whether at construction or
    /// here; a second assignment fails with `invalid_state`. The engine never
    /// generates identifiers itself.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<(), CommandError> {
        if self.id.is_some() {
            return Err(CommandError::invalid_state(format!(
                "command '{}' already has an id assigned",
                self.name
            )));
        }
        self.id = Some(id.into());
        Ok(())
    }

    /// Register an observer. The registration lives as long as the caller's
    /// `Arc` does.
    pub fn add_observer(&mut self, observer: &Arc<dyn CommandObserver>) {
        self.observers.push(Arc::downgrade(observer));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State Machine
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge a progress update.
    ///
    /// Only the keys present in the payload are validated, each against its
    /// declared property descriptor; undeclared keys follow the schema's
    /// `additionalProperties` setting. Validated keys merge into current
    /// progress, last write wins per key. Legal in `queued`, `inProgress`,
    /// and `paused`; a queued command moves to `inProgress`. Repeating an
    /// identical payload succeeds and changes nothing.
    pub fn set_progress(&mut self, doc: &serde_json::Value) -> Result<(), CommandError> {
        let definition = Arc::clone(&self.definition);
        let Some(descriptor) = definition.progress.as_ref() else {
            return Err(CommandError::invalid_state(format!(
                "command '{}' does not report progress",
                self.name
            )));
        };
        if !matches!(
            self.state,
            CommandState::Queued | CommandState::InProgress | CommandState::Paused
        ) {
            return Err(self.illegal("set progress on"));
        }

        let map = doc
            .as_object()
            .ok_or(CommandError::Schema(SchemaError::JsonObjectExpected))?;

        // validate the whole payload before mutating anything
        let mut updates = Vec::with_capacity(map.len());
        for (name, field_doc) in map {
            let value = Value::from_json(field_doc)?;
            match descriptor.property(name) {
                Some(property) => property.validate(&value)?,
                None if descriptor.allows_additional_properties() => {}
                None => {
                    return Err(CommandError::Schema(SchemaError::UnknownProperty {
                        name: name.clone(),
                    }));
                }
            }
            updates.push((name.clone(), value));
        }

        for (name, value) in updates {
            self.progress.insert(name, value);
        }
        if self.state == CommandState::Queued {
            self.state = CommandState::InProgress;
        }
        self.notify();
        Ok(())
    }

    /// Record results and finish in the `done` state.
    ///
    /// The full results document is validated against the results schema; a
    /// command with no declared results only accepts `{}`.
    pub fn complete(&mut self, results_doc: &serde_json::Value) -> Result<(), CommandError> {
        if self.state.is_terminal() {
            return Err(self.illegal("complete"));
        }
        let definition = Arc::clone(&self.definition);
        let empty = Descriptor::empty_object();
        let descriptor = definition.results.as_ref().unwrap_or(&empty);

        let fields = Value::object_from_json(results_doc)?;
        descriptor.validate(&Value::Object(fields.clone()))?;

        self.results = fields;
        self.state = CommandState::Done;
        debug!(name = %self.name, "command completed");
        self.notify();
        Ok(())
    }

    /// Record the given error and finish in the `aborted` state, resetting
    /// progress and results. Only the outermost code and message of the
    /// error survive into the serialized document.
    pub fn abort(&mut self, error: ErrorInfo) -> Result<(), CommandError> {
        if self.state.is_terminal() {
            return Err(self.illegal("abort"));
        }
        debug!(name = %self.name, code = %error.code, "command aborted");
        self.error = Some(error);
        self.progress.clear();
        self.results.clear();
        self.state = CommandState::Aborted;
        self.notify();
        Ok(())
    }

    /// Finish in the `cancelled` state. Legal from any non-terminal state.
    pub fn cancel(&mut self) -> Result<(), CommandError> {
        if self.state.is_terminal() {
            return Err(self.illegal("cancel"));
        }
        self.state = CommandState::Cancelled;
        self.notify();
        Ok(())
    }

    /// Suspend a running command.
    pub fn pause(&mut self) -> Result<(), CommandError> {
        if self.state != CommandState::InProgress {
            return Err(self.illegal("pause"));
        }
        self.state = CommandState::Paused;
        self.notify();
        Ok(())
    }

    /// Resume a paused command.
    pub fn resume(&mut self) -> Result<(), CommandError> {
        if self.state != CommandState::Paused {
            return Err(self.illegal("resume"));
        }
        self.state = CommandState::InProgress;
        self.notify();
        Ok(())
    }

    /// Finish in the `expired` state. The dispatcher calls this when a
    /// command outlives its delivery window; legal from any non-terminal
    /// state.
    pub fn expire(&mut self) -> Result<(), CommandError> {
        if self.state.is_terminal() {
            return Err(self.illegal("expire"));
        }
        self.state = CommandState::Expired;
        self.notify();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Canonical wire representation of the instance's observable state:
    /// `name`, `id` (when assigned), `parameters`, `progress`, `state`,
    /// `results`, and an `error` object with `code` and `message` only in the
    /// `aborted` and `error` states.
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = serde_json::Map::new();
        doc.insert("name".to_string(), json!(self.name));
        if let Some(id) = &self.id {
            doc.insert("id".to_string(), json!(id));
        }
        doc.insert("parameters".to_string(), fields_to_json(&self.parameters));
        doc.insert("progress".to_string(), fields_to_json(&self.progress));
        doc.insert("state".to_string(), json!(self.state.as_str()));
        doc.insert("results".to_string(), fields_to_json(&self.results));
        if matches!(self.state, CommandState::Aborted | CommandState::Error) {
            if let Some(error) = &self.error {
                doc.insert("error".to_string(), error.to_document());
            }
        }
        serde_json::Value::Object(doc)
    }

    fn illegal(&self, operation: &str) -> CommandError {
        CommandError::invalid_state(format!(
            "cannot {} command '{}' in the '{}' state",
            operation, self.name, self.state
        ))
    }

    fn notify(&mut self) {
        self.observers
            .retain(|observer| observer.strong_count() > 0);
        let observers: Vec<_> = self.observers.iter().filter_map(Weak::upgrade).collect();
        for observer in observers {
            observer.on_command_changed(self);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
