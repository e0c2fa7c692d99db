//! Device facade
//!
//! The dispatcher-side composition root: owns the command dictionary, the
//! registered handlers, and the live command instances. Mutation of each
//! instance is serialized behind its own lock, minimal-role authorization is
//! enforced here (the engine only stores the requirement), and commands that
//! arrive without an identifier get one assigned before dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use command_engine::{CommandDictionary, CommandError, CommandInstance, CommandOrigin};
use command_schema::{Role, SchemaError};

/// A live command instance behind its single-writer lock.
pub type SharedCommand = Arc<Mutex<CommandInstance>>;

/// Handler invoked synchronously when a command addressed to its name arrives.
pub type CommandHandler = Box<dyn Fn(&SharedCommand) + Send + Sync>;

/// Errors surfaced by the device facade.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("access denied: '{command}' requires the {required} role, caller holds {granted}")]
    AccessDenied {
        command: String,
        required: Role,
        granted: Role,
    },

    #[error("no command definition named '{0}'")]
    UnknownCommandName(String),

    #[error("a command with id '{0}' already exists")]
    DuplicateCommandId(String),

    #[error("failed to parse document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A device exposing a catalogue of remotely-invocable commands.
pub struct Device {
    dictionary: CommandDictionary,
    handlers: HashMap<String, CommandHandler>,
    commands: HashMap<String, SharedCommand>,
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl Device {
    /// Create a device with an empty command catalogue.
    pub fn new() -> Self {
        Self {
            dictionary: CommandDictionary::new(),
            handlers: HashMap::new(),
            commands: HashMap::new(),
        }
    }

    /// Load a base set of command definitions.
    pub fn add_command_definitions(&mut self, doc: &serde_json::Value) -> Result<(), DeviceError> {
        self.dictionary.load_commands(doc, false)?;
        Ok(())
    }

    /// Load command definitions from a JSON string.
    pub fn add_command_definitions_from_json(&mut self, json: &str) -> Result<(), DeviceError> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        self.add_command_definitions(&doc)
    }

    /// Load an override layer permitted to replace previously loaded entries.
    pub fn add_command_overrides(&mut self, doc: &serde_json::Value) -> Result<(), DeviceError> {
        self.dictionary.load_commands(doc, true)?;
        Ok(())
    }

    /// Register the handler for a defined command.
    pub fn add_command_handler(
        &mut self,
        full_name: &str,
        handler: impl Fn(&SharedCommand) + Send + Sync + 'static,
    ) -> Result<(), DeviceError> {
        if self.dictionary.find(full_name).is_none() {
            return Err(DeviceError::UnknownCommandName(full_name.to_string()));
        }
        self.handlers
            .insert(full_name.to_string(), Box::new(handler));
        Ok(())
    }

    /// Accept an inbound command document on behalf of a caller.
    ///
    /// Resolves the command, authorizes the caller against the definition's
    /// minimal role (absent means unrestricted), constructs and validates the
    /// instance, assigns a fresh identifier when the document carries none,
    /// and dispatches to the registered handler. Returns the command id.
    pub fn add_command(
        &mut self,
        doc: &serde_json::Value,
        origin: CommandOrigin,
        caller_role: Role,
    ) -> Result<String, DeviceError> {
        let mut instance = CommandInstance::from_document(doc, origin, &self.dictionary, None)?;

        if let Some(required) = instance.definition().minimal_role {
            if !caller_role.satisfies(required) {
                return Err(DeviceError::AccessDenied {
                    command: instance.name().to_string(),
                    required,
                    granted: caller_role,
                });
            }
        }

        let id = match instance.id() {
            Some(id) => id.to_string(),
            None => {
                // identifier assignment is the dispatcher's job, never the engine's
                let id = Uuid::new_v4().to_string();
                instance.set_id(id.clone())?;
                id
            }
        };
        if self.commands.contains_key(&id) {
            return Err(DeviceError::DuplicateCommandId(id));
        }

        debug!(name = %instance.name(), id = %id, "command accepted");
        let name = instance.name().to_string();
        let command: SharedCommand = Arc::new(Mutex::new(instance));
        self.commands.insert(id.clone(), Arc::clone(&command));

        match self.handlers.get(&name) {
            Some(handler) => handler(&command),
            None => warn!(name = %name, "no handler registered for command"),
        }
        Ok(id)
    }

    /// Live command instance by id.
    pub fn find_command(&self, id: &str) -> Option<SharedCommand> {
        self.commands.get(id).map(Arc::clone)
    }

    /// Wire document for a command by id.
    pub fn command_document(&self, id: &str) -> Option<serde_json::Value> {
        self.commands
            .get(id)
            .map(|command| command.lock().to_document())
    }

    /// The loaded command catalogue.
    pub fn dictionary(&self) -> &CommandDictionary {
        &self.dictionary
    }
}
