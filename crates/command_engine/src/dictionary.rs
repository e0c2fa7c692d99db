//! Command dictionary
//!
//! The dictionary is built once at startup from one or more layered documents
//! (a base set plus package-specific sets) and is read-only thereafter; it is
//! safe for unsynchronized concurrent reads as long as no load races a
//! lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use command_schema::SchemaError;

use crate::definition::CommandDefinition;
use crate::error::CommandError;

/// Mapping from fully-qualified command name to its definition.
pub struct CommandDictionary {
    definitions: HashMap<String, Arc<CommandDefinition>>,
}

impl Default for CommandDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Load a document mapping package name → command name → definition.
    ///
    /// The load is atomic: a single malformed entry fails the whole load with
    /// the offending fully-qualified name in the error context, and nothing
    /// is applied. Loading a name that already exists is an error unless
    /// `override_layer` is set, in which case the entry replaces the
    /// previously loaded one.
    pub fn load_commands(
        &mut self,
        doc: &serde_json::Value,
        override_layer: bool,
    ) -> Result<(), CommandError> {
        let packages = doc
            .as_object()
            .ok_or(CommandError::Schema(SchemaError::JsonObjectExpected))?;

        let mut staged = Vec::new();
        for (package, commands_doc) in packages {
            let commands = commands_doc
                .as_object()
                .ok_or_else(|| CommandError::DefinitionLoad {
                    name: package.clone(),
                    cause: SchemaError::JsonObjectExpected,
                })?;
            for (command, definition_doc) in commands {
                let full_name = format!("{}.{}", package, command);
                if package.is_empty() || command.is_empty() {
                    return Err(CommandError::InvalidCommandName { name: full_name });
                }
                let definition = CommandDefinition::from_document(package, command, definition_doc)
                    .map_err(|cause| CommandError::DefinitionLoad {
                        name: full_name.clone(),
                        cause,
                    })?;
                staged.push((full_name, definition));
            }
        }

        if !override_layer {
            for (full_name, _) in &staged {
                if self.definitions.contains_key(full_name) {
                    return Err(CommandError::DuplicateCommandDefinition {
                        name: full_name.clone(),
                    });
                }
            }
        }

        let count = staged.len();
        for (full_name, definition) in staged {
            self.definitions.insert(full_name, Arc::new(definition));
        }
        debug!(count, override_layer, "loaded command definitions");
        Ok(())
    }

    /// Look up a definition by its fully-qualified name.
    pub fn find(&self, full_name: &str) -> Option<&Arc<CommandDefinition>> {
        self.definitions.get(full_name)
    }

    /// All fully-qualified names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the dictionary holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
