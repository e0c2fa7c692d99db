//! State property set
//!
//! Devices publish their observable state as named typed values. The set
//! stores current values and notifies registered sinks synchronously, once
//! per top-level field that actually changed; unchanged writes are skipped.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use command_schema::{Value, fields_to_json};

use crate::device::DeviceError;

/// Sink receiving one `notify` call per changed top-level field.
/// Unsubscription is dropping the registered `Arc`; callbacks must not
/// re-enter the property set.
pub trait PropertySink: Send + Sync {
    fn notify(&self, name: &str, value: &Value);
}

/// In-memory name → typed-value store with synchronous change notification.
pub struct StatePropertySet {
    properties: RwLock<BTreeMap<String, Value>>,
    sinks: RwLock<Vec<Weak<dyn PropertySink>>>,
}

impl Default for StatePropertySet {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self {
            properties: RwLock::new(BTreeMap::new()),
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Register a sink. The registration lives as long as the caller's `Arc`.
    pub fn add_sink(&self, sink: &Arc<dyn PropertySink>) {
        self.sinks.write().push(Arc::downgrade(sink));
    }

    /// Apply updates, notifying sinks once per field that actually changed.
    pub fn set_properties(&self, updates: BTreeMap<String, Value>) {
        let mut changed = Vec::new();
        {
            let mut properties = self.properties.write();
            for (name, value) in updates {
                if properties.get(&name) != Some(&value) {
                    properties.insert(name.clone(), value.clone());
                    changed.push((name, value));
                }
            }
        }
        if changed.is_empty() {
            return;
        }
        let sinks: Vec<_> = {
            let mut sinks = self.sinks.write();
            sinks.retain(|sink| sink.strong_count() > 0);
            sinks.iter().filter_map(Weak::upgrade).collect()
        };
        for (name, value) in &changed {
            for sink in &sinks {
                sink.notify(name, value);
            }
        }
    }

    /// Apply updates given as a JSON object document.
    pub fn set_properties_from_json(&self, json: &str) -> Result<(), DeviceError> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        let fields = Value::object_from_json(&doc)?;
        self.set_properties(fields);
        Ok(())
    }

    /// Current value of a property.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.properties.read().get(name).cloned()
    }

    /// Copy of all current properties.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.properties.read().clone()
    }

    /// Wire document of the current state.
    pub fn to_document(&self) -> serde_json::Value {
        fields_to_json(&self.properties.read())
    }
}
