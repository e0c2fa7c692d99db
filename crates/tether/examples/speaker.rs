//! Speaker device demo
//!
//! A device exposing `onOff.setConfig` and `volume.setConfig` commands and
//! mirroring accepted parameters into its published state.
//!
//! Run with: `cargo run -p tether --example speaker`

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use command_engine::CommandOrigin;
use command_schema::{Role, Value};
use tether::{Device, PropertySink, StatePropertySet};

struct ConsoleSink;

impl PropertySink for ConsoleSink {
    fn notify(&self, name: &str, value: &Value) {
        println!("state changed: {} = {}", name, value.to_json());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = Arc::new(StatePropertySet::new());
    let sink: Arc<dyn PropertySink> = Arc::new(ConsoleSink);
    state.add_sink(&sink);
    state.set_properties_from_json(
        r#"{"onOff.state": "standby", "volume.volume": 100, "volume.isMuted": false}"#,
    )?;

    let mut device = Device::new();
    device.add_command_definitions(&json!({
        "onOff": {
            "setConfig": {
                "parameters": {
                    "state": {"type": "string", "enum": ["on", "standby"]}
                }
            }
        },
        "volume": {
            "setConfig": {
                "parameters": {
                    "volume": {"type": "integer", "minimum": 0, "maximum": 100},
                    "isMuted": {"type": "boolean"}
                }
            }
        }
    }))?;

    let speaker_state = Arc::clone(&state);
    device.add_command_handler("onOff.setConfig", move |command| {
        let mut command = command.lock();
        println!("received command: {}", command.name());
        if let Some(value) = command.parameters().get("state").cloned() {
            let mut updates = BTreeMap::new();
            updates.insert("onOff.state".to_string(), value);
            speaker_state.set_properties(updates);
        }
        if let Err(error) = command.complete(&json!({})) {
            eprintln!("completing {} failed: {}", command.name(), error);
        }
    })?;

    let speaker_state = Arc::clone(&state);
    device.add_command_handler("volume.setConfig", move |command| {
        let mut command = command.lock();
        println!("received command: {}", command.name());
        let mut updates = BTreeMap::new();
        if let Some(volume) = command.parameters().get("volume").cloned() {
            updates.insert("volume.volume".to_string(), volume);
        }
        if let Some(muted) = command.parameters().get("isMuted").cloned() {
            updates.insert("volume.isMuted".to_string(), muted);
        }
        speaker_state.set_properties(updates);
        if let Err(error) = command.complete(&json!({})) {
            eprintln!("completing {} failed: {}", command.name(), error);
        }
    })?;

    let id = device.add_command(
        &json!({"name": "onOff.setConfig", "parameters": {"state": "on"}}),
        CommandOrigin::Local,
        Role::User,
    )?;
    println!("onOff.setConfig -> {}", device.command_document(&id).unwrap());

    let id = device.add_command(
        &json!({"name": "volume.setConfig", "parameters": {"volume": 30, "isMuted": false}}),
        CommandOrigin::Local,
        Role::User,
    )?;
    println!("volume.setConfig -> {}", device.command_document(&id).unwrap());

    println!("device state: {}", state.to_document());
    Ok(())
}
