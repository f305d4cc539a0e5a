// shared-types-rs/src/event.rs
// The record threaded through every pipeline step.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PipelineError, Result};

/// Well-known field names on a pipeline event.
pub mod fields {
    pub const MESSAGE: &str = "message";
    pub const ANALYSIS: &str = "analysis";
    pub const TIMESTAMP: &str = "timestamp";
    pub const CHATBOT_RESPONSE: &str = "chatbot_response";
    pub const ENHANCED_RESPONSE: &str = "enhanced_response";
}

/// Accumulating record of named JSON fields, kept in insertion order.
///
/// Steps only ever add fields. There is no removal API, so whatever the
/// orchestrator (or an earlier step) placed on the event reaches every
/// later step untouched. Adding a name that already exists replaces the
/// value, which is what happens when the orchestrator re-runs a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineEvent {
    fields: Map<String, Value>,
}

impl PipelineEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fetch a field that must be present. JSON `null` counts as absent.
    pub fn require(&self, name: &str) -> Result<&Value> {
        match self.fields.get(name) {
            Some(Value::Null) | None => Err(PipelineError::missing(name)),
            Some(value) => Ok(value),
        }
    }

    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| PipelineError::invalid(name, "a string"))
    }

    /// Add a field to the event.
    pub fn extend(&mut self, name: &str, value: impl Into<Value>) {
        if self.fields.insert(name.to_string(), value.into()).is_some() {
            tracing::debug!(field = name, "Replaced existing pipeline event field");
        }
    }

    /// Builder form of [`PipelineEvent::extend`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extend(name, value);
        self
    }

    /// Consume the event, keeping a single required field.
    pub fn into_field(mut self, name: &str) -> Result<Value> {
        match self.fields.remove(name) {
            Some(Value::Null) | None => Err(PipelineError::missing(name)),
            Some(value) => Ok(value),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for PipelineEvent {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<PipelineEvent> for Value {
    fn from(event: PipelineEvent) -> Self {
        Value::Object(event.fields)
    }
}
