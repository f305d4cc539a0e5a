// response-enhancer-rs/src/shape.rs
// Classification of upstream chatbot responses by shape

use std::borrow::Cow;

use serde_json::{Map, Value};
use shared_types_rs::{PipelineError, Result};

/// The shapes an upstream response can take, in precedence order.
///
/// `classify` picks the first variant that matches, so a mapping with both
/// `reply` and `body` is always `HasReply`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    HasReply(&'a Map<String, Value>),
    HasBody(&'a Map<String, Value>),
    HasMessage(&'a Map<String, Value>),
    OtherMapping(&'a Map<String, Value>),
    /// A string holding a JSON object.
    ParsableString {
        raw: &'a str,
        parsed: Map<String, Value>,
    },
    /// A string that is not JSON, or JSON that is not an object.
    OpaqueString(&'a str),
    Other(&'a Value),
}

/// Reply text plus whatever metadata the upstream response carried.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReply {
    pub reply: String,
    pub metadata: Map<String, Value>,
}

impl<'a> ResponseShape<'a> {
    pub fn classify(response: &'a Value) -> Self {
        match response {
            Value::Object(map) if map.contains_key("reply") => ResponseShape::HasReply(map),
            Value::Object(map) if map.contains_key("body") => ResponseShape::HasBody(map),
            Value::Object(map) if map.contains_key("message") => ResponseShape::HasMessage(map),
            Value::Object(map) => ResponseShape::OtherMapping(map),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(parsed)) => ResponseShape::ParsableString {
                    raw: raw.as_str(),
                    parsed,
                },
                _ => ResponseShape::OpaqueString(raw.as_str()),
            },
            other => ResponseShape::Other(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::HasReply(_) => "has_reply",
            ResponseShape::HasBody(_) => "has_body",
            ResponseShape::HasMessage(_) => "has_message",
            ResponseShape::OtherMapping(_) => "other_mapping",
            ResponseShape::ParsableString { .. } => "parsable_string",
            ResponseShape::OpaqueString(_) => "opaque_string",
            ResponseShape::Other(_) => "other",
        }
    }

    pub fn normalize(self) -> Result<NormalizedReply> {
        match self {
            ResponseShape::HasReply(map) => Ok(NormalizedReply {
                reply: stringify(&map["reply"]),
                metadata: metadata_of(map)?,
            }),
            ResponseShape::HasBody(map) => normalize_body(&map["body"]),
            ResponseShape::HasMessage(map) => Ok(NormalizedReply {
                reply: stringify(&map["message"]),
                metadata: metadata_of(map)?,
            }),
            ResponseShape::OtherMapping(map) => Ok(NormalizedReply {
                reply: serde_json::to_string(map)?,
                metadata: Map::new(),
            }),
            ResponseShape::ParsableString { raw, parsed } => {
                let reply = first_present(&parsed, &["reply", "message"])
                    .map(stringify)
                    .unwrap_or_else(|| raw.to_string());
                Ok(NormalizedReply {
                    reply,
                    metadata: metadata_of(&parsed)?,
                })
            }
            ResponseShape::OpaqueString(raw) => Ok(NormalizedReply {
                reply: raw.to_string(),
                metadata: Map::new(),
            }),
            ResponseShape::Other(value) => Ok(NormalizedReply {
                reply: stringify(value),
                metadata: Map::new(),
            }),
        }
    }
}

fn normalize_body(body: &Value) -> Result<NormalizedReply> {
    let parsed: Cow<'_, Value> = match body {
        Value::String(text) => Cow::Owned(serde_json::from_str(text).map_err(|e| {
            PipelineError::Classification(format!("body is not valid JSON: {}", e))
        })?),
        other => Cow::Borrowed(other),
    };

    match parsed.as_ref() {
        Value::Object(map) => Ok(NormalizedReply {
            reply: first_present(map, &["reply", "message", "response"])
                .map(stringify)
                .unwrap_or_else(|| stringify(&parsed)),
            metadata: metadata_of(map)?,
        }),
        other => Ok(NormalizedReply {
            reply: stringify(other),
            metadata: Map::new(),
        }),
    }
}

fn first_present<'m>(map: &'m Map<String, Value>, keys: &[&str]) -> Option<&'m Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn metadata_of(map: &Map<String, Value>) -> Result<Map<String, Value>> {
    match map.get("metadata") {
        None => Ok(Map::new()),
        Some(Value::Object(metadata)) => Ok(metadata.clone()),
        Some(other) => Err(PipelineError::Classification(format!(
            "metadata must be a mapping, got {}",
            response_type_name(other)
        ))),
    }
}

/// Strings pass through as-is; anything else becomes compact JSON text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Runtime type tag of a response, before classification.
pub fn response_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
