// shared-types-rs/src/records.rs
// Typed records produced by the pipeline steps

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coarse complexity bucket for a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::High => "high",
        }
    }
}

/// Feature summary of the incoming user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAnalysis {
    pub word_count: usize,
    pub has_code: bool,
    pub has_question: bool,
    pub complexity: Complexity,
    /// Rough token estimate, not a tokenizer count.
    pub estimated_tokens: f64,
}

/// Canonical reply shape handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedResponse {
    pub reply: String,
    pub metadata: Map<String, Value>,
}

impl EnhancedResponse {
    pub fn is_fallback(&self) -> bool {
        self.metadata.get("error") == Some(&Value::Bool(true))
    }
}

impl From<EnhancedResponse> for Value {
    fn from(response: EnhancedResponse) -> Self {
        let mut object = Map::new();
        object.insert("reply".to_string(), Value::String(response.reply));
        object.insert("metadata".to_string(), Value::Object(response.metadata));
        Value::Object(object)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStatus {
    Success,
}

/// One persisted record per pipeline execution. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub pipeline_id: String,
    pub timestamp: String,
    pub user_message: String,
    pub analysis: Value,
    pub final_response: Value,
    /// Remaining invocation budget at logging time, not elapsed time.
    pub execution_time_ms: u64,
    pub status: LogStatus,
}
