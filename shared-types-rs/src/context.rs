// shared-types-rs/src/context.rs
// What a step may ask of the environment it runs in

use chrono::Utc;
use uuid::Uuid;

/// Per-invocation facts supplied by the execution environment.
pub trait ExecutionContext {
    /// Identifier of the current execution, used as the pipeline id.
    fn execution_id(&self) -> &str;

    /// Milliseconds left before the environment cuts the invocation off.
    fn remaining_time_ms(&self) -> u64;
}

impl ExecutionContext for lambda_runtime::Context {
    fn execution_id(&self) -> &str {
        &self.request_id
    }

    fn remaining_time_ms(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.deadline.saturating_sub(now)
    }
}

/// Context with fixed values, for local runs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedContext {
    pub execution_id: String,
    pub remaining_time_ms: u64,
}

impl FixedContext {
    pub fn new(execution_id: impl Into<String>, remaining_time_ms: u64) -> Self {
        Self {
            execution_id: execution_id.into(),
            remaining_time_ms,
        }
    }

    /// Fresh random execution id with a 15 minute budget.
    pub fn local() -> Self {
        Self::new(Uuid::new_v4().to_string(), 15 * 60 * 1000)
    }
}

impl ExecutionContext for FixedContext {
    fn execution_id(&self) -> &str {
        &self.execution_id
    }

    fn remaining_time_ms(&self) -> u64 {
        self.remaining_time_ms
    }
}
