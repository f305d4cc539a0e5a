//! # Pipeline Logger
//!
//! Last step of the pipeline. Records one log entry per execution and hands
//! the enhanced response back to the caller. A failed write is reported on
//! the operational log stream only; the caller still gets the reply.

pub mod dynamo;
pub mod store;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{error, info};

use shared_types_rs::{fields, ExecutionContext, LogEntry, LogStatus, PipelineEvent, Result};

pub use dynamo::DynamoLogStore;
pub use store::{LogStore, MemoryLogStore};

/// Assemble the log entry for this execution.
///
/// `execution_time_ms` is the time the environment says is *left* in the
/// invocation, not the time spent so far.
pub fn build_log_entry(
    event: &PipelineEvent,
    ctx: &impl ExecutionContext,
    now: DateTime<Utc>,
) -> Result<LogEntry> {
    Ok(LogEntry {
        pipeline_id: ctx.execution_id().to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        user_message: event.require_str(fields::MESSAGE)?.to_string(),
        analysis: event.require(fields::ANALYSIS)?.clone(),
        final_response: event.require(fields::ENHANCED_RESPONSE)?.clone(),
        execution_time_ms: ctx.remaining_time_ms(),
        // Written even when the store rejects the entry below.
        status: LogStatus::Success,
    })
}

/// Step entry point: persist the log entry, then return the enhanced response.
pub async fn handle<S>(
    event: PipelineEvent,
    ctx: &impl ExecutionContext,
    store: &S,
    now: DateTime<Utc>,
) -> Result<Value>
where
    S: LogStore + ?Sized,
{
    let entry = build_log_entry(&event, ctx, now)?;

    match store.put(&entry).await {
        Ok(()) => info!(pipeline_id = %entry.pipeline_id, "Logged pipeline execution"),
        Err(e) => error!(pipeline_id = %entry.pipeline_id, error = %e, "Logging failed"),
    }

    event.into_field(fields::ENHANCED_RESPONSE)
}
