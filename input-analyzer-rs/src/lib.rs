//! # Input Analyzer
//!
//! First step of the pipeline. Looks at the raw user message, derives a
//! small feature summary and attaches it to the event for later steps.

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::info;

use shared_types_rs::{
    fields, Complexity, ExecutionContext, InputAnalysis, PipelineEvent, Result,
};

/// Heuristic token-per-word ratio. Approximate, not a tokenizer count.
pub const ESTIMATED_TOKENS_PER_WORD: f64 = 1.3;

/// Messages with more words than this are treated as complex.
pub const COMPLEXITY_WORD_THRESHOLD: usize = 20;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```|`|\bcode\b|\bfunction\b").expect("code pattern compiles"));

/// Derive the feature summary for a message. Pure.
pub fn analyze(message: &str) -> InputAnalysis {
    let word_count = message.split_whitespace().count();
    let has_code = CODE_PATTERN.is_match(message);
    let has_question = message.contains('?');

    let complexity = if word_count > COMPLEXITY_WORD_THRESHOLD || has_code {
        Complexity::High
    } else {
        Complexity::Low
    };

    InputAnalysis {
        word_count,
        has_code,
        has_question,
        complexity,
        estimated_tokens: word_count as f64 * ESTIMATED_TOKENS_PER_WORD,
    }
}

/// Step entry point: requires `message`, adds `analysis` and `timestamp`.
pub fn handle(
    mut event: PipelineEvent,
    ctx: &impl ExecutionContext,
    now: DateTime<Utc>,
) -> Result<PipelineEvent> {
    let analysis = analyze(event.require_str(fields::MESSAGE)?);

    info!(
        pipeline_id = ctx.execution_id(),
        word_count = analysis.word_count,
        has_code = analysis.has_code,
        complexity = analysis.complexity.as_str(),
        "Analyzed user message"
    );

    event.extend(fields::ANALYSIS, serde_json::to_value(&analysis)?);
    event.extend(
        fields::TIMESTAMP,
        Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    Ok(event)
}
