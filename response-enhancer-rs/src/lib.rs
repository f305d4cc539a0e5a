//! # Response Enhancer
//!
//! Second step of the pipeline. Takes whatever the upstream chatbot
//! produced, normalizes it into the canonical `{reply, metadata}` shape and
//! annotates it with pipeline metadata.
//!
//! The step never fails: any problem reading the event or normalizing the
//! response turns into a fallback reply that still has the canonical shape.

pub mod shape;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use shared_types_rs::{
    fields, EnhancedResponse, ExecutionContext, PipelineError, PipelineEvent, Result,
};

pub use shape::{response_type_name, stringify, NormalizedReply, ResponseShape};

pub const COMPLEXITY_NOTE: &str = "This was identified as a complex query";

pub const FALLBACK_REPLY_PREFIX: &str =
    "I apologize, but I encountered an error processing the response: ";

/// Placeholder recorded when the event carried no chatbot response at all.
pub const MISSING_RESPONSE_PLACEHOLDER: &str = "<missing>";

/// Build the enhanced response for an event. Never fails.
pub fn enhance(
    event: &PipelineEvent,
    ctx: &impl ExecutionContext,
    now: DateTime<Utc>,
) -> EnhancedResponse {
    let pipeline_id = ctx.execution_id();
    let processing_time = now.to_rfc3339_opts(SecondsFormat::Micros, true);

    match try_enhance(event, pipeline_id, &processing_time) {
        Ok(response) => response,
        Err(e) => {
            warn!(pipeline_id, error = %e, "Falling back after enhancement failure");
            fallback_response(
                event.get(fields::CHATBOT_RESPONSE),
                pipeline_id,
                &processing_time,
                &e,
            )
        }
    }
}

fn try_enhance(
    event: &PipelineEvent,
    pipeline_id: &str,
    processing_time: &str,
) -> Result<EnhancedResponse> {
    let chatbot_response = event
        .get(fields::CHATBOT_RESPONSE)
        .ok_or_else(|| PipelineError::missing(fields::CHATBOT_RESPONSE))?;
    let analysis = event.require(fields::ANALYSIS)?;
    let complexity = analysis
        .get("complexity")
        .and_then(Value::as_str)
        .ok_or_else(|| PipelineError::invalid("analysis.complexity", "a string"))?;

    let shape = ResponseShape::classify(chatbot_response);
    debug!(pipeline_id, shape = shape.name(), "Classified chatbot response");

    let NormalizedReply { reply, mut metadata } = shape.normalize()?;

    metadata.insert("pipeline_id".into(), Value::from(pipeline_id));
    metadata.insert("processing_time".into(), Value::from(processing_time));
    metadata.insert("input_analysis".into(), analysis.clone());
    metadata.insert("enhancement_applied".into(), Value::Bool(true));
    metadata.insert(
        "original_response_type".into(),
        Value::from(response_type_name(chatbot_response)),
    );
    if complexity == "high" {
        metadata.insert("complexity_note".into(), Value::from(COMPLEXITY_NOTE));
    }

    Ok(EnhancedResponse { reply, metadata })
}

fn fallback_response(
    chatbot_response: Option<&Value>,
    pipeline_id: &str,
    processing_time: &str,
    error: &PipelineError,
) -> EnhancedResponse {
    let original = chatbot_response
        .map(stringify)
        .unwrap_or_else(|| MISSING_RESPONSE_PLACEHOLDER.to_string());

    let mut metadata = Map::new();
    metadata.insert("pipeline_id".into(), Value::from(pipeline_id));
    metadata.insert("processing_time".into(), Value::from(processing_time));
    metadata.insert("error".into(), Value::Bool(true));
    metadata.insert("error_message".into(), Value::from(error.to_string()));
    metadata.insert("original_response".into(), Value::from(original));

    EnhancedResponse {
        reply: format!("{}{}", FALLBACK_REPLY_PREFIX, error),
        metadata,
    }
}

/// Step entry point: adds `enhanced_response` to the event.
pub fn handle(
    mut event: PipelineEvent,
    ctx: &impl ExecutionContext,
    now: DateTime<Utc>,
) -> PipelineEvent {
    let enhanced = enhance(&event, ctx, now);
    event.extend(fields::ENHANCED_RESPONSE, Value::from(enhanced));
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types_rs::FixedContext;

    fn ctx() -> FixedContext {
        FixedContext::new("exec-7", 900_000)
    }

    fn analysis(complexity: &str) -> Value {
        json!({
            "word_count": 3,
            "has_code": false,
            "has_question": true,
            "complexity": complexity,
            "estimated_tokens": 3.9
        })
    }

    fn event_with(response: Value, complexity: &str) -> PipelineEvent {
        PipelineEvent::new()
            .with("message", "what is rust?")
            .with(fields::ANALYSIS, analysis(complexity))
            .with(fields::CHATBOT_RESPONSE, response)
    }

    #[test]
    fn test_reply_mapping_gets_metadata() {
        let event = event_with(json!({"reply": "Rust is a language", "metadata": {"model": "m"}}), "low");
        let out = enhance(&event, &ctx(), Utc::now());

        assert_eq!(out.reply, "Rust is a language");
        assert_eq!(out.metadata["model"], json!("m"));
        assert_eq!(out.metadata["pipeline_id"], json!("exec-7"));
        assert_eq!(out.metadata["enhancement_applied"], json!(true));
        assert_eq!(out.metadata["original_response_type"], json!("object"));
        assert_eq!(out.metadata["input_analysis"], analysis("low"));
        assert!(out.metadata["processing_time"].is_string());
        assert!(!out.metadata.contains_key("complexity_note"));
        assert!(!out.is_fallback());
    }

    #[test]
    fn test_pipeline_fields_override_upstream_metadata() {
        let event = event_with(json!({"reply": "r", "metadata": {"pipeline_id": "upstream"}}), "low");
        let out = enhance(&event, &ctx(), Utc::now());
        assert_eq!(out.metadata["pipeline_id"], json!("exec-7"));
    }

    #[test]
    fn test_high_complexity_note() {
        let event = event_with(json!("plain"), "high");
        let out = enhance(&event, &ctx(), Utc::now());
        assert_eq!(out.metadata["complexity_note"], json!(COMPLEXITY_NOTE));
    }

    #[test]
    fn test_integer_response() {
        let out = enhance(&event_with(json!(42), "low"), &ctx(), Utc::now());
        assert_eq!(out.reply, "42");
        assert_eq!(out.metadata["original_response_type"], json!("number"));
        let appended = [
            "pipeline_id",
            "processing_time",
            "input_analysis",
            "enhancement_applied",
            "original_response_type",
        ];
        assert_eq!(out.metadata.len(), appended.len());
    }

    #[test]
    fn test_body_example() {
        let event = event_with(json!({"body": "{\"message\": \"hi\"}"}), "low");
        assert_eq!(enhance(&event, &ctx(), Utc::now()).reply, "hi");
    }

    #[test]
    fn test_missing_analysis_falls_back() {
        let event = PipelineEvent::new().with(fields::CHATBOT_RESPONSE, json!({"reply": "x"}));
        let out = enhance(&event, &ctx(), Utc::now());

        assert!(out.reply.starts_with(FALLBACK_REPLY_PREFIX));
        assert!(out.reply.contains("analysis"));
        assert_eq!(out.metadata["error"], json!(true));
        assert_eq!(out.metadata["pipeline_id"], json!("exec-7"));
        assert_eq!(out.metadata["original_response"], json!(r#"{"reply":"x"}"#));
        assert!(out.metadata["error_message"].as_str().unwrap().contains("analysis"));
    }

    #[test]
    fn test_missing_response_falls_back_with_placeholder() {
        let event = PipelineEvent::new().with(fields::ANALYSIS, analysis("low"));
        let out = enhance(&event, &ctx(), Utc::now());
        assert!(out.is_fallback());
        assert_eq!(out.metadata["original_response"], json!(MISSING_RESPONSE_PLACEHOLDER));
    }

    #[test]
    fn test_bad_body_falls_back() {
        let event = event_with(json!({"body": "{broken"}), "high");
        let out = enhance(&event, &ctx(), Utc::now());
        assert!(out.is_fallback());
        assert_eq!(out.metadata["original_response"], json!(r#"{"body":"{broken"}"#));
        assert!(!out.metadata.contains_key("complexity_note"));
    }

    #[test]
    fn test_analysis_without_complexity_falls_back() {
        let event = PipelineEvent::new()
            .with(fields::ANALYSIS, json!({"word_count": 1}))
            .with(fields::CHATBOT_RESPONSE, "hi");
        assert!(enhance(&event, &ctx(), Utc::now()).is_fallback());
    }

    #[test]
    fn test_handle_adds_enhanced_response() {
        let event = event_with(json!("not json at all"), "low").with("trace_id", "t-1");
        let out = handle(event, &ctx(), Utc::now());

        assert_eq!(out.get("trace_id"), Some(&json!("t-1")));
        assert!(out.contains(fields::CHATBOT_RESPONSE));
        let enhanced = out.get(fields::ENHANCED_RESPONSE).unwrap();
        assert_eq!(enhanced["reply"], json!("not json at all"));
        assert!(enhanced["metadata"].is_object());
    }

    #[test]
    fn test_handle_never_fails_on_empty_event() {
        let out = handle(PipelineEvent::new(), &ctx(), Utc::now());
        let enhanced = out.get(fields::ENHANCED_RESPONSE).unwrap();
        assert!(enhanced["reply"].is_string());
        assert_eq!(enhanced["metadata"]["error"], json!(true));
    }
}
