// Runs the three steps back to back, the way the orchestrator sequences them.

use chrono::Utc;
use pipeline_logger::MemoryLogStore;
use serde_json::json;
use shared_types_rs::{fields, FixedContext, PipelineEvent};

fn orchestrator_event(message: &str) -> PipelineEvent {
    PipelineEvent::new()
        .with(fields::MESSAGE, message)
        .with("session_id", "sess-1")
}

#[tokio::test]
async fn chain_with_reply_mapping() {
    let store = MemoryLogStore::new();
    let ctx = FixedContext::new("exec-chain-1", 60_000);

    let event = input_analyzer::handle(
        orchestrator_event("How do I write a function in Python?"),
        &ctx,
        Utc::now(),
    )
    .expect("analyzer accepts a message");

    // The chatbot call happens outside the pipeline; its result lands on the event.
    let mut event = event;
    event.extend(
        fields::CHATBOT_RESPONSE,
        json!({"reply": "Use the def keyword.", "metadata": {"model": "bot-1"}}),
    );

    let event = response_enhancer::handle(event, &ctx, Utc::now());
    assert_eq!(event.get("session_id"), Some(&json!("sess-1")));

    let reply = pipeline_logger::handle(event, &ctx, &store, Utc::now())
        .await
        .expect("logger returns the reply");

    assert_eq!(reply["reply"], json!("Use the def keyword."));
    assert_eq!(reply["metadata"]["model"], json!("bot-1"));
    assert_eq!(
        reply["metadata"]["complexity_note"],
        json!(response_enhancer::COMPLEXITY_NOTE)
    );
    assert_eq!(reply["metadata"]["input_analysis"]["has_code"], json!(true));

    let entries = store.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].pipeline_id, "exec-chain-1");
    assert_eq!(entries[0].user_message, "How do I write a function in Python?");
    assert_eq!(entries[0].execution_time_ms, 60_000);
    assert_eq!(entries[0].final_response, reply);
}

#[tokio::test]
async fn chain_survives_unparseable_upstream_body() {
    let store = MemoryLogStore::new();
    let ctx = FixedContext::new("exec-chain-2", 60_000);

    let mut event = input_analyzer::handle(orchestrator_event("hello"), &ctx, Utc::now()).unwrap();
    event.extend(fields::CHATBOT_RESPONSE, json!({"body": "<html>502</html>"}));

    let event = response_enhancer::handle(event, &ctx, Utc::now());
    let reply = pipeline_logger::handle(event, &ctx, &store, Utc::now())
        .await
        .unwrap();

    assert!(reply["reply"]
        .as_str()
        .unwrap()
        .starts_with(response_enhancer::FALLBACK_REPLY_PREFIX));
    assert_eq!(reply["metadata"]["error"], json!(true));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn chain_rejects_event_without_message() {
    let ctx = FixedContext::local();
    let result = input_analyzer::handle(PipelineEvent::new().with("text", "hi"), &ctx, Utc::now());
    assert!(result.is_err());
}
