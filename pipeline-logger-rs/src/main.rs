// pipeline-logger-rs/src/main.rs
// Serverless entry point for the pipeline logger step

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use pipeline_logger::DynamoLogStore;
use serde_json::Value;
use shared_types_rs::{telemetry, PipelineConfig, PipelineEvent};
use tracing::info;

async fn function_handler(
    store: &DynamoLogStore,
    event: LambdaEvent<PipelineEvent>,
) -> Result<Value, Error> {
    let (payload, context) = event.into_parts();
    let reply = pipeline_logger::handle(payload, &context, store, Utc::now()).await?;
    Ok(reply)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = PipelineConfig::load()?;
    telemetry::init_tracing("pipeline-logger", &config);

    // One client for the lifetime of the execution environment
    let store = DynamoLogStore::from_config(&config).await;
    info!(table = store.table_name(), "Pipeline logger ready");

    let store = &store;
    lambda_runtime::run(service_fn(move |event| function_handler(store, event))).await
}
