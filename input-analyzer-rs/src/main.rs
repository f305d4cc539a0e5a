// input-analyzer-rs/src/main.rs
// Serverless entry point for the input analyzer step

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use shared_types_rs::{telemetry, PipelineConfig, PipelineEvent};

async fn function_handler(event: LambdaEvent<PipelineEvent>) -> Result<PipelineEvent, Error> {
    let (payload, context) = event.into_parts();
    let event = input_analyzer::handle(payload, &context, Utc::now())?;
    Ok(event)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = PipelineConfig::load()?;
    telemetry::init_tracing("input-analyzer", &config);

    lambda_runtime::run(service_fn(function_handler)).await
}
