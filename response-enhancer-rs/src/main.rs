// response-enhancer-rs/src/main.rs
// Serverless entry point for the response enhancer step

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use shared_types_rs::{telemetry, PipelineConfig, PipelineEvent};

async fn function_handler(event: LambdaEvent<PipelineEvent>) -> Result<PipelineEvent, Error> {
    let (payload, context) = event.into_parts();
    Ok(response_enhancer::handle(payload, &context, Utc::now()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = PipelineConfig::load()?;
    telemetry::init_tracing("response-enhancer", &config);

    lambda_runtime::run(service_fn(function_handler)).await
}
