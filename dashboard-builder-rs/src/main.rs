// dashboard-builder-rs/src/main.rs
// Publishes the pipeline monitoring dashboard

use dashboard_builder::{publish_dashboard, CloudWatchPublisher, DashboardSpec};
use shared_types_rs::{telemetry, PipelineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load()?;
    telemetry::init_tracing("dashboard-builder", &config);

    let spec = DashboardSpec::from_config(&config);
    let publisher = CloudWatchPublisher::for_region(&spec.region).await;

    let url = publish_dashboard(&spec, &publisher).await.map_err(|e| {
        tracing::error!("Failed to publish dashboard: {}", e);
        e
    })?;

    println!("Dashboard created successfully!");
    println!("Dashboard URL: {}", url);
    Ok(())
}
