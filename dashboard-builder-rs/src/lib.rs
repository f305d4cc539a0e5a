//! # Dashboard Builder
//!
//! Declares the read-only metrics dashboard for the pipeline (execution
//! outcomes, execution time, per-function duration, invocations and errors)
//! and submits it once. There is no retry; a rejected submission is
//! returned to the caller as is.

pub mod document;
pub mod publisher;

use tracing::{info, warn};

use shared_types_rs::Result;

pub use document::{build_dashboard, DashboardBody, DashboardSpec, MetricSeries, Statistic};
pub use publisher::{CloudWatchPublisher, DashboardPublisher};

/// Build, serialize and submit the dashboard. Returns its console URL.
pub async fn publish_dashboard<P>(spec: &DashboardSpec, publisher: &P) -> Result<String>
where
    P: DashboardPublisher + ?Sized,
{
    let body = serde_json::to_string(&build_dashboard(spec))?;

    let warnings = publisher.put_dashboard(&spec.dashboard_name, &body).await?;
    for warning in &warnings {
        warn!(dashboard = %spec.dashboard_name, "Dashboard validation: {}", warning);
    }

    info!(dashboard = %spec.dashboard_name, bytes = body.len(), "Dashboard published");
    Ok(spec.console_url())
}
