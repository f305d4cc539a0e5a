// dashboard-builder-rs/src/publisher.rs
// Submission of dashboard documents to the metrics service

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatch::config::Region;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::Client;

use shared_types_rs::{PipelineError, Result};

/// Accepts a serialized dashboard under a name, replacing any previous one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardPublisher: Send + Sync {
    /// Returns the validation warnings the service attached, if any.
    async fn put_dashboard(&self, name: &str, body: &str) -> Result<Vec<String>>;
}

pub struct CloudWatchPublisher {
    client: Client,
}

impl CloudWatchPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn for_region(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl DashboardPublisher for CloudWatchPublisher {
    async fn put_dashboard(&self, name: &str, body: &str) -> Result<Vec<String>> {
        let output = self
            .client
            .put_dashboard()
            .dashboard_name(name)
            .dashboard_body(body)
            .send()
            .await
            .map_err(|e| PipelineError::Submission(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .dashboard_validation_messages()
            .iter()
            .map(|m| {
                format!(
                    "{}: {}",
                    m.data_path().unwrap_or("-"),
                    m.message().unwrap_or("no detail")
                )
            })
            .collect())
    }
}
