// pipeline-logger-rs/src/dynamo.rs
// Key-value table backend for the log store

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::Value;
use tracing::debug;

use shared_types_rs::{LogEntry, PipelineConfig, PipelineError, Result};

use crate::store::LogStore;

/// Writes each log entry as one item, keyed by `pipeline_id`.
#[derive(Debug, Clone)]
pub struct DynamoLogStore {
    client: Client,
    table_name: String,
}

impl DynamoLogStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the default credential chain and configured region.
    pub async fn from_config(config: &PipelineConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.system.region.clone()))
            .load()
            .await;
        Self::new(Client::new(&sdk_config), config.storage.log_table.clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl LogStore for DynamoLogStore {
    async fn put(&self, entry: &LogEntry) -> Result<()> {
        let item = to_item(entry)?;
        debug!(table = %self.table_name, attributes = item.len(), "Writing log item");

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| PipelineError::Persistence(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Convert a log entry into a table item.
pub fn to_item(entry: &LogEntry) -> Result<HashMap<String, AttributeValue>> {
    match serde_json::to_value(entry)? {
        Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, to_attribute(v))).collect()),
        other => Err(PipelineError::Persistence(format!(
            "log entry serialized to a non-mapping value: {}",
            other
        ))),
    }
}

/// JSON to attribute value. Numbers keep their textual form.
pub fn to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => AttributeValue::L(items.into_iter().map(to_attribute).collect()),
        Value::Object(map) => {
            AttributeValue::M(map.into_iter().map(|(k, v)| (k, to_attribute(v))).collect())
        }
    }
}
