// shared-types-rs/src/config.rs
// Centralized configuration loader for the AI pipeline

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

static PIPELINE_CONFIG: OnceCell<Arc<PipelineConfig>> = OnceCell::new();

pub const DEFAULT_LOG_TABLE: &str = "PipelineLogs";
pub const DEFAULT_REGION: &str = "us-east-2";
pub const DEFAULT_DASHBOARD_NAME: &str = "AIPipelineDashboard";
pub const DEFAULT_STATE_MACHINE_ARN: &str =
    "arn:aws:states:us-east-2:000000000000:stateMachine:AIPipeline";
pub const DEFAULT_FUNCTION_NAMES: [&str; 4] = [
    "ai-pipeline-InputAnalyzerFunction",
    "ai-pipeline-ResponseEnhancerFunction",
    "ai-pipeline-PipelineLoggerFunction",
    "ai-pipeline-PipelineFunction",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration not initialized")]
    NotInitialized,

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub system: SystemConfig,
    pub storage: StorageConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub region: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key-value table receiving one log entry per execution
    pub log_table: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub dashboard_name: String,
    pub state_machine_arn: String,
    pub function_names: Vec<String>,
    pub period_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_table: DEFAULT_LOG_TABLE.to_string(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            dashboard_name: DEFAULT_DASHBOARD_NAME.to_string(),
            state_machine_arn: DEFAULT_STATE_MACHINE_ARN.to_string(),
            function_names: DEFAULT_FUNCTION_NAMES.iter().map(|s| s.to_string()).collect(),
            period_secs: 300,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from the optional file and the process environment
    pub fn load() -> Result<Arc<PipelineConfig>, ConfigError> {
        if let Some(config) = PIPELINE_CONFIG.get() {
            return Ok(Arc::clone(config));
        }

        let file = env::var("PIPELINE_CONFIG_PATH").ok();
        let config = Self::from_sources(file.as_deref().map(Path::new), |key| env::var(key).ok())?;

        // A concurrent loader may have won the race; either value is equivalent.
        let config = PIPELINE_CONFIG.get_or_init(|| Arc::new(config));
        Ok(Arc::clone(config))
    }

    /// Get the global configuration instance
    pub fn get() -> Result<Arc<PipelineConfig>, ConfigError> {
        PIPELINE_CONFIG
            .get()
            .map(Arc::clone)
            .ok_or(ConfigError::NotInitialized)
    }

    /// Defaults, then the TOML file (if any), then environment overrides.
    pub fn from_sources<F>(file: Option<&Path>, lookup: F) -> Result<PipelineConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => PipelineConfig::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<PipelineConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup("PIPELINE_LOG_TABLE") {
            self.storage.log_table = table;
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.system.region = region;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.system.log_level = level;
        }
        if let Some(format) = lookup("PIPELINE_LOG_FORMAT") {
            self.system.log_format = match format.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "PIPELINE_LOG_FORMAT must be json or text, got {}",
                        other
                    )))
                }
            };
        }
        if let Some(name) = lookup("PIPELINE_DASHBOARD_NAME") {
            self.monitoring.dashboard_name = name;
        }
        if let Some(arn) = lookup("PIPELINE_STATE_MACHINE_ARN") {
            self.monitoring.state_machine_arn = arn;
        }
        if let Some(names) = lookup("PIPELINE_FUNCTION_NAMES") {
            self.monitoring.function_names = names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(period) = lookup("PIPELINE_METRIC_PERIOD_SECS") {
            self.monitoring.period_secs = match period.parse::<u32>() {
                Ok(p) if p > 0 => p,
                _ => {
                    return Err(ConfigError::InvalidValue(format!(
                        "PIPELINE_METRIC_PERIOD_SECS must be a positive integer, got {}",
                        period
                    )))
                }
            };
        }
        Ok(())
    }
}
