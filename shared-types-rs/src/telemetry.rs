// shared-types-rs/src/telemetry.rs
// Structured logging setup for the pipeline binaries

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{LogFormat, PipelineConfig};

static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber. Safe to call more than once.
///
/// Timestamps are left off since the platform log stream stamps every line.
pub fn init_tracing(service_name: &str, config: &PipelineConfig) {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},aws_smithy_runtime=warn", config.system.log_level)));

    let (json_layer, text_layer) = match config.system.log_format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(false)
                    .without_time(),
            ),
            None,
        ),
        LogFormat::Text => (
            None,
            Some(fmt::layer().with_target(false).without_time().with_ansi(false)),
        ),
    };

    let result = Registry::default()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init();

    match result {
        Ok(()) => tracing::info!(service = service_name, "Tracing initialized"),
        // Someone else (a test harness, the runtime) installed one first.
        Err(e) => eprintln!("{}: tracing subscriber already set: {}", service_name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = PipelineConfig::default();
        init_tracing("test-service", &config);
        init_tracing("test-service", &config);
        assert!(TRACING_INITIALIZED.load(Ordering::SeqCst));
    }
}
