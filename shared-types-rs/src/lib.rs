// shared-types-rs/src/lib.rs
// Types threaded through the AI pipeline steps and the ambient plumbing
// (configuration, errors, tracing, execution context) they share.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod records;
pub mod telemetry;

pub use config::{ConfigError, PipelineConfig};
pub use context::{ExecutionContext, FixedContext};
pub use error::{PipelineError, Result};
pub use event::{PipelineEvent, fields};
pub use records::{Complexity, EnhancedResponse, InputAnalysis, LogEntry, LogStatus};
