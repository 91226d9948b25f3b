//! Batch orchestration: scan, skip-check, analyze, record, one file at a time.

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{BatchOrchestrator, OrchestratorOptions};
pub use progress::BatchProgress;
