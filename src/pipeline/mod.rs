//! Pipeline components: context, walk loop, scan pool, aggregator, diagnostics.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod workers;

pub use context::{
    PipelineChannels, RecordBatch, WalkContext, create_pipeline_channels, record_diagnostic,
    take_diagnostics,
};
pub use error_handler::report_diagnostics;
pub use orchestrator::{
    DrainResult, PipelineHandles, drain_results, run_pipeline, shutdown_pipeline_handles,
};
pub use walk::{WalkOutcome, run_walk, run_walk_loop, to_outcome_jwalk, to_outcome_walkdir};
pub use workers::spawn_scan_workers;
