//! Progress notification port
//!
//! Defines the interface for reporting coarse stage-level progress during
//! a non-streaming council run. Implementations live in the presentation
//! layer (console progress bars, plain text, etc.).

use council_domain::Stage;

/// Callback for progress updates during council execution
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts, with the number of fan-out targets.
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when one model settles within a stage.
    fn on_model_complete(&self, stage: Stage, model: &str, success: bool);

    /// Called when a stage's fan-out has fully settled.
    fn on_stage_complete(&self, stage: Stage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_model_complete(&self, _stage: Stage, _model: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
