//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation run.

use council_domain::Phase;

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, progress bars, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when a call completes within a stage
    fn on_task_complete(&self, phase: &Phase, label: &str, success: bool);

    /// Called when a stage completes
    fn on_phase_complete(&self, phase: &Phase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _label: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
