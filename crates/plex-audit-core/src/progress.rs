/// Trait for reporting audit progress.
///
/// The CLI implements it with indicatif spinners. All methods have default
/// no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_hierarchy_start(&self) {}
    fn on_hierarchy_complete(&self, _items: usize, _groups: usize, _duration_secs: f64) {}
    fn on_events_start(&self) {}
    fn on_events_complete(&self, _views: usize, _duration_secs: f64) {}
    fn on_classify_complete(&self, _decaying: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
