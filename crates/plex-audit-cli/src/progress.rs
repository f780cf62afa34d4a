use indicatif::{ProgressBar, ProgressStyle};
use plex_audit_core::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;

/// CLI progress reporter: one spinner per audit phase.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: &'static str) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_hierarchy_start(&self) {
        self.start_spinner("Reading library hierarchy...");
    }

    fn on_hierarchy_complete(&self, items: usize, groups: usize, duration_secs: f64) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Hierarchy: {} items, {} groups in {:.2}s",
            items, groups, duration_secs
        );
    }

    fn on_events_start(&self) {
        self.start_spinner("Reading view history...");
    }

    fn on_events_complete(&self, views: usize, duration_secs: f64) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Views: {} events in {:.2}s",
            views, duration_secs
        );
    }

    fn on_classify_complete(&self, decaying: usize) {
        eprintln!("  \x1b[32m✓\x1b[0m Classified: {} decaying items", decaying);
    }
}
