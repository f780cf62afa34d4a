use crate::audit::{AuditState, DataQuality, DecayReport, HierarchyBuilder};
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::storage::models::SectionSummary;
use crate::storage::RowSource;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct AuditEngine {
    window_months: u32,
}

#[derive(Debug)]
pub struct AuditResult {
    pub section_id: i64,
    pub report: DecayReport,
    pub quality: DataQuality,
    pub item_count: usize,
    pub hierarchy_duration: Duration,
    pub events_duration: Duration,
}

impl AuditEngine {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            window_months: config.window_months,
        }
    }

    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = months;
        self
    }

    pub fn window_months(&self) -> u32 {
        self.window_months
    }

    /// Run the audit for one section:
    /// 1. Top-level rows, then group rollups into the frozen id index
    /// 2. View events attributed to top-level keys
    /// 3. Decay classification against `now - window_months`
    pub fn run_section<S: RowSource>(
        &self,
        source: &S,
        section_id: i64,
        now: DateTime<Utc>,
        reporter: &dyn ProgressReporter,
    ) -> Result<AuditResult, Error> {
        if self.window_months == 0 {
            return Err(Error::InvalidWindow(self.window_months));
        }
        info!("Auditing section {}...", section_id);

        // Phase 1: Hierarchy
        reporter.on_hierarchy_start();
        let hierarchy_start = Instant::now();
        let top_level = source.top_level_rows(section_id)?;
        let mut builder = HierarchyBuilder::new();
        for row in &top_level.rows {
            builder.ingest_top_level_row(row);
        }
        let mut hierarchy = builder.finish();

        let groups = source.group_rollup_rows(section_id)?;
        for row in &groups.rows {
            hierarchy.ingest_group_rollup_row(row);
        }
        let hierarchy_duration = hierarchy_start.elapsed();
        reporter.on_hierarchy_complete(
            hierarchy.items().len(),
            hierarchy.group_count(),
            hierarchy_duration.as_secs_f64(),
        );

        // Phase 2: Views
        reporter.on_events_start();
        let events_start = Instant::now();
        let views = source.view_event_rows(section_id)?;
        let mut rollup = hierarchy.into_event_rollup();
        for row in &views.rows {
            rollup.ingest_row(row);
        }
        let mut state: AuditState = rollup.finish();
        state.add_skipped_rows(top_level.skipped + groups.skipped + views.skipped);
        let events_duration = events_start.elapsed();
        reporter.on_events_complete(views.rows.len(), events_duration.as_secs_f64());

        // Phase 3: Classify
        let report = state.classify(now, self.window_months)?;
        reporter.on_classify_complete(report.len());

        let quality = state.quality();
        if quality.warnings() > 0 {
            warn!(
                "Section {}: {} undecodable rows skipped, {} groups without a top-level parent, \
                 {} repeated groups",
                section_id, quality.skipped_rows, quality.orphaned_groups, quality.duplicate_groups
            );
        }
        debug!(
            "Section {}: {} decaying, {} healthy, {} too new",
            section_id,
            report.len(),
            report.healthy,
            report.too_new
        );

        Ok(AuditResult {
            section_id,
            item_count: state.items().len(),
            report,
            quality,
            hierarchy_duration,
            events_duration,
        })
    }

    pub fn sections<S: RowSource>(&self, source: &S) -> Result<Vec<SectionSummary>, Error> {
        let batch = source.section_summaries()?;
        if batch.skipped > 0 {
            warn!("{} section rows could not be decoded", batch.skipped);
        }
        Ok(batch.rows)
    }
}
