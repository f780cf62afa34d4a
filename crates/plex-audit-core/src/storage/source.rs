use super::models::{GroupRollupRow, SectionSummary, TopLevelRow, ViewEventRow};
use crate::error::Error;

/// Rows from one query plus the number that could not be decoded.
#[derive(Debug, Clone)]
pub struct RowBatch<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

impl<T> RowBatch<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows, skipped: 0 }
    }
}

impl<T> Default for RowBatch<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Read-only access to the library catalog and view history.
///
/// `Database` is the production implementation; tests can feed rows directly.
pub trait RowSource {
    fn section_summaries(&self) -> Result<RowBatch<SectionSummary>, Error>;
    fn top_level_rows(&self, section_id: i64) -> Result<RowBatch<TopLevelRow>, Error>;
    fn group_rollup_rows(&self, section_id: i64) -> Result<RowBatch<GroupRollupRow>, Error>;
    /// Views ordered by `viewed_at` ascending, `viewed_at > 0` only.
    fn view_event_rows(&self, section_id: i64) -> Result<RowBatch<ViewEventRow>, Error>;
}
