use super::hierarchy::{Hierarchy, ItemArena, LibraryItem};
use super::DataQuality;
use crate::storage::models::ViewEventRow;
use tracing::{debug, trace};

/// Bounds of the view history that was fed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewWindow {
    pub oldest: Option<i64>,
    pub newest: Option<i64>,
}

impl ViewWindow {
    /// Tracks min and max directly, so callers need not sort their events.
    pub fn observe(&mut self, viewed_at: i64) {
        if viewed_at <= 0 {
            return;
        }
        self.oldest = Some(self.oldest.map_or(viewed_at, |t| t.min(viewed_at)));
        self.newest = Some(self.newest.map_or(viewed_at, |t| t.max(viewed_at)));
    }
}

/// Third phase: views are attributed to top-level items.
#[derive(Debug)]
pub struct EventRollup {
    items: ItemArena,
    window: ViewWindow,
    quality: DataQuality,
    matched: usize,
}

impl Hierarchy {
    pub fn into_event_rollup(self) -> EventRollup {
        debug!(
            "Hierarchy complete: {} items, {} groups, {} orphaned",
            self.items.len(),
            self.group_count(),
            self.orphaned_groups
        );
        EventRollup {
            items: self.items,
            window: ViewWindow::default(),
            quality: DataQuality {
                merged_duplicate_rows: self.merged_rows,
                orphaned_groups: self.orphaned_groups,
                duplicate_groups: self.duplicate_groups,
                ..DataQuality::default()
            },
            matched: 0,
        }
    }
}

impl EventRollup {
    /// Attribute one view. A non-empty `redirect_key` names the top-level
    /// ancestor and always wins over `subject_key`. Returns false when the
    /// effective key is not in the section; such views are expected.
    pub fn ingest_view_event(
        &mut self,
        subject_key: &str,
        redirect_key: &str,
        viewed_at: i64,
    ) -> bool {
        self.window.observe(viewed_at);

        let key = if redirect_key.is_empty() {
            subject_key
        } else {
            redirect_key
        };

        match self.items.get_mut(key) {
            Some(item) => {
                item.number_of_views += 1;
                item.last_watched_at = item.last_watched_at.max(viewed_at);
                self.matched += 1;
                true
            }
            None => {
                trace!("View of '{}' at {} matches no item", key, viewed_at);
                self.quality.unmatched_views += 1;
                false
            }
        }
    }

    pub fn ingest_row(&mut self, row: &ViewEventRow) -> bool {
        self.ingest_view_event(&row.subject_key, &row.redirect_key, row.viewed_at)
    }

    pub fn finish(self) -> AuditState {
        debug!(
            "Views attributed: {} matched, {} unmatched",
            self.matched, self.quality.unmatched_views
        );
        AuditState {
            items: self.items,
            window: self.window,
            quality: self.quality,
        }
    }
}

/// Fully rolled-up section, ready for classification.
#[derive(Debug)]
pub struct AuditState {
    pub(crate) items: ItemArena,
    pub(crate) window: ViewWindow,
    pub(crate) quality: DataQuality,
}

impl AuditState {
    pub fn items(&self) -> &ItemArena {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&LibraryItem> {
        self.items.get(key)
    }

    pub fn window(&self) -> ViewWindow {
        self.window
    }

    pub fn quality(&self) -> DataQuality {
        self.quality
    }

    pub(crate) fn add_skipped_rows(&mut self, skipped: usize) {
        self.quality.skipped_rows += skipped;
    }
}
