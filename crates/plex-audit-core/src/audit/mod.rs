//! Rollup and classification of a library section.
//!
//! Phases run strictly in order, and each one consumes the previous:
//! [`HierarchyBuilder`] → [`Hierarchy`] → [`EventRollup`] → [`AuditState`].

pub mod decay;
pub mod events;
pub mod hierarchy;

pub use decay::{cutoff, Classification, DecayReport, DecayRow};
pub use events::{AuditState, EventRollup, ViewWindow};
pub use hierarchy::{Hierarchy, HierarchyBuilder, ItemArena, KeyIndex, LibraryItem, SeasonGroup};

/// Rows that were absorbed instead of aborting the audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Rows with the wrong shape, dropped at decode time.
    pub skipped_rows: usize,
    /// Top-level rows folded into an already-seen key.
    pub merged_duplicate_rows: usize,
    /// Groups whose parent is not a top-level item of the section.
    pub orphaned_groups: usize,
    /// Group rows repeating an id that was already rolled up.
    pub duplicate_groups: usize,
    /// Views of items outside the section.
    pub unmatched_views: usize,
}

impl DataQuality {
    /// Counts that point at a real data gap. Merges and unmatched views are
    /// expected in any healthy library and are not included.
    pub fn warnings(&self) -> usize {
        self.skipped_rows + self.orphaned_groups + self.duplicate_groups
    }
}
