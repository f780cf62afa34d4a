//! Flat rows as they come out of the library database, before any rollup.

/// Total media size of one library section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSummary {
    pub section_id: i64,
    pub name: String,
    pub total_size: u64,
}

/// An item with no parent (movie, show, artist), one row per media file.
#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelRow {
    pub key: String,
    pub metadata_id: i64,
    pub title: String,
    pub created_at: i64,
    pub leaf_size: u64,
    pub bitrate: f64,
}

/// One intermediate grouping (season, album) with its leaves summed.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRollupRow {
    pub parent_id: i64,
    pub group_id: i64,
    pub title: String,
    pub summed_size: u64,
    pub child_count: u64,
    pub avg_bitrate: f64,
}

/// A single playback of a leaf item.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewEventRow {
    /// Top-level ancestor the view belongs to. Empty when the leaf is itself top-level.
    pub redirect_key: String,
    pub leaf_size: u64,
    pub subject_key: String,
    pub parent_id: i64,
    pub viewed_at: i64,
}
