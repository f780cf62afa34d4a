use crate::storage::models::{GroupRollupRow, TopLevelRow};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, trace};

/// An intermediate grouping level, folded into its top-level item.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonGroup {
    pub group_id: i64,
    pub parent_key: String,
    pub title: String,
    pub total_size: u64,
    pub child_count: u64,
    pub average_bitrate: f64,
}

/// One audit unit: a movie, a show, an artist.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    pub key: String,
    pub title: String,
    /// First metadata id seen for the key.
    pub metadata_id: i64,
    pub total_size: u64,
    /// Earliest creation time among all rows sharing the key.
    pub created_at: i64,
    pub number_of_views: u64,
    /// Zero when never watched.
    pub last_watched_at: i64,
    pub seasons: Vec<SeasonGroup>,
    bitrate_weight: u64,
    bitrate_weighted_sum: f64,
}

impl LibraryItem {
    fn new(row: &TopLevelRow) -> Self {
        let mut item = Self {
            key: row.key.clone(),
            title: row.title.clone(),
            metadata_id: row.metadata_id,
            total_size: 0,
            created_at: row.created_at,
            number_of_views: 0,
            last_watched_at: 0,
            seasons: Vec::new(),
            bitrate_weight: 0,
            bitrate_weighted_sum: 0.0,
        };
        item.add_constituent(row.leaf_size, row.bitrate);
        item
    }

    fn add_constituent(&mut self, size: u64, bitrate: f64) {
        self.total_size += size;
        // Unknown bitrates stay out of the mean instead of dragging it to zero.
        if bitrate > 0.0 && size > 0 {
            self.bitrate_weight += size;
            self.bitrate_weighted_sum += size as f64 * bitrate;
        }
    }

    /// Size-weighted mean bitrate of the item's own media and its groups, in bits/s.
    pub fn average_bitrate(&self) -> f64 {
        if self.bitrate_weight == 0 {
            0.0
        } else {
            self.bitrate_weighted_sum / self.bitrate_weight as f64
        }
    }
}

/// Top-level items keyed by their stable identity.
pub type ItemArena = AHashMap<String, LibraryItem>;

/// Numeric metadata id → top-level key. Frozen once top-level ingestion ends.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    id_to_key: AHashMap<i64, String>,
}

impl KeyIndex {
    pub fn get(&self, metadata_id: i64) -> Option<&str> {
        self.id_to_key.get(&metadata_id).map(String::as_str)
    }
}

/// First phase: top-level rows only.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    items: ItemArena,
    id_to_key: AHashMap<i64, String>,
    merged_rows: usize,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows repeating a key are separate media files of one logical item:
    /// sizes add up and the earliest creation time wins.
    pub fn ingest_top_level_row(&mut self, row: &TopLevelRow) {
        match self.items.get_mut(&row.key) {
            Some(item) => {
                item.add_constituent(row.leaf_size, row.bitrate);
                item.created_at = item.created_at.min(row.created_at);
                self.merged_rows += 1;
                trace!("Merged duplicate row for '{}' (id {})", row.key, row.metadata_id);
            }
            None => {
                self.items.insert(row.key.clone(), LibraryItem::new(row));
            }
        }
        self.id_to_key.insert(row.metadata_id, row.key.clone());
    }

    pub fn finish(self) -> Hierarchy {
        debug!(
            "{} top-level items from {} ids ({} merged rows)",
            self.items.len(),
            self.id_to_key.len(),
            self.merged_rows
        );
        Hierarchy {
            items: self.items,
            index: KeyIndex {
                id_to_key: self.id_to_key,
            },
            merged_rows: self.merged_rows,
            seen_groups: AHashSet::new(),
            orphaned_groups: 0,
            duplicate_groups: 0,
        }
    }
}

/// Second phase: top-level items are fixed, groups roll into them.
#[derive(Debug)]
pub struct Hierarchy {
    pub(crate) items: ItemArena,
    index: KeyIndex,
    pub(crate) merged_rows: usize,
    seen_groups: AHashSet<i64>,
    pub(crate) orphaned_groups: usize,
    pub(crate) duplicate_groups: usize,
}

impl Hierarchy {
    /// Returns false when the group's parent is not a known top-level item,
    /// or when the group id was already attached. Either way the row is
    /// dropped and counted; the audit carries on.
    pub fn ingest_group_rollup_row(&mut self, row: &GroupRollupRow) -> bool {
        if self.seen_groups.contains(&row.group_id) {
            debug!("Group '{}' (id {}) already rolled up", row.title, row.group_id);
            self.duplicate_groups += 1;
            return false;
        }

        let Some(item) = self
            .index
            .get(row.parent_id)
            .and_then(|key| self.items.get_mut(key))
        else {
            debug!(
                "Group '{}' (id {}) has no top-level parent {}",
                row.title, row.group_id, row.parent_id
            );
            self.orphaned_groups += 1;
            return false;
        };

        item.add_constituent(row.summed_size, row.avg_bitrate);
        item.seasons.push(SeasonGroup {
            group_id: row.group_id,
            parent_key: item.key.clone(),
            title: row.title.clone(),
            total_size: row.summed_size,
            child_count: row.child_count,
            average_bitrate: row.avg_bitrate,
        });
        self.seen_groups.insert(row.group_id);
        true
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    pub fn items(&self) -> &ItemArena {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&LibraryItem> {
        self.items.get(key)
    }

    pub fn group_count(&self) -> usize {
        self.seen_groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(key: &str, id: i64, size: u64, created_at: i64) -> TopLevelRow {
        TopLevelRow {
            key: key.to_string(),
            metadata_id: id,
            title: format!("Title {}", key),
            created_at,
            leaf_size: size,
            bitrate: 0.0,
        }
    }

    fn group(parent_id: i64, group_id: i64, size: u64, bitrate: f64) -> GroupRollupRow {
        GroupRollupRow {
            parent_id,
            group_id,
            title: format!("Season {}", group_id),
            summed_size: size,
            child_count: 10,
            avg_bitrate: bitrate,
        }
    }

    #[test]
    fn test_duplicate_rows_merge() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("A", 1, 100, 1_000));
        builder.ingest_top_level_row(&top("A", 2, 50, 990));
        let hierarchy = builder.finish();

        let item = hierarchy.get("A").unwrap();
        assert_eq!(hierarchy.items().len(), 1);
        assert_eq!(item.total_size, 150);
        assert_eq!(item.created_at, 990);
        assert_eq!(item.metadata_id, 1);
        assert_eq!(hierarchy.merged_rows, 1);
        assert_eq!(hierarchy.index().get(2), Some("A"));
    }

    #[test]
    fn test_identical_row_twice_doubles_size_keeps_created() {
        let mut builder = HierarchyBuilder::new();
        let row = top("A", 1, 700, 5_000);
        builder.ingest_top_level_row(&row);
        builder.ingest_top_level_row(&row);
        let hierarchy = builder.finish();

        let item = hierarchy.get("A").unwrap();
        assert_eq!(item.total_size, 1_400);
        assert_eq!(item.created_at, 5_000);
    }

    #[test]
    fn test_groups_roll_into_parent() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("show", 10, 0, 0));
        let mut hierarchy = builder.finish();

        assert!(hierarchy.ingest_group_rollup_row(&group(10, 11, 300, 0.0)));
        assert!(hierarchy.ingest_group_rollup_row(&group(10, 12, 200, 0.0)));

        let item = hierarchy.get("show").unwrap();
        assert_eq!(item.total_size, 500);
        assert_eq!(item.seasons.iter().map(|s| s.total_size).sum::<u64>(), 500);
        assert_eq!(item.seasons.len(), 2);
        assert!(item.seasons.iter().all(|s| s.parent_key == "show"));
        assert_eq!(hierarchy.group_count(), 2);
    }

    #[test]
    fn test_repeated_group_is_added_once() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("show", 10, 0, 0));
        let mut hierarchy = builder.finish();

        assert!(hierarchy.ingest_group_rollup_row(&group(10, 11, 300, 0.0)));
        assert!(!hierarchy.ingest_group_rollup_row(&group(10, 11, 300, 0.0)));

        let item = hierarchy.get("show").unwrap();
        assert_eq!(item.seasons.len(), 1);
        assert_eq!(item.total_size, 300);
        assert_eq!(hierarchy.group_count(), 1);
        assert_eq!(hierarchy.duplicate_groups, 1);
    }

    #[test]
    fn test_group_reaches_merged_item_through_any_id() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("show", 10, 0, 0));
        builder.ingest_top_level_row(&top("show", 20, 0, 0));
        let mut hierarchy = builder.finish();

        assert!(hierarchy.ingest_group_rollup_row(&group(20, 21, 400, 0.0)));
        assert_eq!(hierarchy.get("show").unwrap().total_size, 400);
    }

    #[test]
    fn test_orphaned_group_is_skipped() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("show", 10, 25, 0));
        let mut hierarchy = builder.finish();

        assert!(!hierarchy.ingest_group_rollup_row(&group(99, 100, 300, 0.0)));
        assert_eq!(hierarchy.get("show").unwrap().total_size, 25);
        assert_eq!(hierarchy.orphaned_groups, 1);
        assert_eq!(hierarchy.group_count(), 0);
    }

    #[test]
    fn test_average_bitrate_is_size_weighted() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("show", 10, 0, 0));
        let mut hierarchy = builder.finish();

        hierarchy.ingest_group_rollup_row(&group(10, 11, 900, 10_000_000.0));
        hierarchy.ingest_group_rollup_row(&group(10, 12, 100, 2_000_000.0));
        // A group without a known bitrate does not pull the mean down.
        hierarchy.ingest_group_rollup_row(&group(10, 13, 500, 0.0));

        let avg = hierarchy.get("show").unwrap().average_bitrate();
        assert!((avg - 9_200_000.0).abs() < 1e-6, "got {}", avg);
    }

    #[test]
    fn test_average_bitrate_without_media_is_zero() {
        let mut builder = HierarchyBuilder::new();
        builder.ingest_top_level_row(&top("empty", 1, 0, 0));
        let hierarchy = builder.finish();
        assert_eq!(hierarchy.get("empty").unwrap().average_bitrate(), 0.0);
    }
}
