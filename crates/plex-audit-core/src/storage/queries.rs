use super::models::*;
use super::source::{RowBatch, RowSource};
use super::sqlite::Database;
use crate::error::{Error, Stage};
use rusqlite::types::ValueRef;
use rusqlite::{params, Params, Row};
use tracing::{debug, warn};

const SECTION_SUMMARY_SQL: &str = "\
    SELECT library_section_id, ls.name, coalesce(sum(size), 0) AS s \
    FROM media_items \
    INNER JOIN library_sections ls ON ls.id = library_section_id \
    WHERE deleted_at IS NULL AND library_section_id > 0 \
    GROUP BY library_section_id \
    ORDER BY s DESC, library_section_id ASC";

const TOP_LEVEL_SQL: &str = "\
    SELECT mi.guid, mi.id, mi.title, coalesce(mi.created_at, 0), \
           coalesce(media.size, 0), coalesce(media.bitrate, 0) \
    FROM metadata_items mi \
    LEFT JOIN media_items media \
           ON media.metadata_item_id = mi.id AND media.deleted_at IS NULL \
    WHERE mi.guid NOT LIKE 'collection://%' \
      AND mi.parent_id IS NULL \
      AND mi.library_section_id = ?1 \
    ORDER BY mi.id, media.id";

// Bitrate is weighted by size over the media that report one.
const GROUP_ROLLUP_SQL: &str = "\
    SELECT coalesce(grp.parent_id, 0), grp.id, grp.title, \
           coalesce(sum(media.size), 0) AS size, count(1) AS count, \
           coalesce(sum(coalesce(media.size, 0) * coalesce(media.bitrate, 0)) * 1.0 \
                    / nullif(sum(CASE WHEN coalesce(media.bitrate, 0) > 0 \
                                      THEN coalesce(media.size, 0) ELSE 0 END), 0), 0) \
    FROM media_items media \
    INNER JOIN metadata_items leaf ON media.metadata_item_id = leaf.id \
    INNER JOIN metadata_items grp ON grp.id = leaf.parent_id \
    WHERE leaf.library_section_id = ?1 AND media.deleted_at IS NULL \
    GROUP BY grp.id";

// Items sharing a guid are collapsed first so one view yields one row.
const VIEW_EVENTS_SQL: &str = "\
    SELECT coalesce(miv.grandparent_guid, ''), \
           coalesce((SELECT sum(media.size) FROM media_items media \
                     WHERE media.metadata_item_id = mi.id), 0), \
           miv.guid, coalesce(mi.parent_id, 0), miv.viewed_at \
    FROM metadata_item_views AS miv \
    INNER JOIN (SELECT guid, min(id) AS id, min(parent_id) AS parent_id \
                FROM metadata_items WHERE library_section_id = ?1 GROUP BY guid) mi \
            ON mi.guid = miv.guid \
    WHERE miv.viewed_at > 0 \
    ORDER BY miv.viewed_at ASC, miv.id ASC";

impl RowSource for Database {
    fn section_summaries(&self) -> Result<RowBatch<SectionSummary>, Error> {
        self.collect_rows(Stage::SectionSummary, SECTION_SUMMARY_SQL, params![], |row| {
            Ok(SectionSummary {
                section_id: column_i64(row, 0)?,
                name: row.get(1)?,
                total_size: column_size(row, 2)?,
            })
        })
    }

    fn top_level_rows(&self, section_id: i64) -> Result<RowBatch<TopLevelRow>, Error> {
        self.collect_rows(Stage::TopLevelItems, TOP_LEVEL_SQL, params![section_id], |row| {
            Ok(TopLevelRow {
                key: row.get(0)?,
                metadata_id: column_i64(row, 1)?,
                title: row.get(2)?,
                created_at: column_i64(row, 3)?,
                leaf_size: column_size(row, 4)?,
                bitrate: row.get(5)?,
            })
        })
    }

    fn group_rollup_rows(&self, section_id: i64) -> Result<RowBatch<GroupRollupRow>, Error> {
        self.collect_rows(Stage::GroupRollup, GROUP_ROLLUP_SQL, params![section_id], |row| {
            Ok(GroupRollupRow {
                parent_id: column_i64(row, 0)?,
                group_id: column_i64(row, 1)?,
                title: row.get(2)?,
                summed_size: column_size(row, 3)?,
                child_count: column_size(row, 4)?,
                avg_bitrate: row.get(5)?,
            })
        })
    }

    fn view_event_rows(&self, section_id: i64) -> Result<RowBatch<ViewEventRow>, Error> {
        self.collect_rows(Stage::ViewEvents, VIEW_EVENTS_SQL, params![section_id], |row| {
            Ok(ViewEventRow {
                redirect_key: row.get(0)?,
                leaf_size: column_size(row, 1)?,
                subject_key: row.get(2)?,
                parent_id: column_i64(row, 3)?,
                viewed_at: column_i64(row, 4)?,
            })
        })
    }
}

impl Database {
    /// Run one query to exhaustion. Rows with the wrong shape are skipped and
    /// counted; any other failure aborts the query.
    fn collect_rows<T, P, F>(
        &self,
        stage: Stage,
        sql: &str,
        params: P,
        decode: F,
    ) -> Result<RowBatch<T>, Error>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.connection().prepare(sql).map_err(Error::query(stage))?;
        let rows = stmt.query_map(params, decode).map_err(Error::query(stage))?;

        let mut batch = RowBatch::default();
        for row in rows {
            match row {
                Ok(row) => batch.rows.push(row),
                Err(e) if is_decode_error(&e) => {
                    warn!("Skipping undecodable {} row: {}", stage, e);
                    batch.skipped += 1;
                }
                Err(e) => return Err(Error::Query { stage, source: e }),
            }
        }

        debug!(
            "{} query returned {} rows ({} skipped)",
            stage,
            batch.rows.len(),
            batch.skipped
        );
        Ok(batch)
    }
}

fn is_decode_error(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::Utf8Error(..)
    )
}

/// Integer column that older library versions sometimes store as REAL.
fn column_i64(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    match row.get_ref(idx)? {
        ValueRef::Integer(v) => Ok(v),
        ValueRef::Real(v) => Ok(v as i64),
        other => {
            let name = row.as_ref().column_name(idx).unwrap_or("?").to_string();
            Err(rusqlite::Error::InvalidColumnType(idx, name, other.data_type()))
        }
    }
}

/// Byte counts and tallies. Negative values are clamped to zero.
fn column_size(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    column_i64(row, idx).map(|v| v.max(0) as u64)
}
