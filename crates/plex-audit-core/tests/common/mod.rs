#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use plex_audit_core::storage::Database;
use rusqlite::params;

/// 2022-01-01
pub const OLD: i64 = 1_640_995_200;
/// 2024-01-01
pub const NEW: i64 = 1_704_067_200;
/// 2022-04-15
pub const OLD_VIEW: i64 = 1_650_000_000;
/// 2024-06-01
pub const RECENT_VIEW: i64 = 1_717_200_000;

pub const TV: i64 = 1;
pub const MOVIES: i64 = 2;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn empty_library() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute_batch(include_str!("../fixtures/plex_schema.sql"))
        .unwrap();
    db
}

pub fn add_section(db: &Database, id: i64, name: &str) {
    db.connection()
        .execute(
            "INSERT INTO library_sections (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .unwrap();
}

pub fn add_item(
    db: &Database,
    id: i64,
    section: i64,
    parent_id: Option<i64>,
    guid: &str,
    created_at: i64,
) {
    db.connection()
        .execute(
            "INSERT INTO metadata_items (id, library_section_id, parent_id, guid, title, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, section, parent_id, guid, format!("Item {}", id), created_at],
        )
        .unwrap();
}

pub fn add_media(db: &Database, item_id: i64, section: i64, size: i64, bitrate: i64) {
    db.connection()
        .execute(
            "INSERT INTO media_items (library_section_id, metadata_item_id, size, bitrate) \
             VALUES (?1, ?2, ?3, ?4)",
            params![section, item_id, size, bitrate],
        )
        .unwrap();
}

pub fn add_deleted_media(db: &Database, item_id: i64, section: i64, size: i64) {
    db.connection()
        .execute(
            "INSERT INTO media_items (library_section_id, metadata_item_id, size, bitrate, deleted_at) \
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![section, item_id, size, OLD],
        )
        .unwrap();
}

pub fn add_view(db: &Database, guid: &str, grandparent_guid: Option<&str>, viewed_at: i64) {
    db.connection()
        .execute(
            "INSERT INTO metadata_item_views (guid, grandparent_guid, viewed_at) VALUES (?1, ?2, ?3)",
            params![guid, grandparent_guid, viewed_at],
        )
        .unwrap();
}

/// Two sections.
///
/// TV Shows:
///   show/a   old, one season of two episodes (1000 @ 4Mb/s, 3000 @ 8Mb/s), watched long ago
///   show/b   old, one episode (2000), watched recently
///   show/c   created after the cutoff (500)
///   collection://x, ignored
///   a season whose show is missing (77), with one recent view
/// Movies:
///   movie/m  two items sharing a guid: 6000 + 4000 @ 10Mb/s and 500, one old view
///   movie/n  10500, never watched, plus a deleted file
pub fn seeded_library() -> Database {
    let db = empty_library();
    add_section(&db, TV, "TV Shows");
    add_section(&db, MOVIES, "Movies");

    add_item(&db, 100, TV, None, "plex://show/a", OLD);
    add_item(&db, 101, TV, Some(100), "plex://season/a1", OLD);
    add_item(&db, 102, TV, Some(101), "plex://episode/a1e1", OLD);
    add_item(&db, 103, TV, Some(101), "plex://episode/a1e2", OLD);
    add_media(&db, 102, TV, 1000, 4_000_000);
    add_media(&db, 103, TV, 3000, 8_000_000);
    add_view(&db, "plex://episode/a1e1", Some("plex://show/a"), OLD_VIEW);

    add_item(&db, 200, TV, None, "plex://show/b", OLD);
    add_item(&db, 201, TV, Some(200), "plex://season/b1", OLD);
    add_item(&db, 202, TV, Some(201), "plex://episode/b1e1", OLD);
    add_media(&db, 202, TV, 2000, 0);
    add_view(&db, "plex://episode/b1e1", Some("plex://show/b"), RECENT_VIEW);

    add_item(&db, 300, TV, None, "plex://show/c", NEW);
    add_item(&db, 301, TV, Some(300), "plex://season/c1", NEW);
    add_item(&db, 302, TV, Some(301), "plex://episode/c1e1", NEW);
    add_media(&db, 302, TV, 500, 0);

    add_item(&db, 400, TV, None, "collection://x", OLD);

    add_item(&db, 901, TV, Some(999), "plex://season/orphan", OLD);
    add_item(&db, 902, TV, Some(901), "plex://episode/orphan", OLD);
    add_media(&db, 902, TV, 77, 0);
    add_view(&db, "plex://episode/orphan", Some("plex://show/gone"), RECENT_VIEW);

    add_view(&db, "plex://episode/nowhere", Some("plex://show/nowhere"), RECENT_VIEW);

    add_item(&db, 500, MOVIES, None, "plex://movie/m", OLD);
    add_media(&db, 500, MOVIES, 6000, 10_000_000);
    add_media(&db, 500, MOVIES, 4000, 10_000_000);
    add_item(&db, 600, MOVIES, None, "plex://movie/m", OLD - 100);
    add_media(&db, 600, MOVIES, 500, 0);
    add_view(&db, "plex://movie/m", None, OLD_VIEW);

    add_item(&db, 700, MOVIES, None, "plex://movie/n", OLD);
    add_media(&db, 700, MOVIES, 10500, 10_000_000);
    add_deleted_media(&db, 700, MOVIES, 99_999);

    db
}
