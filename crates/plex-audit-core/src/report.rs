//! Display values for report rows. Nothing here feeds back into sorting.

use crate::audit::DecayRow;
use crate::storage::models::SectionSummary;
use chrono::DateTime;
use indicatif::HumanCount;
use serde::Serialize;
use tabled::Tabled;

const BYTES_PER_CENTI_GB: f64 = 10.0 * 1000.0 * 1000.0;
const BITS_PER_MBIT: f64 = 1000.0 * 1000.0;

/// Decimal gigabytes, two places, with thousands separators.
pub fn format_gb(bytes: u64) -> String {
    let hundredths = (bytes as f64 / BYTES_PER_CENTI_GB).round() as u64;
    format!("{}.{:02}", HumanCount(hundredths / 100), hundredths % 100)
}

/// Megabits per second, one place.
pub fn format_mbps(bits_per_sec: f64) -> String {
    format!("{:.1}", bits_per_sec / BITS_PER_MBIT)
}

/// `YYYY-MM-DD` in UTC. Zero or negative timestamps mean "never".
pub fn format_date(epoch_secs: i64) -> String {
    if epoch_secs <= 0 {
        return "never".to_string();
    }
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "invalid".to_string(),
    }
}

pub fn format_optional_date(epoch_secs: Option<i64>) -> String {
    epoch_secs.map_or_else(|| "never".to_string(), format_date)
}

/// One decaying item as shown to the user and written to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DisplayRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub title: String,
    #[tabled(rename = "Size (Gb)")]
    pub size_gb: String,
    #[tabled(rename = "Bitrate (Mb/s)")]
    pub bitrate_mbps: String,
    #[tabled(rename = "Created")]
    pub created: String,
    #[tabled(rename = "Last Watched")]
    pub last_watched: String,
}

impl From<&DecayRow> for DisplayRow {
    fn from(row: &DecayRow) -> Self {
        Self {
            id: row.metadata_id,
            title: row.title.clone(),
            size_gb: format_gb(row.total_size),
            bitrate_mbps: format_mbps(row.average_bitrate),
            created: format_date(row.created_at),
            last_watched: format_date(row.last_watched_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SectionRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Library Name")]
    pub name: String,
    #[tabled(rename = "Size in Gb")]
    pub size_gb: String,
}

impl From<&SectionSummary> for SectionRow {
    fn from(section: &SectionSummary) -> Self {
        Self {
            id: section.section_id,
            name: section.name.clone(),
            size_gb: format_gb(section.total_size),
        }
    }
}
