use super::events::{AuditState, ViewWindow};
use super::hierarchy::LibraryItem;
use crate::error::Error;
use chrono::{DateTime, Months, Utc};
use std::cmp::Ordering;
use tracing::debug;

/// `now` minus `window_months` calendar months. The day of month is clamped
/// to the length of the target month (Aug 31 - 6 months = Feb 28/29).
pub fn cutoff(now: DateTime<Utc>, window_months: u32) -> Result<DateTime<Utc>, Error> {
    if window_months == 0 {
        return Err(Error::InvalidWindow(window_months));
    }
    now.checked_sub_months(Months::new(window_months))
        .ok_or_else(|| Error::InvalidDate(format!("{} minus {} months", now, window_months)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Old enough, and not watched since the cutoff.
    Decaying,
    /// Old enough, but watched at or after the cutoff.
    Healthy,
    /// Created after the cutoff; not judged.
    TooNew,
}

impl Classification {
    pub fn of(created_at: i64, last_watched_at: i64, cutoff: i64) -> Self {
        if created_at > cutoff {
            Classification::TooNew
        } else if last_watched_at < cutoff {
            Classification::Decaying
        } else {
            Classification::Healthy
        }
    }
}

/// A decaying item with raw values. Formatting lives in [`crate::report`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecayRow {
    pub key: String,
    pub metadata_id: i64,
    pub title: String,
    pub total_size: u64,
    pub average_bitrate: f64,
    pub created_at: i64,
    pub last_watched_at: i64,
    pub number_of_views: u64,
    pub season_count: usize,
}

impl From<&LibraryItem> for DecayRow {
    fn from(item: &LibraryItem) -> Self {
        Self {
            key: item.key.clone(),
            metadata_id: item.metadata_id,
            title: item.title.clone(),
            total_size: item.total_size,
            average_bitrate: item.average_bitrate(),
            created_at: item.created_at,
            last_watched_at: item.last_watched_at,
            number_of_views: item.number_of_views,
            season_count: item.seasons.len(),
        }
    }
}

/// Largest first, then by key so equal sizes always come out the same way.
fn reclaim_order(a: &DecayRow, b: &DecayRow) -> Ordering {
    b.total_size
        .cmp(&a.total_size)
        .then_with(|| a.key.cmp(&b.key))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecayReport {
    /// Epoch seconds.
    pub cutoff: i64,
    pub oldest_view: Option<i64>,
    pub newest_view: Option<i64>,
    pub rows: Vec<DecayRow>,
    pub healthy: usize,
    pub too_new: usize,
}

impl DecayReport {
    pub fn reclaimable_bytes(&self) -> u64 {
        self.rows.iter().map(|r| r.total_size).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl AuditState {
    pub fn classify(&self, now: DateTime<Utc>, window_months: u32) -> Result<DecayReport, Error> {
        let cutoff = cutoff(now, window_months)?;
        debug!("Decay cutoff {} ({} months before {})", cutoff, window_months, now);
        Ok(self.classify_at(cutoff.timestamp()))
    }

    /// Classify against a cutoff in epoch seconds.
    pub fn classify_at(&self, cutoff: i64) -> DecayReport {
        let ViewWindow { oldest, newest } = self.window;
        let mut report = DecayReport {
            cutoff,
            oldest_view: oldest,
            newest_view: newest,
            rows: Vec::new(),
            healthy: 0,
            too_new: 0,
        };

        for item in self.items.values() {
            match Classification::of(item.created_at, item.last_watched_at, cutoff) {
                Classification::Decaying => report.rows.push(DecayRow::from(item)),
                Classification::Healthy => report.healthy += 1,
                Classification::TooNew => report.too_new += 1,
            }
        }

        report.rows.sort_by(reclaim_order);
        report
    }
}
