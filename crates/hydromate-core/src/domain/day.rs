use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::amount::Milliliters;

/// A single logged drink. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationEntry {
    pub milliliters: Milliliters,
    pub at: DateTime<Utc>,
}

impl HydrationEntry {
    pub fn new(milliliters: Milliliters, at: DateTime<Utc>) -> HydrationEntry {
        HydrationEntry { milliliters, at }
    }
}

/// The durable record of all hydration events for one calendar date.
///
/// `goal` is a snapshot of the daily goal at last write, not a live
/// reference: historical days keep the goal that was active when they
/// were recorded. The `id` is assigned once at creation and preserved by
/// every read-modify-write so upserts stay idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    /// Logged drinks in insertion order.
    pub hydration: Vec<HydrationEntry>,
    pub goal: Milliliters,
    pub id: String,
}

impl Day {
    /// Create an empty day record for `date` with the current goal.
    pub fn new(date: NaiveDate, goal: Milliliters) -> Day {
        Day {
            date,
            hydration: Vec::new(),
            goal,
            id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Sum of all entries for this day.
    pub fn total(&self) -> Milliliters {
        self.hydration.iter().map(|entry| entry.milliliters).sum()
    }

    /// Append a new entry.
    pub fn push_entry(&mut self, entry: HydrationEntry) {
        self.hydration.push(entry);
    }

    /// Remove the most recently logged entry, if any.
    pub fn pop_latest(&mut self) -> Option<HydrationEntry> {
        self.hydration.pop()
    }

    /// Drop all entries, keeping date, goal and id.
    pub fn clear_entries(&mut self) {
        self.hydration.clear();
    }
}

/// Days since the Unix epoch for `date`. The storage key for day records.
pub fn epoch_day(date: NaiveDate) -> i64 {
    (date - NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date")).num_days()
}

/// Inverse of [`epoch_day`]. Out-of-range input falls back to the epoch.
pub fn from_epoch_day(days: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .expect("epoch date")
        .checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}
