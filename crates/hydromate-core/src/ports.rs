//! Service contracts (traits) for the store's external collaborators.
//!
//! These traits form the boundary of the core: persistence, platform
//! alarms and notification delivery are consumed through them and never
//! reimplemented here. Live reads are `tokio::sync::watch` receivers --
//! each starts at the current value and observes every later write, which
//! is what keeps `AppState` a pure projection of persisted state.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::watch;

use crate::domain::{Cup, Day, LiquidUnit, Milliliters, Percent, Reminder, Theme};
use crate::error::Result;

/// Day-indexed hydration event log.
///
/// One record per calendar date. There is no partial-field update: the
/// store reads the full record, applies the change and writes it back,
/// and the single-writer store serializes those read-modify-write cycles.
#[async_trait]
pub trait HydrationHistory: Send + Sync {
    /// Upsert the record for `day.date`.
    async fn set_day(&self, day: Day) -> Result<()>;

    /// Live view of the record for `date`. Emits the current value
    /// immediately and again after every write to that date.
    fn day(&self, date: NaiveDate) -> watch::Receiver<Option<Day>>;

    /// Most recent days strictly before `start_date_exclusive`,
    /// newest first.
    async fn days_before(
        &self,
        start_date_exclusive: NaiveDate,
        page_size: usize,
    ) -> Result<Vec<Day>>;

    /// Days with `start_epoch_day <= date <= end_epoch_day` in ascending
    /// date order, capped at `limit` rows. Histories dense enough to
    /// overflow the cap are truncated, not an error.
    async fn days_in_range(
        &self,
        start_epoch_day: i64,
        end_epoch_day: i64,
        limit: usize,
    ) -> Result<Vec<Day>>;

    /// Delete the record for a single date.
    async fn delete(&self, date: NaiveDate) -> Result<()>;

    /// Delete every record.
    async fn clear(&self) -> Result<()>;
}

/// Key-value preference store with a live stream per preference.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    fn daily_goal(&self) -> watch::Receiver<Option<Milliliters>>;
    async fn set_daily_goal(&self, value: Milliliters) -> Result<()>;

    fn reminder(&self) -> watch::Receiver<Option<Reminder>>;
    async fn set_reminder(&self, value: Option<Reminder>) -> Result<()>;

    fn theme(&self) -> watch::Receiver<Theme>;
    async fn set_theme(&self, value: Theme) -> Result<()>;

    fn liquid_unit(&self) -> watch::Receiver<LiquidUnit>;
    async fn set_liquid_unit(&self, value: LiquidUnit) -> Result<()>;

    fn selected_cups(&self) -> watch::Receiver<Vec<Cup>>;
    async fn set_selected_cups(&self, cups: Vec<Cup>) -> Result<()>;

    fn height(&self) -> watch::Receiver<Option<String>>;
    async fn set_height(&self, value: String) -> Result<()>;

    fn weight(&self) -> watch::Receiver<Option<String>>;
    async fn set_weight(&self, value: String) -> Result<()>;

    /// Reset every preference to its default.
    async fn clear(&self) -> Result<()>;
}

/// Platform alarm primitive: "fire a callback at instant T, repeating
/// every 24 hours".
///
/// Alarms are keyed by their time-of-day, which is why the scheduler can
/// cancel by recomputation instead of keeping an installed-alarm
/// registry.
#[async_trait]
pub trait AlarmService: Send + Sync {
    /// Whether exact alarms may currently be scheduled. The platform may
    /// revoke or grant the permission at any time.
    fn can_schedule(&self) -> watch::Receiver<bool>;

    /// Install a daily-repeating alarm for `time`, first firing at
    /// `first_fire`.
    async fn install_repeating(&self, time: NaiveTime, first_fire: DateTime<Utc>) -> Result<()>;

    /// Remove the alarm keyed by `time`. Unknown times are a no-op.
    async fn cancel(&self, time: NaiveTime) -> Result<()>;
}

/// Reminder notification delivery.
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    /// Show (or replace) the hydration reminder notification.
    async fn show_reminder(
        &self,
        today: Milliliters,
        progress: Percent,
        cups: &[Cup],
        unit: LiquidUnit,
    ) -> Result<()>;

    /// Dismiss the hydration reminder notification if shown.
    async fn cancel_reminder(&self) -> Result<()>;

    /// Dismiss everything this app has shown.
    async fn clear(&self) -> Result<()>;
}
