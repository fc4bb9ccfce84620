//! Reminder alarm scheduling.
//!
//! Converts a [`Reminder`] window into concrete trigger times and
//! programs them into the platform [`AlarmService`]:
//! - trigger times are pure functions of the reminder, so the installed
//!   set can always be regenerated for cancellation -- no alarm registry
//! - programming is cancel-then-install and therefore idempotent
//! - a trigger time that has already passed today first fires tomorrow;
//!   every alarm repeats daily

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

use crate::domain::Reminder;
use crate::error::{Result, SchedulingError};
use crate::ports::{AlarmService, PreferenceStore};

/// The times-of-day at which `reminder` fires.
///
/// Every `interval` starting at `start`, inclusive of `start`; a time
/// landing exactly on `end` is included, the first time past `end` stops
/// the sequence. The window never wraps midnight (`start < end` is a
/// construction invariant).
pub fn trigger_times(reminder: &Reminder) -> Vec<NaiveTime> {
    let start_secs = i64::from(reminder.start().num_seconds_from_midnight());
    let end_secs = i64::from(reminder.end().num_seconds_from_midnight());
    let step_secs = i64::from(reminder.interval_minutes()) * 60;

    let mut times = Vec::new();
    let mut offset = 0;
    while start_secs + offset <= end_secs {
        times.push(reminder.start() + Duration::seconds(offset));
        offset += step_secs;
    }
    times
}

/// One alarm to install: its time-of-day key and the first absolute
/// instant it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSpec {
    pub time: NaiveTime,
    pub first_fire: DateTime<Utc>,
}

/// Resolve `reminder` into installable alarms relative to `now`.
///
/// A trigger time at or before the current time-of-day first fires on
/// the next calendar date; a local time made ambiguous or skipped by a
/// DST transition resolves to the earliest valid instant.
pub fn program<Tz>(reminder: &Reminder, now: DateTime<Tz>) -> Vec<AlarmSpec>
where
    Tz: TimeZone,
{
    let local_now: NaiveDateTime = now.naive_local();
    trigger_times(reminder)
        .into_iter()
        .filter_map(|time| {
            let date = if time <= local_now.time() {
                local_now.date() + Duration::days(1)
            } else {
                local_now.date()
            };
            now.timezone()
                .from_local_datetime(&date.and_time(time))
                .earliest()
                .map(|instant| AlarmSpec {
                    time,
                    first_fire: instant.with_timezone(&Utc),
                })
        })
        .collect()
}

/// Programs reminder alarms against the platform alarm service.
///
/// Stateless by recomputation: both installation and cancellation derive
/// the full time set from the reminder itself, so redundant calls are
/// always safe.
pub struct ReminderScheduler {
    alarms: Arc<dyn AlarmService>,
    preferences: Arc<dyn PreferenceStore>,
}

impl ReminderScheduler {
    pub fn new(alarms: Arc<dyn AlarmService>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self { alarms, preferences }
    }

    /// Whether the platform currently allows exact alarm scheduling.
    pub fn can_schedule(&self) -> bool {
        *self.alarms.can_schedule().borrow()
    }

    /// Cancel whatever the persisted reminder installed, then install
    /// `reminder`.
    ///
    /// # Errors
    /// Returns [`SchedulingError::PermissionDenied`] when the platform
    /// permission is missing. Callers must check `can_schedule` first;
    /// this is a precondition failure, not a retryable error.
    pub async fn set_alarm<Tz>(&self, reminder: &Reminder, now: DateTime<Tz>) -> Result<()>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send,
    {
        self.clear().await?;
        if !self.can_schedule() {
            return Err(SchedulingError::PermissionDenied.into());
        }
        for spec in program(reminder, now) {
            self.alarms.install_repeating(spec.time, spec.first_fire).await?;
        }
        Ok(())
    }

    /// Cancel all alarms belonging to the persisted reminder, if any.
    ///
    /// Reads the reminder from preferences and regenerates its trigger
    /// times, so every installed alarm is found without a registry.
    pub async fn clear(&self) -> Result<()> {
        let reminder = { self.preferences.reminder().borrow().clone() };
        let Some(reminder) = reminder else {
            return Ok(());
        };
        for time in trigger_times(&reminder) {
            self.alarms.cancel(time).await?;
        }
        Ok(())
    }
}
