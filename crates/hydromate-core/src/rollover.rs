//! Day rollover signal.
//!
//! The store re-derives "today" from this watch channel: the watcher
//! task sleeps until the next local midnight and publishes the new date,
//! repeating until every receiver is gone.

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use tokio::sync::watch;

/// Spawn the midnight watcher and return its date stream.
///
/// The receiver starts at today's local date. The spawned task exits on
/// its own once all receivers are dropped.
pub fn spawn_midnight_watcher() -> watch::Receiver<NaiveDate> {
    let (tx, rx) = watch::channel(Local::now().date_naive());
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_midnight()).await;
            if tx.send(Local::now().date_naive()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Wall-clock duration until the next local midnight.
///
/// Falls back to one minute when the midnight instant cannot be resolved
/// in the local timezone, so the loop keeps making progress.
fn until_next_midnight() -> std::time::Duration {
    let now = Local::now();
    let tomorrow = now.date_naive() + Duration::days(1);
    let midnight = tomorrow.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .and_then(|instant| (instant - now).to_std().ok())
        .unwrap_or(std::time::Duration::from_secs(60))
}
