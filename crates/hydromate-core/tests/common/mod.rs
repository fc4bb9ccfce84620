//! Shared doubles and store harness for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::watch;

use hydromate_core::{
    AlarmService, AppState, AppStore, Cup, LiquidUnit, Milliliters, Percent, ReminderNotifier,
    Result, SqliteHydrationHistory, SqlitePreferences, StoreDeps,
};

/// Alarm double mirroring the platform manager: one slot per
/// time-of-day, re-installation replaces, cancellation removes.
pub struct RecordingAlarms {
    can_schedule: watch::Sender<bool>,
    installed: Mutex<Vec<(NaiveTime, DateTime<Utc>)>>,
    cancelled: Mutex<Vec<NaiveTime>>,
}

impl RecordingAlarms {
    pub fn new(can_schedule: bool) -> Self {
        Self {
            can_schedule: watch::Sender::new(can_schedule),
            installed: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    pub fn set_can_schedule(&self, value: bool) {
        self.can_schedule.send_replace(value);
    }

    pub fn installed(&self) -> Vec<(NaiveTime, DateTime<Utc>)> {
        self.installed.lock().unwrap().clone()
    }

    pub fn installed_times(&self) -> Vec<NaiveTime> {
        self.installed().into_iter().map(|(t, _)| t).collect()
    }

    pub fn cancelled(&self) -> Vec<NaiveTime> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlarmService for RecordingAlarms {
    fn can_schedule(&self) -> watch::Receiver<bool> {
        self.can_schedule.subscribe()
    }

    async fn install_repeating(&self, time: NaiveTime, first_fire: DateTime<Utc>) -> Result<()> {
        let mut installed = self.installed.lock().unwrap();
        installed.retain(|(t, _)| *t != time);
        installed.push((time, first_fire));
        Ok(())
    }

    async fn cancel(&self, time: NaiveTime) -> Result<()> {
        self.installed.lock().unwrap().retain(|(t, _)| *t != time);
        self.cancelled.lock().unwrap().push(time);
        Ok(())
    }
}

/// Notifier double recording every delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<(Milliliters, f32)>>,
    cancelled: Mutex<usize>,
    cleared: Mutex<usize>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<(Milliliters, f32)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn cancelled_count(&self) -> usize {
        *self.cancelled.lock().unwrap()
    }

    pub fn cleared_count(&self) -> usize {
        *self.cleared.lock().unwrap()
    }
}

#[async_trait]
impl ReminderNotifier for RecordingNotifier {
    async fn show_reminder(
        &self,
        today: Milliliters,
        progress: Percent,
        _cups: &[Cup],
        _unit: LiquidUnit,
    ) -> Result<()> {
        self.shown.lock().unwrap().push((today, progress.value()));
        Ok(())
    }

    async fn cancel_reminder(&self) -> Result<()> {
        *self.cancelled.lock().unwrap() += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.cleared.lock().unwrap() += 1;
        Ok(())
    }
}

/// A store over in-memory ports with an injectable "today".
pub struct Harness {
    pub store: AppStore,
    pub history: Arc<SqliteHydrationHistory>,
    pub preferences: Arc<SqlitePreferences>,
    pub alarms: Arc<RecordingAlarms>,
    pub notifier: Arc<RecordingNotifier>,
    pub date_tx: watch::Sender<NaiveDate>,
}

pub fn start_store(today: NaiveDate, can_schedule: bool) -> Harness {
    let history = Arc::new(SqliteHydrationHistory::open_memory().unwrap());
    let preferences = Arc::new(SqlitePreferences::open_memory().unwrap());
    let alarms = Arc::new(RecordingAlarms::new(can_schedule));
    let notifier = Arc::new(RecordingNotifier::default());
    let date_tx = watch::Sender::new(today);

    let store = AppStore::start(StoreDeps {
        history: history.clone(),
        preferences: preferences.clone(),
        alarms: alarms.clone(),
        notifier: notifier.clone(),
        date_changed: date_tx.subscribe(),
    });

    Harness {
        store,
        history,
        preferences,
        alarms,
        notifier,
        date_tx,
    }
}

/// Await a state predicate, failing the test after one second.
pub async fn wait_for_state(store: &AppStore, predicate: impl Fn(&AppState) -> bool) {
    let mut rx = store.subscribe();
    let deadline = tokio::time::timeout(std::time::Duration::from_secs(1), async {
        loop {
            if predicate(&rx.borrow()) {
                return;
            }
            if rx.changed().await.is_err() {
                panic!("state stream closed before the expected transition");
            }
        }
    });
    deadline.await.expect("timed out waiting for state transition");
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
