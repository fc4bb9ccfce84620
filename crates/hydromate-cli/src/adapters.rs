//! Desktop implementations of the platform ports.
//!
//! On mobile the alarm and notification ports are backed by the OS; the
//! CLI substitutes terminal equivalents so the same store runs unchanged.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use tokio::sync::watch;

use hydromate_core::notify::reminder_message;
use hydromate_core::{AlarmService, Cup, LiquidUnit, Milliliters, Percent, ReminderNotifier, Result};

/// Alarm port for the desktop: there is no wakeup scheduler to program,
/// so installations are only logged. Scheduling is always permitted.
pub struct DesktopAlarms {
    can_schedule: watch::Sender<bool>,
}

impl DesktopAlarms {
    pub fn new() -> Self {
        Self {
            can_schedule: watch::Sender::new(true),
        }
    }
}

#[async_trait]
impl AlarmService for DesktopAlarms {
    fn can_schedule(&self) -> watch::Receiver<bool> {
        self.can_schedule.subscribe()
    }

    async fn install_repeating(&self, time: NaiveTime, first_fire: DateTime<Utc>) -> Result<()> {
        log::debug!("installed daily alarm {time} (first fire {first_fire})");
        Ok(())
    }

    async fn cancel(&self, time: NaiveTime) -> Result<()> {
        log::debug!("cancelled daily alarm {time}");
        Ok(())
    }
}

/// Notifier port for the desktop: reminders print to the terminal.
pub struct ConsoleNotifier;

#[async_trait]
impl ReminderNotifier for ConsoleNotifier {
    async fn show_reminder(
        &self,
        today: Milliliters,
        progress: Percent,
        cups: &[Cup],
        unit: LiquidUnit,
    ) -> Result<()> {
        println!("{}", reminder_message(today));
        println!("{} ({})", today.format(unit), progress.format());
        let quick_adds: Vec<String> = cups.iter().map(|cup| cup.format(unit)).collect();
        if !quick_adds.is_empty() {
            println!("quick add: {}", quick_adds.join(", "));
        }
        Ok(())
    }

    async fn cancel_reminder(&self) -> Result<()> {
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
