//! Store construction for CLI commands.

use std::sync::Arc;

use hydromate_core::rollover::spawn_midnight_watcher;
use hydromate_core::{AppStore, SqliteHydrationHistory, SqlitePreferences, StoreDeps};

use crate::adapters::{ConsoleNotifier, DesktopAlarms};

/// Open the on-disk stores and start an [`AppStore`] over them.
pub fn open_store() -> Result<AppStore, Box<dyn std::error::Error>> {
    let history = Arc::new(SqliteHydrationHistory::open()?);
    let preferences = Arc::new(SqlitePreferences::open()?);
    Ok(AppStore::start(StoreDeps {
        history,
        preferences,
        alarms: Arc::new(DesktopAlarms::new()),
        notifier: Arc::new(ConsoleNotifier),
        date_changed: spawn_midnight_watcher(),
    }))
}

/// Open just the history store for read-only listings.
pub fn open_history() -> Result<SqliteHydrationHistory, Box<dyn std::error::Error>> {
    Ok(SqliteHydrationHistory::open()?)
}
