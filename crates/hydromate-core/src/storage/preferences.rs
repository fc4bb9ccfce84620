//! SQLite key-value preference storage.
//!
//! One row per named setting. Every preference has a dedicated `watch`
//! channel seeded from the persisted value at open, so the store's
//! subscribers see the current value immediately and every later write.

use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::watch;

use super::{data_dir, relock};
use crate::domain::{Cup, LiquidUnit, Milliliters, Reminder, Theme};
use crate::error::{Result, StorageError};
use crate::ports::PreferenceStore;

const KEY_DAILY_GOAL: &str = "dailyTargetMilliliters";
const KEY_REMINDER: &str = "reminder";
const KEY_THEME: &str = "theme";
const KEY_SELECTED_CUPS: &str = "selectedCups";
const KEY_LIQUID_UNIT: &str = "liquidUnit";
const KEY_HEIGHT: &str = "height";
const KEY_WEIGHT: &str = "weight";

pub struct SqlitePreferences {
    conn: Mutex<Connection>,
    daily_goal: watch::Sender<Option<Milliliters>>,
    reminder: watch::Sender<Option<Reminder>>,
    theme: watch::Sender<Theme>,
    liquid_unit: watch::Sender<LiquidUnit>,
    selected_cups: watch::Sender<Vec<Cup>>,
    height: watch::Sender<Option<String>>,
    weight: watch::Sender<Option<String>>,
}

impl SqlitePreferences {
    /// Open the preference database at `~/.config/hydromate/preferences.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("preferences.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path,
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory preference store (tests, throwaway sessions).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prefs (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        let daily_goal = kv_get(&conn, KEY_DAILY_GOAL)?
            .and_then(|raw| raw.parse::<u32>().ok())
            .map(Milliliters);
        let reminder = kv_get(&conn, KEY_REMINDER)?.and_then(|raw| decode(KEY_REMINDER, &raw));
        let theme = Theme::of(kv_get(&conn, KEY_THEME)?.as_deref());
        let liquid_unit = LiquidUnit::of(kv_get(&conn, KEY_LIQUID_UNIT)?.as_deref());
        let selected_cups = kv_get(&conn, KEY_SELECTED_CUPS)?
            .and_then(|raw| decode(KEY_SELECTED_CUPS, &raw))
            .unwrap_or_default();
        let height = kv_get(&conn, KEY_HEIGHT)?;
        let weight = kv_get(&conn, KEY_WEIGHT)?;

        Ok(Self {
            conn: Mutex::new(conn),
            daily_goal: watch::Sender::new(daily_goal),
            reminder: watch::Sender::new(reminder),
            theme: watch::Sender::new(theme),
            liquid_unit: watch::Sender::new(liquid_unit),
            selected_cups: watch::Sender::new(selected_cups),
            height: watch::Sender::new(height),
            weight: watch::Sender::new(weight),
        })
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        relock(&self.conn).execute(
            "INSERT OR REPLACE INTO prefs (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<()> {
        relock(&self.conn).execute("DELETE FROM prefs WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM prefs WHERE key = ?1")?;
    match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
        Ok(v) => Ok(Some(v)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Decode a persisted JSON value, dropping corrupt records with a
/// warning instead of refusing to open.
fn decode<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("dropping corrupt preference '{key}': {e}");
            None
        }
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferences {
    fn daily_goal(&self) -> watch::Receiver<Option<Milliliters>> {
        self.daily_goal.subscribe()
    }

    async fn set_daily_goal(&self, value: Milliliters) -> Result<()> {
        self.kv_set(KEY_DAILY_GOAL, &value.value().to_string())?;
        self.daily_goal.send_replace(Some(value));
        Ok(())
    }

    fn reminder(&self) -> watch::Receiver<Option<Reminder>> {
        self.reminder.subscribe()
    }

    async fn set_reminder(&self, value: Option<Reminder>) -> Result<()> {
        match &value {
            Some(reminder) => self.kv_set(KEY_REMINDER, &serde_json::to_string(reminder)?)?,
            None => self.kv_delete(KEY_REMINDER)?,
        }
        self.reminder.send_replace(value);
        Ok(())
    }

    fn theme(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    async fn set_theme(&self, value: Theme) -> Result<()> {
        self.kv_set(KEY_THEME, value.serialized())?;
        self.theme.send_replace(value);
        Ok(())
    }

    fn liquid_unit(&self) -> watch::Receiver<LiquidUnit> {
        self.liquid_unit.subscribe()
    }

    async fn set_liquid_unit(&self, value: LiquidUnit) -> Result<()> {
        self.kv_set(KEY_LIQUID_UNIT, value.serialized())?;
        self.liquid_unit.send_replace(value);
        Ok(())
    }

    fn selected_cups(&self) -> watch::Receiver<Vec<Cup>> {
        self.selected_cups.subscribe()
    }

    async fn set_selected_cups(&self, cups: Vec<Cup>) -> Result<()> {
        self.kv_set(KEY_SELECTED_CUPS, &serde_json::to_string(&cups)?)?;
        self.selected_cups.send_replace(cups);
        Ok(())
    }

    fn height(&self) -> watch::Receiver<Option<String>> {
        self.height.subscribe()
    }

    async fn set_height(&self, value: String) -> Result<()> {
        self.kv_set(KEY_HEIGHT, &value)?;
        self.height.send_replace(Some(value));
        Ok(())
    }

    fn weight(&self) -> watch::Receiver<Option<String>> {
        self.weight.subscribe()
    }

    async fn set_weight(&self, value: String) -> Result<()> {
        self.kv_set(KEY_WEIGHT, &value)?;
        self.weight.send_replace(Some(value));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        relock(&self.conn).execute("DELETE FROM prefs", [])?;
        self.daily_goal.send_replace(None);
        self.reminder.send_replace(None);
        self.theme.send_replace(Theme::default());
        self.liquid_unit.send_replace(LiquidUnit::default());
        self.selected_cups.send_replace(Vec::new());
        self.height.send_replace(None);
        self.weight.send_replace(None);
        Ok(())
    }
}
