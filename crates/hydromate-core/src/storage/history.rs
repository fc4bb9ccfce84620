//! SQLite day-record storage.
//!
//! One row per calendar date: the JSON-encoded event list plus the goal
//! snapshot active at last write, keyed by epoch day with the uuid id as
//! primary key. Per-date `watch` channels fan out every write to live
//! `day()` subscribers.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tokio::sync::watch;

use super::{data_dir, relock};
use crate::domain::{epoch_day, from_epoch_day, Day, HydrationEntry, Milliliters};
use crate::error::{Result, StorageError};
use crate::ports::HydrationHistory;

pub struct SqliteHydrationHistory {
    conn: Mutex<Connection>,
    watchers: Mutex<HashMap<NaiveDate, watch::Sender<Option<Day>>>>,
}

impl SqliteHydrationHistory {
    /// Open the history database at `~/.config/hydromate/day-history.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("day-history.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path,
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory history (tests, throwaway sessions).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
            watchers: Mutex::new(HashMap::new()),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        relock(&self.conn)
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS day (
                    id        TEXT PRIMARY KEY,
                    date      INTEGER NOT NULL UNIQUE,
                    hydration TEXT NOT NULL,
                    goal_ml   INTEGER NOT NULL
                );",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn load_day(conn: &Connection, date: NaiveDate) -> Result<Option<Day>> {
        let mut stmt = conn.prepare(
            "SELECT id, date, hydration, goal_ml FROM day WHERE date = ?1 LIMIT 1",
        )?;
        let row = stmt
            .query_row(params![epoch_day(date)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            });
        match row {
            Ok(raw) => Ok(Some(decode_day(raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn query_days(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Day>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })?;
        let mut days = Vec::new();
        for row in rows {
            days.push(decode_day(row?)?);
        }
        Ok(days)
    }

}

fn decode_day((id, date, hydration, goal_ml): (String, i64, String, u32)) -> Result<Day> {
    let entries: Vec<HydrationEntry> =
        serde_json::from_str(&hydration).map_err(|e| StorageError::CorruptRecord {
            key: format!("day/{date}"),
            message: e.to_string(),
        })?;
    Ok(Day {
        date: from_epoch_day(date),
        hydration: entries,
        goal: Milliliters(goal_ml),
        id,
    })
}

#[async_trait]
impl HydrationHistory for SqliteHydrationHistory {
    async fn set_day(&self, day: Day) -> Result<()> {
        let hydration = serde_json::to_string(&day.hydration)?;
        // Lock order is watchers then conn, everywhere; notifying under
        // the watchers lock keeps stream emissions in write order.
        let watchers = relock(&self.watchers);
        relock(&self.conn).execute(
            "INSERT OR REPLACE INTO day (id, date, hydration, goal_ml)
             VALUES (?1, ?2, ?3, ?4)",
            params![day.id, epoch_day(day.date), hydration, day.goal.value()],
        )?;
        if let Some(tx) = watchers.get(&day.date) {
            tx.send_replace(Some(day));
        }
        Ok(())
    }

    fn day(&self, date: NaiveDate) -> watch::Receiver<Option<Day>> {
        let mut watchers = relock(&self.watchers);
        if let Some(tx) = watchers.get(&date) {
            return tx.subscribe();
        }
        let current = Self::load_day(&relock(&self.conn), date).unwrap_or_else(|e| {
            log::warn!("failed to load day {date}: {e}");
            None
        });
        let (tx, rx) = watch::channel(current);
        watchers.insert(date, tx);
        rx
    }

    async fn days_before(
        &self,
        start_date_exclusive: NaiveDate,
        page_size: usize,
    ) -> Result<Vec<Day>> {
        let conn = relock(&self.conn);
        Self::query_days(
            &conn,
            "SELECT id, date, hydration, goal_ml FROM day
             WHERE date < ?1 ORDER BY date DESC LIMIT ?2",
            params![epoch_day(start_date_exclusive), page_size as i64],
        )
    }

    async fn days_in_range(
        &self,
        start_epoch_day: i64,
        end_epoch_day: i64,
        limit: usize,
    ) -> Result<Vec<Day>> {
        let conn = relock(&self.conn);
        Self::query_days(
            &conn,
            "SELECT id, date, hydration, goal_ml FROM day
             WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC LIMIT ?3",
            params![start_epoch_day, end_epoch_day, limit as i64],
        )
    }

    async fn delete(&self, date: NaiveDate) -> Result<()> {
        let watchers = relock(&self.watchers);
        relock(&self.conn)
            .execute("DELETE FROM day WHERE date = ?1", params![epoch_day(date)])?;
        if let Some(tx) = watchers.get(&date) {
            tx.send_replace(None);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let watchers = relock(&self.watchers);
        relock(&self.conn).execute("DELETE FROM day", [])?;
        for tx in watchers.values() {
            tx.send_replace(None);
        }
        Ok(())
    }
}
