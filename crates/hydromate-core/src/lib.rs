//! # Hydromate Core Library
//!
//! This library provides the core business logic for the Hydromate water
//! intake tracker. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any GUI being a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Store**: A single-writer reactive state store; user and system
//!   actions are dispatched as messages and folded into one `AppState`
//!   snapshot in arrival order
//! - **Scheduler**: Pure computation of daily reminder trigger times and
//!   idempotent programming of the platform alarm service
//! - **Stats**: Bucketed weekly/monthly/yearly aggregation of hydration
//!   history for charting
//! - **Storage**: SQLite-backed hydration history and preferences with
//!   live per-record change streams
//!
//! ## Key Components
//!
//! - [`AppStore`]: Reactive state store and action reducer
//! - [`ReminderScheduler`]: Alarm programming against the platform port
//! - [`SqliteHydrationHistory`] / [`SqlitePreferences`]: Persistence
//! - [`aggregate`]: Chart series computation

pub mod domain;
pub mod error;
pub mod notify;
pub mod ports;
pub mod rollover;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod store;

pub use domain::{Cup, Day, HydrationEntry, LiquidUnit, Milliliters, Percent, Reminder, Theme};
pub use error::{CoreError, Result, SchedulingError, StorageError, ValidationError};
pub use ports::{AlarmService, HydrationHistory, PreferenceStore, ReminderNotifier};
pub use scheduler::{trigger_times, AlarmSpec, ReminderScheduler};
pub use stats::{aggregate, range_bounds, ChartPoint, DateRangeType};
pub use storage::{SqliteHydrationHistory, SqlitePreferences};
pub use store::{AppAction, AppState, AppStore, StoreDeps};
