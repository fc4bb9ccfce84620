//! SQLite-backed persistence for hydration history and preferences.
//!
//! Both stores implement the ports consumed by the state store and keep
//! a `watch` channel per record so reads stay live across writes.

mod history;
mod preferences;

pub use history::SqliteHydrationHistory;
pub use preferences::SqlitePreferences;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/hydromate[-dev]/` based on HYDROMATE_ENV.
///
/// Set HYDROMATE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HYDROMATE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hydromate-dev")
    } else {
        base_dir.join("hydromate")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Recover the inner value from a poisoned mutex.
///
/// The stores hold their locks only across short synchronous sections,
/// so a poisoned lock still guards structurally valid data.
pub(crate) fn relock<'a, T>(
    mutex: &'a std::sync::Mutex<T>,
) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
