//! Domain value types: liquid amounts, day records, reminders, cups and
//! display preferences.

mod amount;
mod cup;
mod day;
mod prefs;
mod reminder;

pub use amount::{Milliliters, Percent};
pub use cup::{default_cups, default_selected_cups, Cup};
pub use day::{epoch_day, from_epoch_day, Day, HydrationEntry};
pub use prefs::{LiquidUnit, Theme};
pub use reminder::Reminder;
