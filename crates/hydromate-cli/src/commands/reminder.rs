use chrono::NaiveTime;
use clap::Subcommand;

use hydromate_core::{trigger_times, AppAction, Reminder};

use crate::context;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Enable daily reminders within a time window
    Set {
        /// Window start, HH:MM
        #[arg(long)]
        start: String,
        /// Window end, HH:MM
        #[arg(long)]
        end: String,
        /// Minutes between reminders
        #[arg(long, default_value = "90")]
        interval: u32,
    },
    /// Disable reminders
    Clear,
    /// Print the trigger times of the active reminder
    Times,
    /// Reinstall alarms for the persisted reminder
    Restart,
}

fn parse_time(raw: &str) -> Result<NaiveTime, Box<dyn std::error::Error>> {
    Ok(NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| format!("invalid time '{raw}', expected HH:MM"))?)
}

pub async fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = context::open_store()?;
    match action {
        ReminderAction::Set {
            start,
            end,
            interval,
        } => {
            let reminder = Reminder::new(parse_time(&start)?, parse_time(&end)?, interval)?;
            store.dispatch(AppAction::SetReminder {
                value: Some(reminder),
            });
            store.settled().await;
            print_times(&reminder)
        }
        ReminderAction::Clear => {
            store.dispatch(AppAction::SetReminder { value: None });
            store.settled().await;
            super::print_json(&serde_json::json!({ "reminder": null }))
        }
        ReminderAction::Times => match store.current_state().reminder {
            Some(reminder) => print_times(&reminder),
            None => super::print_json(&serde_json::json!({ "reminder": null })),
        },
        ReminderAction::Restart => {
            store.dispatch(AppAction::RestartReminder);
            store.settled().await;
            super::print_json(&store.current_state().reminder)
        }
    }
}

fn print_times(reminder: &Reminder) -> Result<(), Box<dyn std::error::Error>> {
    let times: Vec<String> = trigger_times(reminder)
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    super::print_json(&serde_json::json!({
        "reminder": reminder,
        "trigger_times": times,
    }))
}
