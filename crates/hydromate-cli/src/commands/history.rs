use chrono::{Duration, Local};
use clap::Subcommand;

use hydromate_core::HydrationHistory;

use crate::context;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recorded days, newest first
    List {
        /// Maximum number of days to show
        #[arg(long, default_value = "14")]
        limit: usize,
    },
}

pub async fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HistoryAction::List { limit } => {
            let history = context::open_history()?;
            let tomorrow = Local::now().date_naive() + Duration::days(1);
            let days = history.days_before(tomorrow, limit).await?;
            let listing: Vec<serde_json::Value> = days
                .iter()
                .map(|day| {
                    serde_json::json!({
                        "date": day.date,
                        "total_ml": day.total().value(),
                        "goal_ml": day.goal.value(),
                        "entries": day.hydration.len(),
                    })
                })
                .collect();
            super::print_json(&listing)
        }
    }
}
