use clap::Subcommand;

use hydromate_core::{AppAction, Milliliters};

use crate::context;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Print the current daily goal
    Show,
    /// Set the daily goal in milliliters
    Set { milliliters: u32 },
}

pub async fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = context::open_store()?;
    match action {
        GoalAction::Show => {}
        GoalAction::Set { milliliters } => {
            if milliliters == 0 {
                return Err("daily goal must be positive".into());
            }
            store.dispatch(AppAction::SetDailyGoal {
                value: Milliliters(milliliters),
            });
            store.settled().await;
        }
    }
    super::print_progress(&store.current_state())
}
