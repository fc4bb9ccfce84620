use clap::Subcommand;

use hydromate_core::{AppAction, Milliliters};

use crate::context;

#[derive(Subcommand)]
pub enum DrinkAction {
    /// Log a drink in milliliters
    Add { milliliters: u32 },
    /// Remove the most recently logged drink
    Undo,
    /// Clear today's log, keeping the day's goal
    Reset,
}

pub async fn run(action: DrinkAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = context::open_store()?;
    match action {
        DrinkAction::Add { milliliters } => store.dispatch(AppAction::AddHydration {
            value: Milliliters(milliliters),
        }),
        DrinkAction::Undo => store.dispatch(AppAction::RemoveHydration),
        DrinkAction::Reset => store.dispatch(AppAction::ResetToday),
    }
    store.settled().await;
    super::print_progress(&store.current_state())
}
