use clap::Subcommand;

use hydromate_core::AppAction;

use crate::context;

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete all hydration history and preferences
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::DeleteAll { yes } => {
            if !yes {
                return Err("refusing to delete without --yes".into());
            }
            let store = context::open_store()?;
            store.dispatch(AppAction::DeleteAll);
            store.settled().await;
            super::print_json(&serde_json::json!({ "deleted": true }))
        }
    }
}
