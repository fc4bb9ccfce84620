use clap::Subcommand;

use hydromate_core::{AppAction, DateRangeType};

use crate::context;

#[derive(Subcommand)]
pub enum ChartAction {
    /// Daily buckets for the current ISO week (Monday..Sunday)
    Week,
    /// Daily buckets for the current calendar month
    Month,
    /// Twelve month buckets for the current year
    Year,
}

pub async fn run(action: ChartAction) -> Result<(), Box<dyn std::error::Error>> {
    let range = match action {
        ChartAction::Week => DateRangeType::Weekly,
        ChartAction::Month => DateRangeType::Monthly,
        ChartAction::Year => DateRangeType::Yearly,
    };
    let store = context::open_store()?;
    store.dispatch(AppAction::LoadChartData { range });
    store.settled().await;
    super::print_json(&store.current_state().hydration_chart_data)
}
