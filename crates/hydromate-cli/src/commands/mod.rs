pub mod chart;
pub mod completions;
pub mod data;
pub mod drink;
pub mod goal;
pub mod history;
pub mod prefs;
pub mod reminder;
pub mod status;

use hydromate_core::AppState;

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Compact progress line printed after mutating commands.
pub(crate) fn print_progress(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let progress = state.hydration_progress();
    print_json(&serde_json::json!({
        "today": state.today_hydration.format(state.liquid_unit),
        "goal": state.daily_goal.format(state.liquid_unit),
        "progress": progress.format(),
        "goal_reached": progress.is_goal_reached(),
    }))
}
