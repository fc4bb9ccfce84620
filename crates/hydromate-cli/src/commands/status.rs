use crate::context;

/// Print the full state snapshot plus its derived progress fields.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = context::open_store()?;
    let state = store.current_state();

    let mut value = serde_json::to_value(&state)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "hydration_progress".to_string(),
            serde_json::json!(state.hydration_progress().value()),
        );
        obj.insert(
            "daily_goal_reached".to_string(),
            serde_json::json!(state.daily_goal_reached()),
        );
    }
    super::print_json(&value)
}
