use clap::Subcommand;

use hydromate_core::{AppAction, Cup, LiquidUnit, Milliliters, Theme};

use crate::context;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the current preferences
    Show,
    /// Set the color theme
    Theme { value: String },
    /// Set the display unit
    Unit { value: String },
    /// Set the quick-add cup sizes in milliliters
    Cups { milliliters: Vec<u32> },
    /// Set height (free-form, e.g. "182cm")
    Height { value: String },
    /// Set weight (free-form, e.g. "75kg")
    Weight { value: String },
}

fn parse_theme(raw: &str) -> Result<Theme, Box<dyn std::error::Error>> {
    match raw {
        "system" => Ok(Theme::System),
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        _ => Err(format!("invalid theme '{raw}', expected system|dark|light").into()),
    }
}

fn parse_unit(raw: &str) -> Result<LiquidUnit, Box<dyn std::error::Error>> {
    match raw {
        "ml" | "milliliters" => Ok(LiquidUnit::Milliliters),
        "oz" | "ounces" => Ok(LiquidUnit::Ounces),
        _ => Err(format!("invalid unit '{raw}', expected ml|oz").into()),
    }
}

pub async fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = context::open_store()?;
    match action {
        PrefsAction::Show => {}
        PrefsAction::Theme { value } => {
            store.dispatch(AppAction::SetTheme {
                value: parse_theme(&value)?,
            });
        }
        PrefsAction::Unit { value } => {
            store.dispatch(AppAction::SetLiquidUnit {
                value: parse_unit(&value)?,
            });
        }
        PrefsAction::Cups { milliliters } => {
            let cups: Vec<Cup> = milliliters
                .into_iter()
                .map(|ml| Cup::new(Milliliters(ml)))
                .collect();
            store.dispatch(AppAction::SetSelectedCups { value: cups });
        }
        PrefsAction::Height { value } => {
            store.dispatch(AppAction::SetHeight { value });
        }
        PrefsAction::Weight { value } => {
            store.dispatch(AppAction::SetWeight { value });
        }
    }
    store.settled().await;

    let state = store.current_state();
    super::print_json(&serde_json::json!({
        "theme": state.theme,
        "unit": state.liquid_unit,
        "selected_cups": state.selected_cups,
        "all_cups": state.all_cups(),
        "height": state.height,
        "weight": state.weight,
    }))
}
