use clap::{Parser, Subcommand};

mod adapters;
mod commands;
mod context;

#[derive(Parser)]
#[command(name = "hydromate-cli", version, about = "Hydromate CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current application state as JSON
    Status,
    /// Log, undo and reset hydration for today
    Drink {
        #[command(subcommand)]
        action: commands::drink::DrinkAction,
    },
    /// Daily goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Reminder window management
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Historical chart series
    Chart {
        #[command(subcommand)]
        action: commands::chart::ChartAction,
    },
    /// Hydration diary
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Display and unit preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Data management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    // Keep the handle alive for the process lifetime.
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .ok();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::status::run().await,
        Commands::Drink { action } => commands::drink::run(action).await,
        Commands::Goal { action } => commands::goal::run(action).await,
        Commands::Reminder { action } => commands::reminder::run(action).await,
        Commands::Chart { action } => commands::chart::run(action).await,
        Commands::History { action } => commands::history::run(action).await,
        Commands::Prefs { action } => commands::prefs::run(action).await,
        Commands::Data { action } => commands::data::run(action).await,
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
