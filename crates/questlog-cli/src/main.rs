use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "questlog-cli", version, about = "Questlog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate XP and gold for a scheduled task
    Reward(commands::reward::RewardArgs),
    /// Level, rank and color tier for an XP total
    Level(commands::level::LevelArgs),
    /// Activity heatmap for the trailing weeks
    Heatmap(commands::heatmap::HeatmapArgs),
    /// Current and longest streak for a set of completion dates
    Streak(commands::streak::StreakArgs),
    /// Roll a random event for a habit and link it to a quest
    Roll(commands::roll::RollArgs),
    /// Shadow companions unlocked by category streaks
    Shadows(commands::shadows::ShadowsArgs),
    /// Game-balance configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUESTLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Reward(args) => commands::reward::run(args),
        Commands::Level(args) => commands::level::run(args),
        Commands::Heatmap(args) => commands::heatmap::run(args),
        Commands::Streak(args) => commands::streak::run(args),
        Commands::Roll(args) => commands::roll::run(args),
        Commands::Shadows(args) => commands::shadows::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
