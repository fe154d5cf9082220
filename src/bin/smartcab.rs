//! smartcab CLI - Q-learning driving agent for a grid-world traffic simulation
//!
//! This CLI provides a unified interface for:
//! - Training the Q-learning agent and exporting its tables
//! - Evaluating a saved agent
//! - Comparing the agent with baseline drivers
//! - Searching hyper-parameters
//! - Summarizing trial logs

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning driving agent for a grid-world traffic simulation", long_about = None)]
struct Cli {
    /// Log every tick (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the Q-learning agent
    Train(Box<smartcab::cli::commands::train::TrainArgs>),

    /// Evaluate a saved agent without learning
    Evaluate(Box<smartcab::cli::commands::evaluate::EvaluateArgs>),

    /// Compare drivers on the same worlds
    Compare(Box<smartcab::cli::commands::compare::CompareArgs>),

    /// Search hyper-parameters by penalty score
    GridSearch(Box<smartcab::cli::commands::grid_search::GridSearchArgs>),

    /// Summarize a trial-stats CSV file
    Summarize(smartcab::cli::commands::summarize::SummarizeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Train(args) => smartcab::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => smartcab::cli::commands::evaluate::execute(*args),
        Commands::Compare(args) => smartcab::cli::commands::compare::execute(*args),
        Commands::GridSearch(args) => smartcab::cli::commands::grid_search::execute(*args),
        Commands::Summarize(args) => smartcab::cli::commands::summarize::execute(args),
    }
}
