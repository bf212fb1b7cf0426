use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "streakguard-cli", version, about = "Streakguard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the persisted ledger
    Status(commands::NowArg),
    /// Cover missed days through yesterday
    Evaluate(commands::NowArg),
    /// Cover missed days, then record today's show-up
    ShowUp(commands::NowArg),
    /// Spend shields to repair a broken streak
    Repair(commands::NowArg),
    /// Pro entitlement
    Pro {
        #[command(subcommand)]
        action: commands::pro::ProAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Status(now) => commands::ledger::status(now)?,
        Commands::Evaluate(now) => commands::ledger::evaluate(now)?,
        Commands::ShowUp(now) => commands::ledger::show_up(now)?,
        Commands::Repair(now) => commands::ledger::repair(now)?,
        Commands::Pro { action } => commands::pro::run(action)?,
        Commands::Config { action } => commands::config::run(action)?,
    }
    Ok(())
}
