use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use powerlaw::cli::fair::parse_date;
use powerlaw::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for powerlaw::AppCommand {
    fn from(cmd: Commands) -> powerlaw::AppCommand {
        match cmd {
            Commands::Show { json } => powerlaw::AppCommand::Show { json },
            Commands::Fair { date } => powerlaw::AppCommand::Fair { date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show live price against the power-law fair value
    Show {
        /// Print the valuation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the model band at a date without fetching prices
    Fair {
        /// Date as YYYY-MM-DD or RFC 3339, defaults to now
        #[arg(short, long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => powerlaw::cli::setup::setup(),
        Some(cmd) => powerlaw::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
