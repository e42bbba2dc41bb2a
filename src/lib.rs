pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub enum AppCommand {
    Show { json: bool },
    Fair { date: Option<DateTime<Utc>> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Power law widget starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Show { json } => cli::show::run(&config, json).await,
        AppCommand::Fair { date } => cli::fair::run(&config, date),
    }
}
