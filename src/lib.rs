pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::{cashback::CashbackArgs, report::ReportArgs, spending::SpendingArgs};
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Report(ReportArgs),
    Cashback(CashbackArgs),
    Spending(SpendingArgs),
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finreport starting...");

    match command {
        AppCommand::Report(args) => {
            let config = load_config(config_path)?;
            cli::report::run(&config, &args).await
        }
        AppCommand::Cashback(args) => cli::cashback::run(&args),
        AppCommand::Spending(args) => cli::spending::run(&args),
    }
}
