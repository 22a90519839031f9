use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finreport::cli::{cashback::CashbackArgs, report::ReportArgs, spending::SpendingArgs};
use finreport::core::log::init_logging;

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

impl From<Commands> for finreport::AppCommand {
    fn from(cmd: Commands) -> finreport::AppCommand {
        match cmd {
            Commands::Report(args) => finreport::AppCommand::Report(args),
            Commands::Cashback(args) => finreport::AppCommand::Cashback(args),
            Commands::Spending(args) => finreport::AppCommand::Spending(args),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Expense and income report for a date range, with market data
    Report(ReportArgs),
    /// Cashback per category for one month
    Cashback(CashbackArgs),
    /// Spending on one category over the last three months
    Spending(SpendingArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => finreport::cli::setup::setup(),
        Some(cmd) => finreport::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
