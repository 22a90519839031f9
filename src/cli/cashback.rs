use crate::core::cashback::analyze_cashback;
use crate::core::transaction::load_transactions;
use crate::store::{SaveTarget, compute_and_persist};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, clap::Args)]
pub struct CashbackArgs {
    /// JSON file with an array of {date, amount, category} records
    #[arg(short, long)]
    pub transactions: PathBuf,

    #[arg(short, long)]
    pub year: i32,

    /// Month number, 1-12
    #[arg(short, long)]
    pub month: u32,

    /// Save the result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the result under a timestamped name
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: &CashbackArgs) -> Result<()> {
    let records = load_transactions(&args.transactions)?;
    info!(year = args.year, month = args.month, "Analyzing cashback");

    let target = SaveTarget::from_args(args.output.clone(), args.save);
    let json = compute_and_persist(target.as_ref(), || {
        let cashback = analyze_cashback(&records, args.year, args.month)?;
        Ok(serde_json::to_string(&cashback)?)
    })?;

    println!("{json}");
    Ok(())
}
