use crate::core::spending::spending_by_category;
use crate::core::transaction::{load_transactions, parse_date, parse_transactions};
use crate::store::{SaveTarget, compute_and_persist};
use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;

#[derive(Debug, Clone, clap::Args)]
pub struct SpendingArgs {
    /// JSON file with an array of {date, amount, category} records
    #[arg(short, long)]
    pub transactions: PathBuf,

    #[arg(long)]
    pub category: String,

    /// End of the three month period (YYYY-MM-DD), today when omitted
    #[arg(short, long)]
    pub date: Option<String>,

    /// Save the result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the result under a timestamped name
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: &SpendingArgs) -> Result<()> {
    let reference = match &args.date {
        Some(date) => parse_date(date)?,
        None => Local::now().date_naive(),
    };
    let records = load_transactions(&args.transactions)?;
    let transactions = parse_transactions(&records)?;

    let target = SaveTarget::from_args(args.output.clone(), args.save);
    let line = compute_and_persist(target.as_ref(), || {
        Ok(spending_by_category(&transactions, &args.category, reference)?.to_string())
    })?;

    println!("{line}");
    Ok(())
}
