use super::{OutputFormat, ui};
use crate::core::config::AppConfig;
use crate::core::transaction::{load_transactions, parse_transactions};
use crate::core::{
    CategorySummary, CurrencyRates, RangeKind, ReportAssembler, ReportOptions, ReportPayload,
    StockSeries,
};
use crate::providers::alpha_vantage::AlphaVantageProvider;
use crate::providers::exchange_rate::ExchangeRateApiProvider;
use crate::providers::{Cache, util::RetryPolicy};
use crate::store::{SaveTarget, compute_and_persist};
use anyhow::Result;
use comfy_table::Cell;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const RATES_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// JSON file with an array of {date, amount, category} records
    #[arg(short, long)]
    pub transactions: PathBuf,

    /// Reference date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: String,

    /// Range around the reference date: W, M, Y or ALL (upper case)
    #[arg(short, long, default_value = "M")]
    pub range: RangeKind,

    /// Number of expense categories listed individually (overrides config)
    #[arg(long)]
    pub top: Option<usize>,

    /// Save the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the JSON report under a timestamped name
    #[arg(long)]
    pub save: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl CategorySummary {
    pub fn display_as_table(&self, title: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Category"), ui::header_cell("Amount")]);

        for (category, amount) in self.main.iter() {
            table.add_row(vec![Cell::new(category), ui::amount_cell(amount)]);
        }
        if let Some(other) = self.other {
            table.add_row(vec![ui::subtle_cell("Other"), ui::amount_cell(other)]);
        }

        let mut output = format!("{}\n\n", ui::style_text(title, ui::StyleType::Title));
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total", ui::StyleType::TotalLabel),
            ui::style_text(&self.total.to_string(), ui::StyleType::TotalValue)
        ));
        output
    }
}

fn market_summary(rates: &CurrencyRates, series: &StockSeries, options: &ReportOptions) -> String {
    let rates_line = if rates.is_empty() {
        "Currency rates: unavailable".to_string()
    } else {
        format!(
            "Currency rates: {} currencies against {}",
            rates.len(),
            options.base_currency
        )
    };
    let stock_line = match series.keys().next_back() {
        Some(latest) => format!(
            "Stock prices: {} points for {} (latest {latest})",
            series.len(),
            options.stock_symbol
        ),
        None => format!("Stock prices: unavailable for {}", options.stock_symbol),
    };
    format!(
        "{}\n{}",
        ui::style_text(&rates_line, ui::StyleType::Subtle),
        ui::style_text(&stock_line, ui::StyleType::Subtle)
    )
}

fn display_report(report: &ReportPayload, options: &ReportOptions) {
    println!("{}", report.expenses.display_as_table("Expenses"));
    ui::print_separator();
    println!("{}", report.income.display_as_table("Income"));
    ui::print_separator();
    println!(
        "{}",
        market_summary(&report.currency_rates, &report.stock_prices, options)
    );
}

pub async fn run(config: &AppConfig, args: &ReportArgs) -> Result<()> {
    let records = load_transactions(&args.transactions)?;
    let transactions = parse_transactions(&records)?;

    let options = ReportOptions {
        top_k: args.top.unwrap_or(config.top_categories),
        base_currency: config.base_currency.clone(),
        stock_symbol: config.stock_symbol.clone(),
    };
    info!(
        range = %args.range,
        top_k = options.top_k,
        count = transactions.len(),
        "Generating report"
    );

    let retry = RetryPolicy::from(&config.providers);
    let currency_provider = ExchangeRateApiProvider::new(
        config.providers.exchange_rate_url(),
        Cache::with_ttl(Some(RATES_TTL)),
        retry,
    );
    let stock_provider = AlphaVantageProvider::new(
        config.providers.alpha_vantage_url(),
        config.providers.alpha_vantage_key(),
        Cache::new(),
        retry,
    );
    let assembler = ReportAssembler::new(&currency_provider, &stock_provider);

    let pb = ui::new_spinner("Fetching market data...");
    let report = assembler
        .assemble(&transactions, &args.date, args.range, &options)
        .await;
    pb.finish_and_clear();
    let report = report?;

    let target = SaveTarget::from_args(args.output.clone(), args.save);
    let json = compute_and_persist(target.as_ref(), || Ok(report.to_json()?))?;

    match args.format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Table => display_report(&report, &options),
    }
    Ok(())
}
