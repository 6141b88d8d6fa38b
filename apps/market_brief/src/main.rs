use anyhow::Context;
use chrono::Local;
use clap::Parser;
use coinsight_analytics::derive_all;
use coinsight_shared_models::{PriceBucket, PriceCategory};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use xlsx_sink::XlsxSink;

mod config;
mod console;
mod data_fetcher;
mod runner;
mod xlsx_sink;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Price range for the budget KPI (0-0.05, 0.05-0.5, 0.5-5, 5-50, >50)
    #[arg(long, default_value = "0.5-5")]
    bucket: PriceBucket,

    /// Price category for the 1h increase ranking (<10 or >=10)
    #[arg(long, default_value = "<10")]
    category: PriceCategory,

    /// First coin of the comparison, matched by name
    #[arg(long, default_value = "bitcoin")]
    coin_a: String,

    /// Second coin of the comparison, matched by name
    #[arg(long, default_value = "ethereum")]
    coin_b: String,

    /// Highest price considered by the historical price chart
    #[arg(long, default_value_t = 5.0)]
    history_ceiling: f64,

    /// Highest price considered by the liquidity pie
    #[arg(long, default_value_t = 50.0)]
    liquidity_ceiling: f64,

    /// Rows kept by the ranked charts
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Named slices of the liquidity pie
    #[arg(long, default_value_t = 5)]
    pie_top_n: usize,

    /// Quote currency
    #[arg(long, default_value = "usd")]
    currency: String,

    /// Coins requested from the provider
    #[arg(long, default_value_t = 200)]
    per_page: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Workbook the charts are written to
    #[arg(long, default_value = "market_brief.xlsx")]
    output: PathBuf,

    /// Read the snapshot from a JSON file instead of the network
    #[arg(long)]
    from_file: Option<PathBuf>,

    /// Also write the fetched snapshot to this JSON file
    #[arg(long)]
    save_raw: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = config::Settings::from_args(Args::parse())?;

    let rt = tokio::runtime::Runtime::new()?;
    let market = rt.block_on(data_fetcher::fetch_market(&settings.fetch))?;
    let quotes = data_fetcher::to_quotes(&market).context("Market snapshot is unusable")?;

    println!(
        "Market brief - {}",
        Local::now().format("%B %d, %Y %I:%M:%S %p")
    );
    println!("Data Loaded : {} Coins", quotes.len());

    let rows = derive_all(&quotes);

    let mut sink = XlsxSink::new(&settings.output);
    let summary = runner::run_reports(&rows, &settings.reports, &mut sink);
    let charts = sink.charts_written();

    let path = sink.save().context("Failed to save chart workbook")?;
    info!(path = %path.display(), charts, "Charts saved");
    println!("\nCharts written to {}", path.display());

    if !summary.failed.is_empty() {
        warn!(failed = ?summary.failed, "Some reports had nothing to show");
    }

    Ok(())
}
