use crate::Args;
use anyhow::bail;
use coinsight_analytics::ReportConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CoinGecko serves at most 250 rows per page.
pub const MAX_PER_PAGE: u32 = 250;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub currency: String,
    pub per_page: u32,
    pub timeout: Duration,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub from_file: Option<PathBuf>,
    pub save_raw: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub reports: ReportConfig,
    pub output: PathBuf,
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Settings {
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        if args.per_page == 0 || args.per_page > MAX_PER_PAGE {
            bail!("--per-page must be between 1 and {MAX_PER_PAGE}, got {}", args.per_page);
        }
        if args.top_n == 0 || args.pie_top_n == 0 {
            bail!("--top-n and --pie-top-n must be at least 1");
        }
        for (flag, ceiling) in [
            ("--history-ceiling", args.history_ceiling),
            ("--liquidity-ceiling", args.liquidity_ceiling),
        ] {
            if !ceiling.is_finite() || ceiling < 0.0 {
                bail!("{flag} must be a non-negative number, got {ceiling}");
            }
        }

        let fetch = FetchSettings {
            currency: args.currency.trim().to_lowercase(),
            per_page: args.per_page,
            timeout: Duration::from_secs(args.timeout_secs),
            api_key: env_opt("COINGECKO_API_KEY"),
            base_url: env_opt("COINGECKO_BASE_URL"),
            from_file: args.from_file,
            save_raw: args.save_raw,
        };

        let reports = ReportConfig {
            bucket: args.bucket,
            category: args.category,
            compare_pair: (args.coin_a, args.coin_b),
            history_price_ceiling: args.history_ceiling,
            liquidity_price_ceiling: args.liquidity_ceiling,
            top_n: args.top_n,
            pie_top_n: args.pie_top_n,
        };

        Ok(Self {
            fetch,
            reports,
            output: args.output,
        })
    }
}
