use crate::console;
use coinsight_analytics::reports;
use coinsight_analytics::{ChartSpec, CoinSnapshot, ReportConfig, SeriesSink};
use tracing::{error, info, warn};

/// How the six reports went. A report "fails" when it had nothing to show
/// or its chart could not be rendered; the others still run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: Vec<&'static str>,
}

impl RunSummary {
    fn record(&mut self, report: &'static str, ok: bool) {
        if ok {
            self.completed += 1;
        } else {
            self.failed.push(report);
        }
    }
}

fn render<S: SeriesSink>(sink: &mut S, chart: &ChartSpec) -> bool {
    match sink.render(chart) {
        Ok(()) => {
            info!(chart = %chart.title, points = chart.categories.len(), "Chart rendered");
            true
        }
        Err(e) => {
            error!(chart = %chart.title, "Failed to render chart: {e}");
            println!("Chart '{}' not rendered: {e}", chart.title);
            false
        }
    }
}

/// Runs Tasks 1 to 6 in order over the derived table.
pub fn run_reports<S: SeriesSink>(rows: &[CoinSnapshot], config: &ReportConfig, sink: &mut S) -> RunSummary {
    let mut summary = RunSummary::default();

    let kpi = reports::low_budget_max_profit(rows, config.bucket);
    console::print_budget_kpi(&kpi);
    if kpi.pick.is_none() {
        warn!(bucket = %config.bucket, "No eligible coin for the budget KPI");
    }
    summary.record("budget kpi", kpi.pick.is_some());

    println!("\n--- TASK 2 HISTORICAL PRICES ---");
    let history = reports::top_historical_prices(rows, config.history_price_ceiling, config.top_n);
    console::historical_table(&history).printstd();
    summary.record("historical prices", render(sink, &history.chart()));

    println!("\n--- TASK 3 PRICE CHANGE TABLE ---");
    let increase = reports::price_increase_leaders(rows, config.category, config.top_n);
    console::price_change_table(&increase).printstd();
    summary.record("price increase", render(sink, &increase.chart()));

    println!("\n--- TASK 4 LIQUIDITY LEADERS ---");
    let liquidity = reports::liquidity_leaders(rows, config.top_n);
    console::liquidity_table(&liquidity).printstd();
    summary.record("liquidity leaders", render(sink, &liquidity.chart()));

    let (first, second) = &config.compare_pair;
    match reports::compare(rows, first, second) {
        Ok(comparison) => {
            console::print_comparison(&comparison);
            summary.record("coin comparison", true);
        }
        Err(e) => {
            warn!(first = %first, second = %second, "Comparison skipped: {e}");
            println!("\n--- COIN COMPARISON ---\n{e}");
            summary.record("coin comparison", false);
        }
    }

    println!("\n--- TASK 6 LIQUIDITY DISTRIBUTION ---");
    match reports::liquidity_distribution(rows, config.liquidity_price_ceiling, config.pie_top_n) {
        Ok(distribution) => {
            console::distribution_table(&distribution).printstd();
            summary.record("liquidity distribution", render(sink, &distribution.chart()));
        }
        Err(e) => {
            warn!("Liquidity distribution skipped: {e}");
            println!("{e}");
            summary.record("liquidity distribution", false);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinsight_analytics::{derive_all, ChartKind, CoinQuote, MemorySink};

    fn quote(name: &str, price: f64, volume: f64) -> CoinQuote {
        CoinQuote {
            name: name.to_string(),
            symbol: name[..3].to_lowercase(),
            price,
            volume_24h: volume,
            market_cap: price * 1_000.0,
            circulating_supply: 1_000.0,
            change_1h: Some(1.0),
            change_24h: Some(-2.0),
            change_7d: Some(3.0),
        }
    }

    #[test]
    fn full_run_renders_four_charts() {
        let rows = derive_all(&[
            quote("Bitcoin", 97_000.0, 900.0),
            quote("Ethereum", 3_500.0, 800.0),
            quote("Cardano", 0.9, 300.0),
            quote("Dogecoin", 0.38, 400.0),
        ]);
        let mut sink = MemorySink::default();

        let summary = run_reports(&rows, &ReportConfig::default(), &mut sink);

        assert_eq!(summary.completed, 6);
        assert!(summary.failed.is_empty());
        let kinds: Vec<ChartKind> = sink.charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChartKind::StackedBar, ChartKind::Line, ChartKind::Bar, ChartKind::Pie]
        );
    }

    #[test]
    fn failures_do_not_stop_later_reports() {
        // nothing in 0.5-5, no ethereum, nothing at or under 50
        let rows = derive_all(&[quote("Bitcoin", 97_000.0, 900.0), quote("Monero", 160.0, 100.0)]);
        let mut sink = MemorySink::default();

        let summary = run_reports(&rows, &ReportConfig::default(), &mut sink);

        assert_eq!(
            summary.failed,
            vec![
                "budget kpi",
                "historical prices",
                "price increase",
                "coin comparison",
                "liquidity distribution"
            ]
        );
        assert_eq!(summary.completed, 1);
        assert_eq!(sink.charts.len(), 1);
        assert_eq!(sink.charts[0].categories, vec!["Bitcoin"]);
    }
}
