use crate::chart::{ChartKind, ChartSpec, Series};
use crate::metrics::round_to;
use crate::snapshot::CoinSnapshot;
use coinsight_shared_models::{PriceBucket, PriceCategory};
use itertools::Itertools;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
    #[error("coin not found: '{0}'")]
    CoinNotFound(String),
    #[error("no coins priced at or below {ceiling} for the {report}")]
    NoEligibleRows { report: &'static str, ceiling: f64 },
}

/// The "slicer" selections each report runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub bucket: PriceBucket,
    pub category: PriceCategory,
    pub compare_pair: (String, String),
    pub history_price_ceiling: f64,
    pub liquidity_price_ceiling: f64,
    pub top_n: usize,
    pub pie_top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bucket: PriceBucket::From05To5,
            category: PriceCategory::Under10,
            compare_pair: ("bitcoin".to_string(), "ethereum".to_string()),
            history_price_ceiling: 5.0,
            liquidity_price_ceiling: 50.0,
            top_n: 10,
            pie_top_n: 5,
        }
    }
}

/// Descending order with undefined keys after every defined one.
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable top-N by `key`, ties keep source order.
fn rank_desc<'a, I, F>(rows: I, key: F, top_n: usize) -> Vec<&'a CoinSnapshot>
where
    I: IntoIterator<Item = &'a CoinSnapshot>,
    F: Fn(&CoinSnapshot) -> Option<f64>,
{
    rows.into_iter()
        .sorted_by(|a, b| descending(key(*a), key(*b)))
        .take(top_n)
        .collect()
}

fn names(rows: &[&CoinSnapshot]) -> Vec<String> {
    rows.iter().map(|row| row.name.clone()).collect()
}

// --- Task 1 ---

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetPick {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub avg_downfall: f64,
}

impl BudgetPick {
    pub fn avg_downfall_rounded(&self) -> f64 {
        round_to(self.avg_downfall, 2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetKpi {
    pub bucket: PriceBucket,
    /// `None` when nothing is priced inside the bucket.
    pub pick: Option<BudgetPick>,
    pub selected: usize,
}

/// Least volatile coin (lowest average downfall) inside a price bucket.
pub fn low_budget_max_profit(rows: &[CoinSnapshot], bucket: PriceBucket) -> BudgetKpi {
    let filtered = rows.iter().filter(|row| row.bucket == bucket).collect_vec();

    // min_by returns the first of several equal minima
    let pick = filtered
        .iter()
        .min_by(|a, b| a.avg_downfall.total_cmp(&b.avg_downfall))
        .map(|best| BudgetPick {
            name: best.name.clone(),
            symbol: best.symbol.clone(),
            price: best.price,
            avg_downfall: best.avg_downfall,
        });

    BudgetKpi {
        bucket,
        pick,
        selected: filtered.len(),
    }
}

// --- Task 2 ---

#[derive(Debug)]
pub struct HistoricalPrices<'a> {
    pub ceiling: f64,
    pub ranked: Vec<&'a CoinSnapshot>,
}

/// Coins priced in `[0, ceiling]`, ranked by the price they had an hour ago.
pub fn top_historical_prices(rows: &[CoinSnapshot], ceiling: f64, top_n: usize) -> HistoricalPrices<'_> {
    let eligible = rows.iter().filter(|row| row.price >= 0.0 && row.price <= ceiling);

    HistoricalPrices {
        ceiling,
        ranked: rank_desc(eligible, |row| row.prev_1h, top_n),
    }
}

impl HistoricalPrices<'_> {
    /// 7 days ago at the base, 24 hours ago stacked on top.
    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            key: "historical-prices".to_string(),
            title: format!(
                "Top {} Coins (0-{}$) - Historical Prices",
                self.ranked.len(),
                self.ceiling
            ),
            kind: ChartKind::StackedBar,
            categories: names(&self.ranked),
            series: vec![
                Series::new("7 Days Before", self.ranked.iter().map(|row| row.prev_7d).collect()),
                Series::new("24 Hours Before", self.ranked.iter().map(|row| row.prev_24h).collect()),
            ],
        }
    }
}

// --- Task 3 ---

#[derive(Debug)]
pub struct PriceIncreaseLeaders<'a> {
    pub category: PriceCategory,
    pub ranked: Vec<&'a CoinSnapshot>,
}

/// Biggest absolute 1h price gains within a price category.
pub fn price_increase_leaders(
    rows: &[CoinSnapshot],
    category: PriceCategory,
    top_n: usize,
) -> PriceIncreaseLeaders<'_> {
    let eligible = rows.iter().filter(|row| row.category == category);

    PriceIncreaseLeaders {
        category,
        ranked: rank_desc(eligible, |row| row.delta_1h, top_n),
    }
}

impl PriceIncreaseLeaders<'_> {
    pub fn deltas(&self) -> Vec<(&str, Option<f64>)> {
        self.ranked
            .iter()
            .map(|row| (row.symbol.as_str(), row.delta_1h))
            .collect()
    }

    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            key: "price-change-1h".to_string(),
            title: format!("Top {} Coins - 1 Hour Price Change", self.ranked.len()),
            kind: ChartKind::Line,
            categories: names(&self.ranked),
            series: vec![
                Series::defined("Current Price", self.ranked.iter().map(|row| row.price)),
                Series::new("1 Hour Before", self.ranked.iter().map(|row| row.prev_1h).collect()),
            ],
        }
    }
}

// --- Task 4 ---

#[derive(Debug)]
pub struct LiquidityLeaders<'a> {
    pub ranked: Vec<&'a CoinSnapshot>,
}

/// Highest 24h volume among coins with an eligible name.
pub fn liquidity_leaders(rows: &[CoinSnapshot], top_n: usize) -> LiquidityLeaders<'_> {
    let eligible = rows.iter().filter(|row| row.eligible_name);

    LiquidityLeaders {
        ranked: rank_desc(eligible, |row| Some(row.volume_24h), top_n),
    }
}

impl LiquidityLeaders<'_> {
    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            key: "liquidity-leaders".to_string(),
            title: format!("Top {} Liquidity Coins (Volume 24h)", self.ranked.len()),
            kind: ChartKind::Bar,
            categories: names(&self.ranked),
            series: vec![Series::defined(
                "Volume 24h",
                self.ranked.iter().map(|row| row.volume_24h),
            )],
        }
    }
}

// --- Task 5 ---

#[derive(Debug)]
pub struct CoinComparison<'a> {
    pub first: &'a CoinSnapshot,
    pub second: &'a CoinSnapshot,
    pub volume_diff: f64,
    pub market_cap_diff: f64,
    pub supply_diff: f64,
}

/// Case-insensitive exact name lookup. Duplicates resolve to the first row.
pub fn find_coin<'a>(rows: &'a [CoinSnapshot], name: &str) -> Result<&'a CoinSnapshot, ReportError> {
    let wanted = name.to_lowercase();

    rows.iter()
        .find(|row| row.name.to_lowercase() == wanted)
        .ok_or_else(|| ReportError::CoinNotFound(name.to_string()))
}

pub fn compare<'a>(
    rows: &'a [CoinSnapshot],
    first: &str,
    second: &str,
) -> Result<CoinComparison<'a>, ReportError> {
    let first = find_coin(rows, first)?;
    let second = find_coin(rows, second)?;

    Ok(CoinComparison {
        first,
        second,
        volume_diff: (first.volume_24h - second.volume_24h).abs(),
        market_cap_diff: (first.market_cap - second.market_cap).abs(),
        supply_diff: (first.circulating_supply - second.circulating_supply).abs(),
    })
}

// --- Task 6 ---

pub const OTHERS_LABEL: &str = "Others";

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiquidityDistribution {
    pub ceiling: f64,
    /// Top coins in rank order, then "Others".
    pub slices: Vec<PieSlice>,
    /// Volume summed over every coin at or below the ceiling.
    pub filtered_total: f64,
}

/// Top coins by volume among those priced at or below `ceiling`, plus the
/// residual of the same filtered population as "Others".
pub fn liquidity_distribution(
    rows: &[CoinSnapshot],
    ceiling: f64,
    top_n: usize,
) -> Result<LiquidityDistribution, ReportError> {
    let filtered = rows.iter().filter(|row| row.price <= ceiling).collect_vec();
    if filtered.is_empty() {
        return Err(ReportError::NoEligibleRows {
            report: "liquidity distribution",
            ceiling,
        });
    }

    let filtered_total: f64 = filtered.iter().map(|row| row.volume_24h).sum();
    let ranked = rank_desc(filtered.iter().copied(), |row| Some(row.volume_24h), filtered.len());
    let (top, rest) = ranked.split_at(top_n.min(ranked.len()));
    // summed from the leftover rows so an empty remainder is exactly 0
    let others: f64 = rest.iter().map(|row| row.volume_24h).sum();

    let mut slices = top
        .iter()
        .map(|row| PieSlice {
            label: row.name.clone(),
            volume: row.volume_24h,
        })
        .collect_vec();
    slices.push(PieSlice {
        label: OTHERS_LABEL.to_string(),
        volume: others,
    });

    Ok(LiquidityDistribution {
        ceiling,
        slices,
        filtered_total,
    })
}

impl LiquidityDistribution {
    pub fn others(&self) -> f64 {
        self.slices.last().map(|slice| slice.volume).unwrap_or(0.0)
    }

    /// Percentage share of every slice, 0 when the total volume is 0.
    pub fn shares(&self) -> Vec<f64> {
        self.slices
            .iter()
            .map(|slice| {
                if self.filtered_total > 0.0 {
                    slice.volume / self.filtered_total * 100.0
                } else {
                    0.0
                }
            })
            .collect()
    }

    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            key: "liquidity-distribution".to_string(),
            title: format!("Liquidity Distribution (Volume 24h, price <= {})", self.ceiling),
            kind: ChartKind::Pie,
            categories: self.slices.iter().map(|slice| slice.label.clone()).collect(),
            series: vec![Series::defined(
                "Volume 24h",
                self.slices.iter().map(|slice| slice.volume),
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::derive;
    use crate::snapshot::CoinQuote;

    fn coin(name: &str, price: f64, volume: f64) -> CoinQuote {
        CoinQuote {
            name: name.to_string(),
            symbol: name.chars().take(3).collect::<String>().to_uppercase(),
            price,
            volume_24h: volume,
            market_cap: volume * 10.0,
            circulating_supply: volume / price.max(1.0),
            change_1h: None,
            change_24h: None,
            change_7d: None,
        }
    }

    fn with_changes(mut quote: CoinQuote, h1: f64, h24: f64, d7: f64) -> CoinQuote {
        quote.change_1h = Some(h1);
        quote.change_24h = Some(h24);
        quote.change_7d = Some(d7);
        quote
    }

    fn table(quotes: Vec<CoinQuote>) -> Vec<CoinSnapshot> {
        quotes.iter().map(derive).collect()
    }

    #[test]
    fn budget_kpi_picks_lowest_downfall_in_bucket() {
        let rows = table(vec![
            with_changes(coin("Alpha", 1.0, 10.0), 1.0, 1.0, 1.0),
            with_changes(coin("Beta", 2.0, 10.0), 0.5, -0.5, 0.5),
            with_changes(coin("Gamma", 70.0, 10.0), 0.0, 0.0, 0.0),
            with_changes(coin("Delta", 4.99, 10.0), 3.0, 3.0, 3.0),
        ]);

        let kpi = low_budget_max_profit(&rows, PriceBucket::From05To5);
        let pick = kpi.pick.expect("bucket is not empty");

        assert_eq!(pick.name, "Beta");
        assert_eq!(pick.avg_downfall_rounded(), 0.5);
        assert_eq!(kpi.selected, 3);
    }

    #[test]
    fn budget_kpi_ties_go_to_the_first_row() {
        let rows = table(vec![
            with_changes(coin("First", 1.0, 10.0), 1.0, 2.0, 3.0),
            with_changes(coin("Second", 1.5, 10.0), -3.0, -2.0, 1.0),
        ]);

        let kpi = low_budget_max_profit(&rows, PriceBucket::From05To5);
        assert_eq!(kpi.pick.map(|p| p.name), Some("First".to_string()));
    }

    #[test]
    fn budget_kpi_reports_empty_bucket() {
        let rows = table(vec![coin("Bitcoin", 97_000.0, 10.0), coin("Shiba", 0.00001, 10.0)]);

        let kpi = low_budget_max_profit(&rows, PriceBucket::From05To5);

        assert_eq!(kpi.pick, None);
        assert_eq!(kpi.selected, 0);
    }

    #[test]
    fn historical_prices_filter_closed_range_and_rank_by_prev_1h() {
        let rows = table(vec![
            with_changes(coin("Cheap", 0.1, 1.0), 0.0, 0.0, 0.0),
            with_changes(coin("Edge", 5.0, 1.0), 0.0, 0.0, 0.0),
            with_changes(coin("Dropped", 4.0, 1.0), -50.0, 0.0, 0.0),
            with_changes(coin("Pricey", 5.01, 1.0), 0.0, 0.0, 0.0),
        ]);

        let report = top_historical_prices(&rows, 5.0, 10);
        let ranked = report.ranked.iter().map(|r| r.name.as_str()).collect_vec();

        // Dropped was 8.0 an hour ago
        assert_eq!(ranked, vec!["Dropped", "Edge", "Cheap"]);

        let chart = report.chart();
        assert_eq!(chart.kind, ChartKind::StackedBar);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "7 Days Before");
        assert_eq!(chart.series[1].values, vec![Some(4.0), Some(5.0), Some(0.1)]);
    }

    #[test]
    fn historical_prices_put_undefined_last() {
        let rows = table(vec![
            with_changes(coin("Rugged", 2.0, 1.0), -100.0, 0.0, 0.0),
            with_changes(coin("Steady", 0.6, 1.0), 0.0, 0.0, 0.0),
        ]);

        let report = top_historical_prices(&rows, 5.0, 10);

        assert_eq!(report.ranked[0].name, "Steady");
        assert_eq!(report.ranked[1].name, "Rugged");
    }

    #[test]
    fn historical_prices_respect_top_n() {
        let rows = table((0..15).map(|i| coin(&format!("Coin{i}"), 0.1 * i as f64, 1.0)).collect());

        let report = top_historical_prices(&rows, 5.0, 10);

        assert_eq!(report.ranked.len(), 10);
        assert_eq!(report.ranked[0].name, "Coin14");
    }

    #[test]
    fn price_increase_ranks_bigger_delta_first() {
        // 3.0 / 2 = 1.5 -> +1.5, 6.0 / 2 = 3.0 -> +3.0
        let rows = table(vec![
            with_changes(coin("Slow", 3.0, 1.0), 100.0, 0.0, 0.0),
            with_changes(coin("Fast", 6.0, 1.0), 100.0, 0.0, 0.0),
            with_changes(coin("Big", 500.0, 1.0), 100.0, 0.0, 0.0),
        ]);

        let report = price_increase_leaders(&rows, PriceCategory::Under10, 10);
        let deltas = report.deltas();

        assert_eq!(deltas, vec![("FAS", Some(3.0)), ("SLO", Some(1.5))]);

        let chart = report.chart();
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.categories, vec!["Fast", "Slow"]);
        assert_eq!(chart.series[0].values, vec![Some(6.0), Some(3.0)]);
        assert_eq!(chart.series[1].values, vec![Some(3.0), Some(1.5)]);
    }

    #[test]
    fn price_increase_alternative_category() {
        let rows = table(vec![
            with_changes(coin("Small", 4.0, 1.0), 60.0, 0.0, 0.0),
            with_changes(coin("Large", 20.0, 1.0), 100.0, 0.0, 0.0),
        ]);

        let report = price_increase_leaders(&rows, PriceCategory::TenOrMore, 10);

        assert_eq!(report.ranked.len(), 1);
        assert_eq!(report.ranked[0].name, "Large");
    }

    #[test]
    fn liquidity_leaders_only_use_eligible_names() {
        let rows = table(vec![
            coin("Tether", 1.0, 90_000.0),
            coin("Bitcoin", 97_000.0, 50_000.0),
            coin("Solana", 200.0, 40_000.0),
            coin("Ethereum", 3_500.0, 30_000.0),
            coin("dogecoin", 0.2, 60_000.0),
        ]);

        let report = liquidity_leaders(&rows, 10);
        let ranked = report.ranked.iter().map(|r| r.name.as_str()).collect_vec();

        assert_eq!(ranked, vec!["dogecoin", "Bitcoin", "Ethereum"]);
        assert_eq!(
            report.chart().series[0].values,
            vec![Some(60_000.0), Some(50_000.0), Some(30_000.0)]
        );
    }

    #[test]
    fn compare_is_case_insensitive_and_absolute() {
        let rows = table(vec![coin("Bitcoin", 97_000.0, 50_000.0), coin("Ethereum", 3_500.0, 80_000.0)]);

        let comparison = compare(&rows, "BITCOIN", "ethereum").expect("both coins exist");

        assert_eq!(comparison.first.name, "Bitcoin");
        assert_eq!(comparison.second.name, "Ethereum");
        assert_eq!(comparison.volume_diff, 30_000.0);
        assert_eq!(comparison.market_cap_diff, 300_000.0);
    }

    #[test]
    fn compare_reports_unknown_coin() {
        let rows = table(vec![coin("Bitcoin", 97_000.0, 50_000.0)]);

        let err = compare(&rows, "bitcoin", "ethereum").unwrap_err();

        assert_eq!(err, ReportError::CoinNotFound("ethereum".to_string()));
        assert_eq!(err.to_string(), "coin not found: 'ethereum'");
    }

    #[test]
    fn find_coin_takes_the_first_duplicate() {
        let rows = table(vec![coin("Wrapped", 1.0, 1.0), coin("wrapped", 2.0, 2.0)]);

        assert_eq!(find_coin(&rows, "WRAPPED").unwrap().price, 1.0);
    }

    #[test]
    fn distribution_others_is_residual_of_filtered_set() {
        let mut quotes = vec![
            coin("A", 1.0, 200_000.0),
            coin("B", 1.0, 150_000.0),
            coin("C", 1.0, 150_000.0),
            coin("D", 1.0, 100_000.0),
            coin("E", 1.0, 100_000.0),
            coin("F", 1.0, 180_000.0),
            coin("G", 1.0, 120_000.0),
        ];
        // priced out of the filtered population
        quotes.push(coin("Whale", 90_000.0, 9_000_000.0));
        let rows = table(quotes);

        let report = liquidity_distribution(&rows, 50.0, 5).expect("rows below ceiling");

        assert_eq!(report.filtered_total, 1_000_000.0);
        assert_eq!(report.slices.len(), 6);
        assert_eq!(report.others(), 200_000.0);

        let labels = report.slices.iter().map(|s| s.label.as_str()).collect_vec();
        assert_eq!(labels, vec!["A", "F", "B", "C", "G", "Others"]);

        let sum: f64 = report.slices.iter().map(|s| s.volume).sum();
        assert_eq!(sum, 1_000_000.0);

        let shares = report.shares();
        assert_eq!(shares[0], 20.0);
        assert_eq!(shares[5], 20.0);
    }

    #[test]
    fn distribution_with_few_rows_has_zero_others() {
        let rows = table(vec![coin("A", 1.0, 10.0), coin("B", 2.0, 30.0)]);

        let report = liquidity_distribution(&rows, 50.0, 5).unwrap();

        assert_eq!(report.slices.len(), 3);
        assert_eq!(report.others(), 0.0);
        assert_eq!(report.chart().categories, vec!["B", "A", "Others"]);
    }

    #[test]
    fn distribution_others_matches_volume_left_after_top_five() {
        let rows = table(vec![
            coin("A", 1.0, 200_000.0),
            coin("B", 1.0, 150_000.0),
            coin("C", 1.0, 150_000.0),
            coin("D", 1.0, 100_000.0),
            coin("E", 1.0, 100_000.0),
            coin("F", 1.0, 90_000.0),
            coin("G", 1.0, 80_000.0),
            coin("H", 1.0, 70_000.0),
            coin("I", 1.0, 60_000.0),
        ]);

        let report = liquidity_distribution(&rows, 50.0, 5).unwrap();
        let top: f64 = report.slices[..5].iter().map(|s| s.volume).sum();

        assert_eq!(report.filtered_total, 1_000_000.0);
        assert_eq!(top, 700_000.0);
        assert_eq!(report.others(), 300_000.0);
        assert_eq!(report.slices.iter().map(|s| s.volume).sum::<f64>(), 1_000_000.0);
    }

    #[test]
    fn distribution_with_fractional_volumes_has_exact_zero_others() {
        let rows = table(vec![coin("A", 1.0, 0.1), coin("B", 1.0, 0.2), coin("C", 1.0, 0.3)]);

        let report = liquidity_distribution(&rows, 50.0, 5).unwrap();

        assert_eq!(report.others(), 0.0);
        assert_eq!(report.chart().series[0].values.last(), Some(&Some(0.0)));
    }

    #[test]
    fn distribution_others_never_goes_negative() {
        let volumes = [0.7, 0.1, 0.6, 0.2, 0.5, 0.4, 0.3];
        let rows = table(
            volumes
                .iter()
                .enumerate()
                .map(|(i, v)| coin(&format!("Coin{i}"), 1.0, *v))
                .collect(),
        );

        let report = liquidity_distribution(&rows, 50.0, 5).unwrap();

        assert_eq!(report.others(), 0.2 + 0.1);
        assert!(report.slices.iter().all(|s| s.volume >= 0.0));
    }

    #[test]
    fn distribution_title_names_the_ceiling() {
        let rows = table(vec![coin("A", 1.0, 10.0)]);

        let chart = liquidity_distribution(&rows, 50.0, 5).unwrap().chart();

        assert_eq!(chart.title, "Liquidity Distribution (Volume 24h, price <= 50)");
        assert_eq!(chart.series_named("Volume 24h").map(|s| s.values.len()), Some(2));
        assert!(chart.series_named("Price").is_none());
    }

    #[test]
    fn distribution_without_rows_is_an_error() {
        let rows = table(vec![coin("Bitcoin", 97_000.0, 10.0)]);

        assert!(matches!(
            liquidity_distribution(&rows, 50.0, 5),
            Err(ReportError::NoEligibleRows { .. })
        ));
    }
}
