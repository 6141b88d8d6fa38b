use coinsight_analytics::reports::{
    BudgetKpi, CoinComparison, HistoricalPrices, LiquidityDistribution, LiquidityLeaders,
    PriceIncreaseLeaders,
};
use coinsight_analytics::CoinSnapshot;
use prettytable::{row, Table};

fn price(value: f64) -> String {
    if value < 0.01 {
        format!("{value:.8}")
    } else if value < 1.0 {
        format!("{value:.4}")
    } else {
        format!("{value:.2}")
    }
}

fn maybe_price(value: Option<f64>) -> String {
    value.map(price).unwrap_or_else(|| "n/a".to_string())
}

pub fn print_budget_kpi(kpi: &BudgetKpi) {
    println!("\n--- TASK 1 KPI ---");
    println!("Price Range          : {}", kpi.bucket);
    match &kpi.pick {
        Some(pick) => {
            println!("Coin Name            : {}", pick.name);
            println!("Symbol               : {}", pick.symbol);
            println!("Price                : {}", pick.price);
            println!("Avg Downfall %       : {:.2}", pick.avg_downfall_rounded());
        }
        None => println!("No eligible coin in price range {}", kpi.bucket),
    }
    println!("Total Coins Selected : {}", kpi.selected);
}

pub fn historical_table(report: &HistoricalPrices<'_>) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["#", "Coin", "1 Hour Before", "7 Days Before", "24 Hours Before"]);
    for (rank, row) in report.ranked.iter().enumerate() {
        table.add_row(row![
            rank + 1,
            row.name,
            maybe_price(row.prev_1h),
            maybe_price(row.prev_7d),
            maybe_price(row.prev_24h)
        ]);
    }
    table
}

pub fn price_change_table(report: &PriceIncreaseLeaders<'_>) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Symbol", "PriceChange_1h"]);
    for (symbol, delta) in report.deltas() {
        table.add_row(row![symbol, maybe_price(delta)]);
    }
    table
}

pub fn liquidity_table(report: &LiquidityLeaders<'_>) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["#", "Coin", "Volume 24h"]);
    for (rank, row) in report.ranked.iter().enumerate() {
        table.add_row(row![rank + 1, row.name, format!("{:.2}", row.volume_24h)]);
    }
    table
}

fn coin_facts(coin: &CoinSnapshot) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Symbol", coin.symbol]);
    table.add_row(row!["Price", price(coin.price)]);
    table.add_row(row!["Volume24h", format!("{:.2}", coin.volume_24h)]);
    table.add_row(row!["MarketCap", format!("{:.2}", coin.market_cap)]);
    table.add_row(row!["CirculatingSupply", format!("{:.2}", coin.circulating_supply)]);
    table
}

pub fn comparison_tables(comparison: &CoinComparison<'_>) -> [Table; 3] {
    let mut diff = Table::new();
    diff.add_row(row!["Volume Diff", format!("{:.2}", comparison.volume_diff)]);
    diff.add_row(row!["MarketCap Diff", format!("{:.2}", comparison.market_cap_diff)]);
    diff.add_row(row!["Circulating Supply Diff", format!("{:.2}", comparison.supply_diff)]);

    [coin_facts(comparison.first), coin_facts(comparison.second), diff]
}

pub fn print_comparison(comparison: &CoinComparison<'_>) {
    let [first, second, diff] = comparison_tables(comparison);

    println!("\n--- COIN COMPARISON ---");
    println!("\n{}", comparison.first.name);
    first.printstd();
    println!("\n{}", comparison.second.name);
    second.printstd();
    println!("\n--- KPI DIFFERENCE ---");
    diff.printstd();
}

pub fn distribution_table(report: &LiquidityDistribution) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["Slice", "Volume 24h", "Share"]);
    for (slice, share) in report.slices.iter().zip(report.shares()) {
        table.add_row(row![slice.label, format!("{:.2}", slice.volume), format!("{share:.1}%")]);
    }
    table
}
