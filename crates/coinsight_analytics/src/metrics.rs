use crate::snapshot::{CoinQuote, CoinSnapshot};
use coinsight_shared_models::{PriceBucket, PriceCategory};

/// Initials that make a coin name eligible for the liquidity ranking.
pub const ELIGIBLE_INITIALS: [char; 8] = ['A', 'E', 'I', 'O', 'U', 'B', 'C', 'D'];

/// Divides `price` by `denominator`, or `None` when the result is not a number.
fn reconstruct(price: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }

    let value = price / denominator;
    value.is_finite().then_some(value)
}

/// Price one hour ago: `price / (1 + change_1h / 100)`.
pub fn prev_price_1h(price: f64, change_1h: f64) -> Option<f64> {
    reconstruct(price, 1.0 + change_1h / 100.0)
}

/// Price 24 hours ago: `price / (1 - change_24h / 100)`.
///
/// Note the sign is flipped relative to the 1h and 7d windows.
pub fn prev_price_24h(price: f64, change_24h: f64) -> Option<f64> {
    reconstruct(price, 1.0 - change_24h / 100.0)
}

/// Price seven days ago: `price / (1 + change_7d / 100)`.
pub fn prev_price_7d(price: f64, change_7d: f64) -> Option<f64> {
    reconstruct(price, 1.0 + change_7d / 100.0)
}

/// Mean magnitude of the three change windows, sign ignored.
pub fn average_downfall(change_1h: f64, change_24h: f64, change_7d: f64) -> f64 {
    (change_1h.abs() + change_24h.abs() + change_7d.abs()) / 3.0
}

/// True when the name starts (case-insensitively) with a vowel, B, C or D.
pub fn is_eligible_name(name: &str) -> bool {
    name.chars()
        .next()
        .map(|initial| ELIGIBLE_INITIALS.contains(&initial.to_ascii_uppercase()))
        .unwrap_or(false)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Derives a [`CoinSnapshot`] from a quote.
///
/// Missing change percentages count as "no change" (0%), which makes the
/// matching reconstructed price equal to the current price.
pub fn derive(quote: &CoinQuote) -> CoinSnapshot {
    let change_1h = quote.change_1h.unwrap_or(0.0);
    let change_24h = quote.change_24h.unwrap_or(0.0);
    let change_7d = quote.change_7d.unwrap_or(0.0);

    let prev_1h = prev_price_1h(quote.price, change_1h);

    CoinSnapshot {
        name: quote.name.clone(),
        symbol: quote.symbol.clone(),
        price: quote.price,
        volume_24h: quote.volume_24h,
        market_cap: quote.market_cap,
        circulating_supply: quote.circulating_supply,
        change_1h,
        change_24h,
        change_7d,
        bucket: PriceBucket::classify(quote.price),
        avg_downfall: average_downfall(change_1h, change_24h, change_7d),
        prev_1h,
        prev_24h: prev_price_24h(quote.price, change_24h),
        prev_7d: prev_price_7d(quote.price, change_7d),
        delta_1h: prev_1h.map(|prev| quote.price - prev),
        category: PriceCategory::classify(quote.price),
        eligible_name: is_eligible_name(&quote.name),
    }
}

/// Derives the whole table, keeping the source order.
pub fn derive_all(quotes: &[CoinQuote]) -> Vec<CoinSnapshot> {
    quotes.iter().map(derive).collect()
}
