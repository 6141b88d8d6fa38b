use coinsight_shared_models::{PriceBucket, PriceCategory};

/// One coin as delivered by the market-data source, after validation.
///
/// Change percentages stay optional here; the source omits them for coins
/// that are too young to have a 7 day (or even 1 hour) history.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinQuote {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub circulating_supply: f64,
    pub change_1h: Option<f64>,
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
}

/// A quote plus everything derived from it. Built once, never mutated.
///
/// Reconstructed prices are `None` when the inverse transform divides by zero
/// (a change of exactly -100% for 1h/7d, +100% for 24h).
#[derive(Debug, Clone, PartialEq)]
pub struct CoinSnapshot {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub circulating_supply: f64,
    pub change_1h: f64,
    pub change_24h: f64,
    pub change_7d: f64,

    pub bucket: PriceBucket,
    pub avg_downfall: f64,
    pub prev_1h: Option<f64>,
    pub prev_24h: Option<f64>,
    pub prev_7d: Option<f64>,
    pub delta_1h: Option<f64>,
    pub category: PriceCategory,
    pub eligible_name: bool,
}
