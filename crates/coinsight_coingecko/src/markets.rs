use crate::method::Method;
use bon::Builder;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct MarketsParams {
    #[builder(default = String::from("usd"))]
    pub vs_currency: String,
    #[builder(default = String::from("market_cap_desc"))]
    pub order: String,
    #[builder(default = 200)]
    pub per_page: u32,
    #[builder(default = 1)]
    pub page: u32,
    #[builder(default)]
    pub sparkline: bool,
    /// Comma separated windows, e.g. `1h,24h,7d`.
    #[builder(default = String::from("1h,24h,7d"))]
    pub price_change_percentage: String,
}

impl Default for MarketsParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// One row of `/coins/markets`. Everything except `id` can come back null.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MarketCoin {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    pub price_change_percentage_1h_in_currency: Option<f64>,
    pub price_change_percentage_24h_in_currency: Option<f64>,
    pub price_change_percentage_7d_in_currency: Option<f64>,
    pub total_volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub circulating_supply: Option<f64>,
}

pub struct CoinsMarkets;

impl Method for CoinsMarkets {
    const PATH: &'static str = "/coins/markets";

    type Response = Vec<MarketCoin>;
    type Params = MarketsParams;
}
