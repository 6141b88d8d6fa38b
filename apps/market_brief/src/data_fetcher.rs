use crate::config::FetchSettings;
use anyhow::Context;
use coinsight_analytics::CoinQuote;
use coinsight_coingecko::CoinGeckoClient;
use coinsight_coingecko::markets::{CoinsMarkets, MarketCoin, MarketsParams};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Error decoding payload: {0}")]
    ResponseDecodeError(#[from] serde_json::Error),
    #[error("API error: {0}")]
    ApiError(#[from] reqwest::Error),
    #[error("Payload file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Provider returned no coins")]
    EmptyPayload,
    #[error("Record #{index} ('{id}') is missing '{field}'")]
    MissingField {
        index: usize,
        id: String,
        field: &'static str,
    },
    #[error("Record #{index} ('{id}') has invalid price {price}")]
    InvalidPrice { index: usize, id: String, price: f64 },
}

pub fn load_payload(path: &Path) -> Result<Vec<MarketCoin>, FetchError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn save_payload(path: &Path, coins: &[MarketCoin]) -> Result<(), FetchError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, coins)?;
    Ok(())
}

/// Pulls the market snapshot, from disk when a replay file is configured.
pub async fn fetch_market(settings: &FetchSettings) -> anyhow::Result<Vec<MarketCoin>> {
    let coins = if let Some(path) = &settings.from_file {
        info!(path = %path.display(), "Loading market snapshot from file");
        load_payload(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        let mut client = CoinGeckoClient::new(settings.api_key.as_deref(), settings.timeout)
            .context("Failed to build market data client")?;
        if let Some(base_url) = &settings.base_url {
            client = client.with_base_url(base_url.as_str());
        }

        let params = MarketsParams::builder()
            .vs_currency(settings.currency.as_str())
            .per_page(settings.per_page)
            .page(1)
            .build();

        info!(
            url = %client.url_for::<CoinsMarkets>(),
            currency = %params.vs_currency,
            per_page = params.per_page,
            "Fetching market snapshot"
        );

        client
            .call::<CoinsMarkets>(params)
            .await
            .map_err(FetchError::from)
            .context("Market data provider request failed")?
    };

    if let Some(path) = &settings.save_raw {
        save_payload(path, &coins).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), coins = coins.len(), "Saved raw snapshot");
    }

    Ok(coins)
}

fn required<'a>(value: &'a Option<String>, index: usize, id: &str, field: &'static str) -> Result<&'a str, FetchError> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(FetchError::MissingField {
            index,
            id: id.to_string(),
            field,
        }),
    }
}

fn amount_or_zero(value: Option<f64>, index: usize, id: &str, field: &'static str) -> f64 {
    value.unwrap_or_else(|| {
        warn!(index, id, field, "Missing value, using 0");
        0.0
    })
}

/// Turns provider rows into quotes, refusing anything the derivation
/// could not work with. Missing change percentages stay `None`.
pub fn to_quotes(coins: &[MarketCoin]) -> Result<Vec<CoinQuote>, FetchError> {
    if coins.is_empty() {
        return Err(FetchError::EmptyPayload);
    }

    coins
        .iter()
        .enumerate()
        .map(|(index, coin)| -> Result<CoinQuote, FetchError> {
            let id = coin.id.as_str();
            let name = required(&coin.name, index, id, "name")?;
            let symbol = required(&coin.symbol, index, id, "symbol")?;
            let price = coin.current_price.ok_or_else(|| FetchError::MissingField {
                index,
                id: id.to_string(),
                field: "current_price",
            })?;

            if !price.is_finite() || price < 0.0 {
                return Err(FetchError::InvalidPrice {
                    index,
                    id: id.to_string(),
                    price,
                });
            }

            Ok(CoinQuote {
                name: name.to_string(),
                symbol: symbol.to_string(),
                price,
                volume_24h: amount_or_zero(coin.total_volume, index, id, "total_volume"),
                market_cap: amount_or_zero(coin.market_cap, index, id, "market_cap"),
                circulating_supply: amount_or_zero(coin.circulating_supply, index, id, "circulating_supply"),
                change_1h: coin.price_change_percentage_1h_in_currency,
                change_24h: coin.price_change_percentage_24h_in_currency,
                change_7d: coin.price_change_percentage_7d_in_currency,
            })
        })
        .collect()
}
