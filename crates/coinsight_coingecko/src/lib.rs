pub mod markets;
pub mod method;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub const BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(#[from] InvalidHeaderValue),
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub struct CoinGeckoClient {
    base_url: String,
    reqwest: Client,
}

impl CoinGeckoClient {
    pub fn new(api_key: Option<&str>, timeout: Duration) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(api_key) = api_key {
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(api_key)?);
        }

        let reqwest = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: BASE_URL.to_string(),
            reqwest,
        })
    }

    /// Point the client at another deployment (pro API, local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn url_for<M: method::Method>(&self) -> String {
        format!("{}{}", self.base_url, M::PATH)
    }

    pub(crate) async fn get<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> reqwest::Result<T> {
        let response = self
            .reqwest
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(response)
    }

    pub async fn call<M: method::Method>(&self, params: M::Params) -> reqwest::Result<M::Response> {
        self.get(&self.url_for::<M>(), &params).await
    }
}
