use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::{MarketData, MarketDataError, TokenHolding};
use async_trait::async_trait;

const PUMPFUN_API_BASE: &str = "https://frontend-api-v2.pump.fun";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiSolPrice {
    #[serde(rename = "solPrice")]
    sol_price: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCandlestick {
    close: f64,
}

#[derive(Debug, Deserialize)]
struct ApiBalance {
    #[serde(default)]
    balance: f64,
    /// Unit value of the token in USD.
    #[serde(default)]
    value: f64,
}

/// Client for the pump.fun frontend API.
#[derive(Debug, Clone)]
pub struct PumpFunClient {
    http: Client,
    base_url: String,
}

impl PumpFunClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, PUMPFUN_API_BASE.into())
    }

    /// Point the client at a different base URL (tests, staging mirrors).
    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketDataError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(url, error = %e, "pump.fun request failed");
                MarketDataError::Unavailable(e.to_string())
            })?;

        resp.json::<T>().await.map_err(|e| {
            tracing::warn!(url, error = %e, "pump.fun response malformed");
            MarketDataError::Unavailable(e.to_string())
        })
    }
}

#[async_trait]
impl MarketData for PumpFunClient {
    async fn sol_price_usd(&self) -> Result<f64, MarketDataError> {
        let url = format!("{}/sol-price", self.base_url);
        let body: ApiSolPrice = self.get_json(&url, &[]).await?;

        if body.sol_price <= 0.0 {
            return Err(MarketDataError::Unavailable(
                "non-positive SOL price".into(),
            ));
        }

        Ok(body.sol_price)
    }

    async fn latest_trade_price_sol(&self, mint: &str) -> Result<f64, MarketDataError> {
        let url = format!("{}/candlesticks/{}", self.base_url, mint);
        let candles: Vec<ApiCandlestick> = self
            .get_json(&url, &[("offset", "0"), ("limit", "1"), ("timeframe", "1")])
            .await?;

        // No candles means the mint has no trade history yet.
        let close = match candles.last() {
            Some(candle) => candle.close,
            None => {
                return Err(MarketDataError::Unavailable(format!(
                    "no trade history for {mint}"
                )))
            }
        };

        if close <= 0.0 {
            return Err(MarketDataError::Unavailable(format!(
                "non-positive close price for {mint}"
            )));
        }

        Ok(close)
    }

    async fn wallet_holdings(&self, wallet: &str) -> Result<Vec<TokenHolding>, MarketDataError> {
        let url = format!("{}/balances/{}", self.base_url, wallet);
        let balances: Vec<ApiBalance> = self
            .get_json(&url, &[("limit", "50"), ("offset", "0"), ("minBalance", "-1")])
            .await?;

        Ok(balances
            .into_iter()
            .map(|b| TokenHolding {
                balance: b.balance,
                unit_value_usd: b.value,
            })
            .collect())
    }
}
