//! Live market data: SOL/USD reference price, latest trade prices for
//! pump.fun mints, and wallet holdings snapshots.
//!
//! Every failure mode (transport, timeout, malformed response, missing
//! trade history, non-positive price) collapses into
//! `MarketDataError::Unavailable` at this boundary, so a price of exactly
//! zero can only ever reach the engine as an `Ok` value.

pub mod pumpfun;

pub use pumpfun::PumpFunClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

/// One token line in a wallet holdings snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenHolding {
    pub balance: f64,
    pub unit_value_usd: f64,
}

impl TokenHolding {
    pub fn usd_value(&self) -> f64 {
        self.balance * self.unit_value_usd
    }
}

/// Read operations the engine consumes. No retries happen behind this
/// trait; a failed read is surfaced once and the dispatcher tells the user
/// to try again.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current SOL price in USD.
    async fn sol_price_usd(&self) -> Result<f64, MarketDataError>;

    /// Latest traded price of a mint, denominated in SOL.
    async fn latest_trade_price_sol(&self, mint: &str) -> Result<f64, MarketDataError>;

    /// Current holdings of a wallet. An empty list is a valid snapshot of
    /// an empty wallet, not a failure.
    async fn wallet_holdings(&self, wallet: &str) -> Result<Vec<TokenHolding>, MarketDataError>;
}
