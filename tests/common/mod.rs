use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use snipebot::engine::Engine;
use snipebot::ledger::MemoryLedger;
use snipebot::market::{MarketData, MarketDataError, TokenHolding};

/// Scriptable market-data fake. Absent entries read as unavailable, so a
/// test controls exactly which live reads succeed.
#[derive(Default)]
pub struct StaticMarket {
    state: Mutex<MarketState>,
}

#[derive(Default)]
struct MarketState {
    sol_price: Option<f64>,
    trade_prices: HashMap<String, f64>,
    holdings: HashMap<String, Vec<TokenHolding>>,
}

#[allow(dead_code)]
impl StaticMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_sol_price(&self, price: f64) {
        self.state.lock().await.sol_price = Some(price);
    }

    pub async fn fail_sol_price(&self) {
        self.state.lock().await.sol_price = None;
    }

    pub async fn set_trade_price(&self, mint: &str, price: f64) {
        self.state
            .lock()
            .await
            .trade_prices
            .insert(mint.to_string(), price);
    }

    pub async fn fail_trade_price(&self, mint: &str) {
        self.state.lock().await.trade_prices.remove(mint);
    }

    pub async fn set_holdings(&self, wallet: &str, holdings: Vec<(f64, f64)>) {
        let holdings = holdings
            .into_iter()
            .map(|(balance, unit_value_usd)| TokenHolding {
                balance,
                unit_value_usd,
            })
            .collect();
        self.state
            .lock()
            .await
            .holdings
            .insert(wallet.to_string(), holdings);
    }
}

#[async_trait]
impl MarketData for StaticMarket {
    async fn sol_price_usd(&self) -> Result<f64, MarketDataError> {
        self.state
            .lock()
            .await
            .sol_price
            .ok_or_else(|| MarketDataError::Unavailable("no SOL price scripted".into()))
    }

    async fn latest_trade_price_sol(&self, mint: &str) -> Result<f64, MarketDataError> {
        self.state
            .lock()
            .await
            .trade_prices
            .get(mint)
            .copied()
            .ok_or_else(|| MarketDataError::Unavailable(format!("no trade price for {mint}")))
    }

    async fn wallet_holdings(&self, wallet: &str) -> Result<Vec<TokenHolding>, MarketDataError> {
        self.state
            .lock()
            .await
            .holdings
            .get(wallet)
            .cloned()
            .ok_or_else(|| MarketDataError::Unavailable(format!("no holdings for {wallet}")))
    }
}

/// Engine over a fresh in-memory ledger and the given market fake, with
/// the standard 0.5 SOL stake.
#[allow(dead_code)]
pub fn test_engine(market: Arc<StaticMarket>) -> (Engine, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::new());
    let engine = Engine::new(ledger.clone(), market, 0.5);
    (engine, ledger)
}

/// A syntactically valid 44-character mint address, distinguished by `tag`.
#[allow(dead_code)]
pub fn test_mint(tag: char) -> String {
    let mut s = String::from("Mint");
    while s.len() < 43 {
        s.push('A');
    }
    s.push(tag);
    s
}

/// A syntactically valid 44-character wallet address.
#[allow(dead_code)]
pub fn test_wallet(tag: char) -> String {
    let mut s = String::from("Wa11et");
    while s.len() < 43 {
        s.push('B');
    }
    s.push(tag);
    s
}
