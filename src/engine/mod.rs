//! PnL engine: frozen cost basis at entry, live valuation at query time,
//! leaderboard ranking and share text.
//!
//! The engine holds no cached market or ledger state across calls: every
//! operation re-reads the ledger and re-queries live prices, so results are
//! exactly as fresh as the two most recent external reads. Within a single
//! leaderboard pass the SOL price is fetched once and reused for every row;
//! per-mint trade prices are independent reads and may differ in wall-clock
//! time from one another.

pub mod ranker;
pub mod share;

use std::sync::Arc;

use serde::Serialize;

use crate::address::is_valid_solana_address;
use crate::errors::EngineError;
use crate::ledger::Ledger;
use crate::market::MarketData;
use crate::models::{NewTokenPosition, NewWalletEntry, TokenPosition, WalletEntry};
use self::ranker::rank_by_pnl;
use self::share::ShareText;

/// A stored position valued against live prices.
#[derive(Debug, Clone)]
pub struct PickValuation {
    pub position: TokenPosition,
    pub current_price_usd: f64,
    pub pnl: f64,
    /// True when the live trade price could not be read; the row then
    /// carries `pnl = -cost_basis` rather than a real valuation.
    pub price_unavailable: bool,
}

/// One row of the shilled-CA leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct TokenLeaderboardRow {
    pub rank: usize,
    pub username: String,
    pub mint_address: String,
    pub pnl: f64,
    pub cost_basis_usd: f64,
    pub current_price_usd: f64,
    pub price_unavailable: bool,
}

/// One row of the Sniper Bowl leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct WalletLeaderboardRow {
    pub rank: usize,
    pub username: String,
    pub wallet_address: String,
    pub net_worth_usd: f64,
    pub pnl: f64,
    pub holdings_unavailable: bool,
}

pub struct Engine {
    ledger: Arc<dyn Ledger>,
    market: Arc<dyn MarketData>,
    stake_sol: f64,
}

impl Engine {
    pub fn new(ledger: Arc<dyn Ledger>, market: Arc<dyn MarketData>, stake_sol: f64) -> Self {
        Self {
            ledger,
            market,
            stake_sol,
        }
    }

    /// Record a simulated fixed-stake buy of a mint. The cost basis and
    /// token quantity are computed from the prices seen right now and
    /// frozen for the life of the record.
    pub async fn record_token_position(
        &self,
        chat_id: i64,
        user_id: i64,
        username: &str,
        mint_address: &str,
    ) -> Result<TokenPosition, EngineError> {
        if !is_valid_solana_address(mint_address) {
            return Err(EngineError::InvalidAddress(mint_address.to_string()));
        }

        let existing = self
            .ledger
            .position_by_mint(chat_id, mint_address)
            .await
            .map_err(|e| EngineError::from_ledger(e, mint_address))?;
        if existing.is_some() {
            return Err(EngineError::Duplicate(mint_address.to_string()));
        }

        let sol_price = self
            .market
            .sol_price_usd()
            .await
            .map_err(|_| EngineError::MarketUnavailable)?;
        let trade_price = self
            .market
            .latest_trade_price_sol(mint_address)
            .await
            .map_err(|_| EngineError::MarketUnavailable)?;

        let new = NewTokenPosition {
            chat_id,
            user_id,
            username: username.to_string(),
            mint_address: mint_address.to_string(),
            cost_basis_usd: self.stake_sol * sol_price,
            num_tokens: self.stake_sol / trade_price,
        };

        // The read-then-insert sequence is not transactional; a racing
        // identical submission loses here on the unique key.
        let position = self
            .ledger
            .insert_position(new)
            .await
            .map_err(|e| EngineError::from_ledger(e, mint_address))?;

        tracing::info!(
            chat_id,
            user_id,
            mint = %position.mint_address,
            cost_basis_usd = position.cost_basis_usd,
            num_tokens = position.num_tokens,
            "Recorded token position"
        );

        Ok(position)
    }

    /// Shilled-CA leaderboard for a chat: every stored position valued at
    /// live prices, ranked by PnL descending, top 10.
    pub async fn compute_token_leaderboard(
        &self,
        chat_id: i64,
    ) -> Result<Vec<TokenLeaderboardRow>, EngineError> {
        let sol_price = self
            .market
            .sol_price_usd()
            .await
            .map_err(|_| EngineError::MarketUnavailable)?;

        let positions = self
            .ledger
            .positions_for_chat(chat_id)
            .await
            .map_err(|e| EngineError::from_ledger(e, "token_positions"))?;

        let mut valuations = Vec::with_capacity(positions.len());
        for position in positions {
            valuations.push(self.value_position(position, sol_price).await);
        }

        Ok(rank_by_pnl(valuations, |v| v.pnl)
            .into_iter()
            .map(|(rank, v)| TokenLeaderboardRow {
                rank,
                username: v.position.username,
                mint_address: v.position.mint_address,
                pnl: v.pnl,
                cost_basis_usd: v.position.cost_basis_usd,
                current_price_usd: v.current_price_usd,
                price_unavailable: v.price_unavailable,
            })
            .collect())
    }

    /// Register a wallet for the Sniper Bowl, freezing the USD value of
    /// the starting stake at registration time.
    pub async fn register_wallet(
        &self,
        chat_id: i64,
        user_id: i64,
        username: &str,
        wallet_address: &str,
    ) -> Result<WalletEntry, EngineError> {
        if !is_valid_solana_address(wallet_address) {
            return Err(EngineError::InvalidAddress(wallet_address.to_string()));
        }

        let existing = self
            .ledger
            .wallet_by_address(chat_id, wallet_address)
            .await
            .map_err(|e| EngineError::from_ledger(e, wallet_address))?;
        if existing.is_some() {
            return Err(EngineError::Duplicate(wallet_address.to_string()));
        }

        let sol_price = self
            .market
            .sol_price_usd()
            .await
            .map_err(|_| EngineError::MarketUnavailable)?;

        let new = NewWalletEntry {
            chat_id,
            user_id,
            username: username.to_string(),
            wallet_address: wallet_address.to_string(),
            start_usd_value: self.stake_sol * sol_price,
        };

        let entry = self
            .ledger
            .insert_wallet(new)
            .await
            .map_err(|e| EngineError::from_ledger(e, wallet_address))?;

        tracing::info!(
            chat_id,
            user_id,
            wallet = %entry.wallet_address,
            start_usd_value = entry.start_usd_value,
            "Registered Sniper Bowl wallet"
        );

        Ok(entry)
    }

    /// Sniper Bowl leaderboard: live net worth of each registered wallet
    /// against its frozen starting stake.
    pub async fn compute_wallet_leaderboard(
        &self,
        chat_id: i64,
    ) -> Result<Vec<WalletLeaderboardRow>, EngineError> {
        // Both leaderboards require a live SOL price read before anything
        // else; during an outage they fail the same way.
        self.market
            .sol_price_usd()
            .await
            .map_err(|_| EngineError::MarketUnavailable)?;

        let wallets = self
            .ledger
            .wallets_for_chat(chat_id)
            .await
            .map_err(|e| EngineError::from_ledger(e, "wallet_entries"))?;

        let mut valuations = Vec::with_capacity(wallets.len());
        for entry in wallets {
            let (net_worth_usd, holdings_unavailable) =
                match self.market.wallet_holdings(&entry.wallet_address).await {
                    Ok(holdings) => (holdings.iter().map(|h| h.usd_value()).sum::<f64>(), false),
                    Err(_) => (0.0, true),
                };

            valuations.push(WalletLeaderboardRow {
                rank: 0,
                username: entry.username,
                wallet_address: entry.wallet_address,
                net_worth_usd,
                pnl: net_worth_usd - entry.start_usd_value,
                holdings_unavailable,
            });
        }

        Ok(rank_by_pnl(valuations, |v| v.pnl)
            .into_iter()
            .map(|(rank, mut row)| {
                row.rank = rank;
                row
            })
            .collect())
    }

    /// Share text for one user's picks in one chat, valued live.
    pub async fn build_share_text(
        &self,
        chat_id: i64,
        user_id: i64,
        username: &str,
    ) -> Result<ShareText, EngineError> {
        let positions = self
            .ledger
            .positions_for_user(chat_id, user_id)
            .await
            .map_err(|e| EngineError::from_ledger(e, "token_positions"))?;
        if positions.is_empty() {
            return Err(EngineError::NoPositions);
        }

        let sol_price = self
            .market
            .sol_price_usd()
            .await
            .map_err(|_| EngineError::MarketUnavailable)?;

        let mut picks = Vec::with_capacity(positions.len());
        for position in positions {
            picks.push(self.value_position(position, sol_price).await);
        }

        Ok(share::build_share_text(username, chat_id, &picks))
    }

    /// Value one stored position against the given SOL price and a fresh
    /// trade-price read. An unavailable trade price degrades this row to
    /// `pnl = -cost_basis` with the flag set; it never aborts the pass.
    async fn value_position(&self, position: TokenPosition, sol_price: f64) -> PickValuation {
        match self
            .market
            .latest_trade_price_sol(&position.mint_address)
            .await
        {
            Ok(trade_price) => {
                let current_price_usd = trade_price * sol_price;
                let current_value_usd = position.num_tokens * current_price_usd;
                PickValuation {
                    pnl: current_value_usd - position.cost_basis_usd,
                    current_price_usd,
                    price_unavailable: false,
                    position,
                }
            }
            Err(_) => PickValuation {
                pnl: -position.cost_basis_usd,
                current_price_usd: 0.0,
                price_unavailable: true,
                position,
            },
        }
    }
}
