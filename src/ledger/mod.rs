//! Durable store for token positions and wallet entries.
//!
//! Two append-only collections with composite unique keys:
//! (chat_id, mint_address) for positions, (chat_id, wallet_address) for
//! wallets. The engine talks to the trait only; `SqliteLedger` is the
//! production backend and `MemoryLedger` backs the tests.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

use async_trait::async_trait;

use crate::models::{NewTokenPosition, NewWalletEntry, TokenPosition, WalletEntry};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The composite unique key already exists. Also raised by the racing
    /// loser when two identical submissions hit the store concurrently.
    #[error("duplicate key")]
    Duplicate,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Storage operations the engine needs. All list operations return records
/// in insertion order; leaderboard tie-breaking relies on that.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn insert_position(&self, new: NewTokenPosition) -> Result<TokenPosition, LedgerError>;

    async fn positions_for_chat(&self, chat_id: i64) -> Result<Vec<TokenPosition>, LedgerError>;

    async fn position_by_mint(
        &self,
        chat_id: i64,
        mint_address: &str,
    ) -> Result<Option<TokenPosition>, LedgerError>;

    async fn positions_for_user(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Vec<TokenPosition>, LedgerError>;

    async fn insert_wallet(&self, new: NewWalletEntry) -> Result<WalletEntry, LedgerError>;

    async fn wallets_for_chat(&self, chat_id: i64) -> Result<Vec<WalletEntry>, LedgerError>;

    async fn wallet_by_address(
        &self,
        chat_id: i64,
        wallet_address: &str,
    ) -> Result<Option<WalletEntry>, LedgerError>;
}
