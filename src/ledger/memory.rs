use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{Ledger, LedgerError};
use crate::models::{NewTokenPosition, NewWalletEntry, TokenPosition, WalletEntry};

/// In-memory ledger with the same duplicate semantics as `SqliteLedger`.
/// Used by the test suite; never wired into the running bot.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    positions: Vec<TokenPosition>,
    wallets: Vec<WalletEntry>,
    next_id: i64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn insert_position(&self, new: NewTokenPosition) -> Result<TokenPosition, LedgerError> {
        let mut inner = self.inner.lock().await;

        let exists = inner
            .positions
            .iter()
            .any(|p| p.chat_id == new.chat_id && p.mint_address == new.mint_address);
        if exists {
            return Err(LedgerError::Duplicate);
        }

        inner.next_id += 1;
        let position = TokenPosition {
            id: inner.next_id,
            chat_id: new.chat_id,
            user_id: new.user_id,
            username: new.username,
            mint_address: new.mint_address,
            cost_basis_usd: new.cost_basis_usd,
            num_tokens: new.num_tokens,
            created_at: Utc::now(),
        };
        inner.positions.push(position.clone());

        Ok(position)
    }

    async fn positions_for_chat(&self, chat_id: i64) -> Result<Vec<TokenPosition>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .positions
            .iter()
            .filter(|p| p.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn position_by_mint(
        &self,
        chat_id: i64,
        mint_address: &str,
    ) -> Result<Option<TokenPosition>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .positions
            .iter()
            .find(|p| p.chat_id == chat_id && p.mint_address == mint_address)
            .cloned())
    }

    async fn positions_for_user(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Vec<TokenPosition>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .positions
            .iter()
            .filter(|p| p.chat_id == chat_id && p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_wallet(&self, new: NewWalletEntry) -> Result<WalletEntry, LedgerError> {
        let mut inner = self.inner.lock().await;

        let exists = inner
            .wallets
            .iter()
            .any(|w| w.chat_id == new.chat_id && w.wallet_address == new.wallet_address);
        if exists {
            return Err(LedgerError::Duplicate);
        }

        inner.next_id += 1;
        let entry = WalletEntry {
            id: inner.next_id,
            chat_id: new.chat_id,
            user_id: new.user_id,
            username: new.username,
            wallet_address: new.wallet_address,
            start_usd_value: new.start_usd_value,
            created_at: Utc::now(),
        };
        inner.wallets.push(entry.clone());

        Ok(entry)
    }

    async fn wallets_for_chat(&self, chat_id: i64) -> Result<Vec<WalletEntry>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .wallets
            .iter()
            .filter(|w| w.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn wallet_by_address(
        &self,
        chat_id: i64,
        wallet_address: &str,
    ) -> Result<Option<WalletEntry>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .wallets
            .iter()
            .find(|w| w.chat_id == chat_id && w.wallet_address == wallet_address)
            .cloned())
    }
}
