use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A wallet registered for the Sniper Bowl, with its simulated starting
/// stake frozen in USD at registration time.
///
/// Append-only, unique per (chat_id, wallet_address).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalletEntry {
    pub id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub wallet_address: String,
    /// USD value of 0.5 SOL at registration. Never recomputed.
    pub start_usd_value: f64,
    pub created_at: DateTime<Utc>,
}

/// Field set for registering a wallet; the ledger assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewWalletEntry {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub wallet_address: String,
    pub start_usd_value: f64,
}
