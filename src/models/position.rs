use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One simulated 0.5 SOL buy of a shilled mint, frozen at creation.
///
/// Append-only: there is no update or delete path anywhere in the bot.
/// Unique per (chat_id, mint_address).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TokenPosition {
    pub id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub mint_address: String,
    /// USD value of the stake at entry. Never recomputed.
    pub cost_basis_usd: f64,
    /// Token quantity bought at the entry trade price. Never recomputed.
    pub num_tokens: f64,
    pub created_at: DateTime<Utc>,
}

/// Field set for inserting a new position; the ledger assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewTokenPosition {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub mint_address: String,
    pub cost_basis_usd: f64,
    pub num_tokens: f64,
}
