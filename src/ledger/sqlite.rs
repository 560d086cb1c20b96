use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use super::{Ledger, LedgerError};
use crate::models::{NewTokenPosition, NewWalletEntry, TokenPosition, WalletEntry};

/// Production ledger backed by sqlite. Uniqueness of the two composite keys
/// is enforced by the database, so a racing duplicate insert loses with
/// `LedgerError::Duplicate` instead of overwriting.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: Pool<Sqlite>,
}

impl SqliteLedger {
    /// Connect and create the schema if it does not exist yet.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS token_positions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                mint_address TEXT NOT NULL,
                cost_basis_usd REAL NOT NULL,
                num_tokens REAL NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (chat_id, mint_address)
            );
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wallet_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                wallet_address TEXT NOT NULL,
                start_usd_value REAL NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (chat_id, wallet_address)
            );
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::info!(url = %database_url, "SqliteLedger connected");

        Ok(Self { pool })
    }
}

fn map_sqlx(err: sqlx::Error) -> LedgerError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => LedgerError::Duplicate,
        other => LedgerError::Storage(other.into()),
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn insert_position(&self, new: NewTokenPosition) -> Result<TokenPosition, LedgerError> {
        let position = sqlx::query_as::<_, TokenPosition>(
            r#"
            INSERT INTO token_positions
                (chat_id, user_id, username, mint_address, cost_basis_usd, num_tokens, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(new.chat_id)
        .bind(new.user_id)
        .bind(&new.username)
        .bind(&new.mint_address)
        .bind(new.cost_basis_usd)
        .bind(new.num_tokens)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(position)
    }

    async fn positions_for_chat(&self, chat_id: i64) -> Result<Vec<TokenPosition>, LedgerError> {
        let positions = sqlx::query_as::<_, TokenPosition>(
            "SELECT * FROM token_positions WHERE chat_id = ? ORDER BY id ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(positions)
    }

    async fn position_by_mint(
        &self,
        chat_id: i64,
        mint_address: &str,
    ) -> Result<Option<TokenPosition>, LedgerError> {
        let position = sqlx::query_as::<_, TokenPosition>(
            "SELECT * FROM token_positions WHERE chat_id = ? AND mint_address = ?",
        )
        .bind(chat_id)
        .bind(mint_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(position)
    }

    async fn positions_for_user(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Vec<TokenPosition>, LedgerError> {
        let positions = sqlx::query_as::<_, TokenPosition>(
            "SELECT * FROM token_positions WHERE chat_id = ? AND user_id = ? ORDER BY id ASC",
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(positions)
    }

    async fn insert_wallet(&self, new: NewWalletEntry) -> Result<WalletEntry, LedgerError> {
        let entry = sqlx::query_as::<_, WalletEntry>(
            r#"
            INSERT INTO wallet_entries
                (chat_id, user_id, username, wallet_address, start_usd_value, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(new.chat_id)
        .bind(new.user_id)
        .bind(&new.username)
        .bind(&new.wallet_address)
        .bind(new.start_usd_value)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(entry)
    }

    async fn wallets_for_chat(&self, chat_id: i64) -> Result<Vec<WalletEntry>, LedgerError> {
        let entries = sqlx::query_as::<_, WalletEntry>(
            "SELECT * FROM wallet_entries WHERE chat_id = ? ORDER BY id ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(entries)
    }

    async fn wallet_by_address(
        &self,
        chat_id: i64,
        wallet_address: &str,
    ) -> Result<Option<WalletEntry>, LedgerError> {
        let entry = sqlx::query_as::<_, WalletEntry>(
            "SELECT * FROM wallet_entries WHERE chat_id = ? AND wallet_address = ?",
        )
        .bind(chat_id)
        .bind(wallet_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(entry)
    }
}
