use crate::ledger::LedgerError;

/// Failure taxonomy for the engine operations. Every variant is a value
/// returned to the dispatcher, which owns the user-facing wording; nothing
/// in here panics or depends on being logged.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The submitted string is not a syntactically valid Solana address.
    #[error("invalid Solana address: {0}")]
    InvalidAddress(String),

    /// The (chat, mint) or (chat, wallet) pair already exists.
    #[error("already recorded in this chat: {0}")]
    Duplicate(String),

    /// A required live market read failed; the caller may retry later.
    #[error("market data unavailable")]
    MarketUnavailable,

    /// Share text was requested but the user has no picks in this chat.
    #[error("no picks recorded for this user in this chat")]
    NoPositions,

    /// Any ledger failure other than a duplicate key.
    #[error("ledger failure: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl EngineError {
    /// Map a ledger failure, attaching the offending key to duplicates.
    pub(crate) fn from_ledger(err: LedgerError, key: &str) -> Self {
        match err {
            LedgerError::Duplicate => EngineError::Duplicate(key.to_string()),
            LedgerError::Storage(e) => EngineError::Persistence(e),
        }
    }
}
