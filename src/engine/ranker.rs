use std::cmp::Ordering;

/// Leaderboards show the top 10 entries only.
pub const LEADERBOARD_SIZE: usize = 10;

/// Rank rows by descending PnL, truncated to the top 10, ranks starting
/// at 1. The sort is stable, so equal PnL values keep the input order,
/// which is insertion order, since the ledger lists in insertion order.
pub fn rank_by_pnl<T, F>(mut rows: Vec<T>, pnl: F) -> Vec<(usize, T)>
where
    F: Fn(&T) -> f64,
{
    rows.sort_by(|a, b| pnl(b).partial_cmp(&pnl(a)).unwrap_or(Ordering::Equal));
    rows.truncate(LEADERBOARD_SIZE);

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| (i + 1, row))
        .collect()
}
