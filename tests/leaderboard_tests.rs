mod common;

use std::sync::Arc;

use snipebot::errors::EngineError;

use common::{test_engine, test_mint, test_wallet, StaticMarket};

const EPS: f64 = 1e-9;

#[tokio::test]
async fn zero_drift_when_prices_have_not_moved() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let mint = test_mint('a');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&mint, 0.0001).await;
    engine
        .record_token_position(1, 10, "alice", &mint)
        .await
        .expect("record should succeed");

    let rows = engine
        .compute_token_leaderboard(1)
        .await
        .expect("leaderboard should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rank, 1);
    assert!(rows[0].pnl.abs() < EPS);
    assert!(!rows[0].price_unavailable);
}

#[tokio::test]
async fn pnl_reflects_later_price_moves() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let mint = test_mint('a');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&mint, 0.0001).await;
    engine
        .record_token_position(1, 10, "alice", &mint)
        .await
        .expect("record should succeed");

    market.set_sol_price(160.0).await;
    market.set_trade_price(&mint, 0.00012).await;

    let rows = engine
        .compute_token_leaderboard(1)
        .await
        .expect("leaderboard should succeed");

    // 5000 tokens at 0.00012 * 160 = $0.0192 each => $96, entry was $75.
    assert!((rows[0].current_price_usd - 0.0192).abs() < EPS);
    assert!((rows[0].pnl - 21.0).abs() < EPS);
    assert_eq!(rows[0].cost_basis_usd, 75.0);
}

#[tokio::test]
async fn ranking_is_descending_truncated_and_stable() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());

    market.set_sol_price(100.0).await;

    // Twelve picks, all entered at 0.001 SOL.
    let tags = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'm'];
    for (i, tag) in tags.iter().enumerate() {
        let mint = test_mint(*tag);
        market.set_trade_price(&mint, 0.001).await;
        engine
            .record_token_position(1, i as i64, &format!("user_{tag}"), &mint)
            .await
            .expect("record should succeed");
    }

    // Two movers; everything else stays at entry price (tied pnl ~ 0).
    market.set_trade_price(&test_mint('e'), 0.002).await;
    market.set_trade_price(&test_mint('j'), 0.0015).await;

    let rows = engine
        .compute_token_leaderboard(1)
        .await
        .expect("leaderboard should succeed");

    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].username, "user_e");
    assert_eq!(rows[1].username, "user_j");

    for pair in rows.windows(2) {
        assert!(pair[0].pnl >= pair[1].pnl);
    }
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.rank, i + 1);
    }

    // The tied remainder keeps insertion order.
    let tied: Vec<&str> = rows[2..].iter().map(|r| r.username.as_str()).collect();
    assert_eq!(
        tied,
        vec!["user_a", "user_b", "user_c", "user_d", "user_f", "user_g", "user_h", "user_i"]
    );
}

#[tokio::test]
async fn missing_trade_price_degrades_one_row_not_the_pass() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let healthy = test_mint('a');
    let broken = test_mint('b');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&healthy, 0.0001).await;
    market.set_trade_price(&broken, 0.0001).await;

    engine
        .record_token_position(1, 10, "alice", &healthy)
        .await
        .expect("record should succeed");
    engine
        .record_token_position(1, 11, "bob", &broken)
        .await
        .expect("record should succeed");

    market.fail_trade_price(&broken).await;

    let rows = engine
        .compute_token_leaderboard(1)
        .await
        .expect("leaderboard should still succeed");
    assert_eq!(rows.len(), 2);

    let bob = rows
        .iter()
        .find(|r| r.username == "bob")
        .expect("bob's row present");
    assert!(bob.price_unavailable);
    assert!((bob.pnl - (-75.0)).abs() < EPS);

    let alice = rows
        .iter()
        .find(|r| r.username == "alice")
        .expect("alice's row present");
    assert!(!alice.price_unavailable);
    assert!(alice.pnl.abs() < EPS);
}

#[tokio::test]
async fn leaderboard_aborts_when_sol_price_is_unavailable() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let mint = test_mint('a');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&mint, 0.0001).await;
    engine
        .record_token_position(1, 10, "alice", &mint)
        .await
        .expect("record should succeed");

    market.fail_sol_price().await;

    let err = engine
        .compute_token_leaderboard(1)
        .await
        .expect_err("leaderboard should fail");
    assert!(matches!(err, EngineError::MarketUnavailable));

    let err = engine
        .compute_wallet_leaderboard(1)
        .await
        .expect_err("wallet leaderboard should fail");
    assert!(matches!(err, EngineError::MarketUnavailable));
}

#[tokio::test]
async fn wallet_leaderboard_values_holdings_against_frozen_stake() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let winner = test_wallet('a');
    let loser = test_wallet('b');

    market.set_sol_price(150.0).await;
    engine
        .register_wallet(1, 10, "alice", &winner)
        .await
        .expect("registration should succeed");
    engine
        .register_wallet(1, 11, "bob", &loser)
        .await
        .expect("registration should succeed");

    market.set_holdings(&winner, vec![(2000.0, 0.05), (1.0, 10.0)]).await;
    // 1000 * 0.05 + 2 * 10 = $70 against a $75 stake.
    market.set_holdings(&loser, vec![(1000.0, 0.05), (2.0, 10.0)]).await;

    let rows = engine
        .compute_wallet_leaderboard(1)
        .await
        .expect("leaderboard should succeed");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].username, "alice");
    assert!((rows[0].net_worth_usd - 110.0).abs() < EPS);
    assert!((rows[0].pnl - 35.0).abs() < EPS);

    assert_eq!(rows[1].username, "bob");
    assert!((rows[1].net_worth_usd - 70.0).abs() < EPS);
    assert!((rows[1].pnl - (-5.0)).abs() < EPS);
}

#[tokio::test]
async fn unreadable_wallet_degrades_to_zero_net_worth() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let wallet = test_wallet('a');

    market.set_sol_price(150.0).await;
    engine
        .register_wallet(1, 10, "alice", &wallet)
        .await
        .expect("registration should succeed");

    // No holdings scripted: the balances read fails.
    let rows = engine
        .compute_wallet_leaderboard(1)
        .await
        .expect("leaderboard should still succeed");

    assert_eq!(rows.len(), 1);
    assert!(rows[0].holdings_unavailable);
    assert_eq!(rows[0].net_worth_usd, 0.0);
    assert!((rows[0].pnl - (-75.0)).abs() < EPS);
}

#[tokio::test]
async fn empty_wallet_is_a_real_zero_not_a_failure() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let wallet = test_wallet('a');

    market.set_sol_price(150.0).await;
    engine
        .register_wallet(1, 10, "alice", &wallet)
        .await
        .expect("registration should succeed");

    market.set_holdings(&wallet, vec![]).await;

    let rows = engine
        .compute_wallet_leaderboard(1)
        .await
        .expect("leaderboard should succeed");

    assert!(!rows[0].holdings_unavailable);
    assert_eq!(rows[0].net_worth_usd, 0.0);
}
