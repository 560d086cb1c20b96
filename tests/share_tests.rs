mod common;

use std::sync::Arc;

use snipebot::errors::EngineError;

use common::{test_engine, test_mint, StaticMarket};

#[tokio::test]
async fn share_text_lists_picks_and_total_with_signs() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let winner = test_mint('a');
    let loser = test_mint('b');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&winner, 0.0001).await;
    market.set_trade_price(&loser, 0.0001).await;

    engine
        .record_token_position(1, 10, "alice", &winner)
        .await
        .expect("record should succeed");
    engine
        .record_token_position(1, 10, "alice", &loser)
        .await
        .expect("record should succeed");

    // Winner is up 28%, loser is down 80%.
    market.set_trade_price(&winner, 0.000128).await;
    market.set_trade_price(&loser, 0.00002).await;

    let share = engine
        .build_share_text(1, 10, "alice")
        .await
        .expect("share should succeed");

    assert!(share.plain.starts_with("alice's Picks (Chat 1):\n\n"));
    assert!(share.plain.contains(&format!("{winner} => +$21.00")));
    assert!(share.plain.contains(&format!("{loser} => -$60.00")));
    assert!(share.plain.contains("Total PnL: -$39.00"));
    assert!(share.plain.ends_with("Shared via #SnipeChecksBot"));
}

#[tokio::test]
async fn share_text_is_fully_percent_encoded() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let mint = test_mint('a');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&mint, 0.0001).await;
    engine
        .record_token_position(1, 10, "alice", &mint)
        .await
        .expect("record should succeed");

    let share = engine
        .build_share_text(1, 10, "alice")
        .await
        .expect("share should succeed");

    // Every URL-reserved byte of the plain text must be escaped.
    for reserved in ['\n', ' ', '#', '$', '+', '\'', '(', ')', ':', '=', '>'] {
        assert!(
            !share.encoded.contains(reserved),
            "encoded text still contains {:?}",
            reserved
        );
    }
    assert!(share.encoded.contains("%23SnipeChecksBot"));
    assert!(share
        .tweet_url
        .starts_with("https://twitter.com/intent/tweet?text="));
    assert!(share.tweet_url.ends_with(&share.encoded));
}

#[tokio::test]
async fn share_only_covers_the_requesting_user() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let alices = test_mint('a');
    let bobs = test_mint('b');

    market.set_sol_price(150.0).await;
    market.set_trade_price(&alices, 0.0001).await;
    market.set_trade_price(&bobs, 0.0001).await;

    engine
        .record_token_position(1, 10, "alice", &alices)
        .await
        .expect("record should succeed");
    engine
        .record_token_position(1, 20, "bob", &bobs)
        .await
        .expect("record should succeed");

    let share = engine
        .build_share_text(1, 10, "alice")
        .await
        .expect("share should succeed");

    assert!(share.plain.contains(&alices));
    assert!(!share.plain.contains(&bobs));
}

#[tokio::test]
async fn share_with_no_picks_or_no_market_fails_typed() {
    let market = Arc::new(StaticMarket::new());
    let (engine, _ledger) = test_engine(market.clone());
    let mint = test_mint('a');

    let err = engine
        .build_share_text(1, 10, "alice")
        .await
        .expect_err("share should fail without picks");
    assert!(matches!(err, EngineError::NoPositions));

    market.set_sol_price(150.0).await;
    market.set_trade_price(&mint, 0.0001).await;
    engine
        .record_token_position(1, 10, "alice", &mint)
        .await
        .expect("record should succeed");

    market.fail_sol_price().await;
    let err = engine
        .build_share_text(1, 10, "alice")
        .await
        .expect_err("share should fail without SOL price");
    assert!(matches!(err, EngineError::MarketUnavailable));
}
