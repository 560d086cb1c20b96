use std::sync::Arc;

use snipebot::config::AppConfig;
use snipebot::engine::Engine;
use snipebot::ledger::SqliteLedger;
use snipebot::market::PumpFunClient;
use snipebot::telegram::{Dispatcher, TelegramClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let ledger = SqliteLedger::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    let http = reqwest::Client::new();
    let market = match &config.pumpfun_api_base {
        Some(base) => PumpFunClient::with_base_url(http.clone(), base.clone()),
        None => PumpFunClient::new(http.clone()),
    };

    let engine = Arc::new(Engine::new(
        Arc::new(ledger),
        Arc::new(market),
        config.stake_sol,
    ));

    let client = TelegramClient::new(http, config.telegram_bot_token.clone());
    let dispatcher = Dispatcher::new(client, engine, config.stake_sol);

    tracing::info!(stake_sol = config.stake_sol, "Starting Snipe Checks Bot");
    dispatcher.run().await;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
