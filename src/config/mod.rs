use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:snipebot.db?mode=rwc";
const DEFAULT_STAKE_SOL: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub database_url: String,
    /// Size of the simulated buy applied to every pick and wallet stake.
    pub stake_sol: f64,
    /// Override for the pump.fun API base URL (tests, mirrors).
    pub pumpfun_api_base: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN must be set"))?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            stake_sol: env::var("STAKE_SOL")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(DEFAULT_STAKE_SOL),
            pumpfun_api_base: env::var("PUMPFUN_API_BASE").ok(),
        })
    }
}
