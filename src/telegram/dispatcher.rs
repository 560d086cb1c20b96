//! Command routing and reply rendering. Maps chat traffic onto engine
//! operations and engine results onto user-facing text; every failure is
//! rendered as a reply, never allowed to kill the poll loop.

use std::sync::Arc;
use std::time::Duration;

use crate::engine::share::{format_grouped, format_signed_usd};
use crate::engine::{Engine, TokenLeaderboardRow, WalletLeaderboardRow};
use crate::errors::EngineError;

use super::client::{Message, TelegramClient};

const WELCOME_TEXT: &str = "👋 *Welcome to Snipe Checks Bot!*\n\n\
With our bot you can do 2 very cool things:\n\
1️⃣ *Shill a CA:* Paste any Solana *Mint Address (CA)*, and we'll track your PnL on 0.5 SOL.\n\
2️⃣ *Sniper Bowl:* Register a wallet used to buy 0.5 SOL and trade. We'll track your real PnL.\n\n\
Type /help for commands.\n\
Enjoy! 🚀";

const HELP_TEXT: &str = "🆘 *Snipe Checks Bot Help*\n\n\
• `/leaderboard` – Shows the *shilled CA leaderboard* (Function 1)\n\
• `/register_wallet <address>` – Register your wallet for the *Sniper Bowl* (Function 2)\n\
• `/sniper_leaderboard` – Shows the *Sniper Bowl leaderboard* (wallet-based)\n\
• `/share` – Share your *CA picks* on Twitter\n\n\
Just paste a *mint address* in chat to add a shilled CA. 🏹\n\
Or `/register_wallet` to track your *wallet* for the Sniper Bowl.";

pub struct Dispatcher {
    client: TelegramClient,
    engine: Arc<Engine>,
    stake_sol: f64,
}

impl Dispatcher {
    pub fn new(client: TelegramClient, engine: Arc<Engine>, stake_sol: f64) -> Self {
        Self {
            client,
            engine,
            stake_sol,
        }
    }

    /// Long-poll loop. Runs until the process is killed.
    pub async fn run(&self) {
        let mut offset = 0i64;

        loop {
            let updates = match self.client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed, backing off");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Some(message) = update.message {
                    self.handle_message(message).await;
                }
            }
        }
    }

    async fn handle_message(&self, message: Message) {
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let chat_id = message.chat.id;
        let (user_id, username) = match &message.from {
            Some(user) => (
                user.id,
                user.username.clone().unwrap_or_else(|| "Anonymous".into()),
            ),
            None => (0, "Anonymous".into()),
        };

        let mut markdown = true;
        let mut disable_preview = false;

        let reply = if strip_command(text, "start").is_some() {
            WELCOME_TEXT.to_string()
        } else if strip_command(text, "help").is_some() {
            HELP_TEXT.to_string()
        } else if strip_command(text, "leaderboard").is_some() {
            self.token_leaderboard_reply(chat_id).await
        } else if let Some(args) = strip_command(text, "register_wallet") {
            self.register_wallet_reply(chat_id, user_id, &username, args)
                .await
        } else if strip_command(text, "sniper_leaderboard").is_some() {
            self.wallet_leaderboard_reply(chat_id).await
        } else if strip_command(text, "share").is_some() {
            disable_preview = true;
            self.share_reply(chat_id, user_id, &username).await
        } else if text.starts_with('/') {
            // Unknown command; stay quiet like the original bot.
            return;
        } else {
            markdown = false;
            self.plain_text_reply(chat_id, user_id, &username, text)
                .await
        };

        if let Err(e) = self
            .client
            .send_message(chat_id, &reply, markdown, disable_preview)
            .await
        {
            tracing::warn!(chat_id, error = %e, "Failed to send reply");
        }
    }

    /// Non-command text: a valid mint address becomes a pick, anything
    /// else is echoed back.
    async fn plain_text_reply(
        &self,
        chat_id: i64,
        user_id: i64,
        username: &str,
        text: &str,
    ) -> String {
        if !crate::address::is_valid_solana_address(text) {
            return format!("You said: {text}");
        }

        match self
            .engine
            .record_token_position(chat_id, user_id, username, text)
            .await
        {
            Ok(position) => format!(
                "✅ Added your pick for CA: {}\n\
                 Invested: {} SOL (~${:.2})\n\
                 Received ~{:.4} tokens.\n\
                 Use /leaderboard to see rankings!\n\
                 Use /share to post on Twitter.",
                position.mint_address, self.stake_sol, position.cost_basis_usd, position.num_tokens
            ),
            Err(EngineError::Duplicate(mint)) => {
                format!("⚠️ This CA was already shilled here: {mint}")
            }
            Err(EngineError::InvalidAddress(_)) => {
                "❌ Invalid Solana address. Please try again.".into()
            }
            Err(EngineError::MarketUnavailable) => {
                "Error: Could not fetch a price for this CA. Try again later.".into()
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Failed to record pick");
                "❌ Could not add your pick. Possibly a duplicate or DB error.".into()
            }
        }
    }

    async fn token_leaderboard_reply(&self, chat_id: i64) -> String {
        match self.engine.compute_token_leaderboard(chat_id).await {
            Ok(rows) if rows.is_empty() => {
                "No CA picks found. Paste a CA to add your first pick!".into()
            }
            Ok(rows) => render_token_leaderboard(&rows, self.stake_sol),
            Err(EngineError::MarketUnavailable) => {
                "❌ Could not fetch SOL price. Leaderboard unavailable.".into()
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Token leaderboard failed");
                "❌ Leaderboard unavailable. Try again later.".into()
            }
        }
    }

    async fn register_wallet_reply(
        &self,
        chat_id: i64,
        user_id: i64,
        username: &str,
        args: &str,
    ) -> String {
        let wallet = args.split_whitespace().next().unwrap_or("");
        if wallet.is_empty() {
            return "Usage: /register_wallet <solana_wallet_address>".into();
        }

        match self
            .engine
            .register_wallet(chat_id, user_id, username, wallet)
            .await
        {
            Ok(entry) => format!(
                "✅ Registered your wallet for the Sniper Bowl:\n\
                 📍 *{}*\n\
                 Starting assumption: {} SOL (~${:.2}).\n\
                 Use /sniper_leaderboard to see who's winning!",
                entry.wallet_address, self.stake_sol, entry.start_usd_value
            ),
            Err(EngineError::InvalidAddress(_)) => {
                "❌ Invalid Solana address. Please try again.".into()
            }
            Err(EngineError::Duplicate(_)) => {
                "⚠️ This wallet is already registered in this chat.".into()
            }
            Err(EngineError::MarketUnavailable) => {
                "❌ Could not fetch SOL price. Try again later.".into()
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Failed to register wallet");
                "❌ Could not register wallet. Possibly a duplicate or DB error.".into()
            }
        }
    }

    async fn wallet_leaderboard_reply(&self, chat_id: i64) -> String {
        match self.engine.compute_wallet_leaderboard(chat_id).await {
            Ok(rows) if rows.is_empty() => {
                "No wallets here. Use /register_wallet <address> to join!".into()
            }
            Ok(rows) => render_wallet_leaderboard(&rows),
            Err(EngineError::MarketUnavailable) => {
                "❌ Could not fetch SOL price. Leaderboard unavailable.".into()
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Wallet leaderboard failed");
                "❌ Leaderboard unavailable. Try again later.".into()
            }
        }
    }

    async fn share_reply(&self, chat_id: i64, user_id: i64, username: &str) -> String {
        match self.engine.build_share_text(chat_id, user_id, username).await {
            Ok(share) => format!(
                "🔗 Share your picks on Twitter:\n\n[Click Here to Tweet]({})",
                share.tweet_url
            ),
            Err(EngineError::NoPositions) => {
                "No CA picks found for you here. Paste a CA first!".into()
            }
            Err(EngineError::MarketUnavailable) => {
                "Error fetching SOL price. Try again later.".into()
            }
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Share text failed");
                "❌ Could not build your share link. Try again later.".into()
            }
        }
    }
}

/// Match `/name`, `/name@BotName`, or `/name args...`; return the argument
/// remainder on a match.
fn strip_command<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim_start()),
        None => (rest, ""),
    };
    let head = head.split('@').next().unwrap_or(head);

    (head == name).then_some(args)
}

fn render_token_leaderboard(rows: &[TokenLeaderboardRow], stake_sol: f64) -> String {
    let mut text = String::from("🏆 *Shilled CA Leaderboard:* 🏆\n\n");

    for row in rows {
        let price_line = if row.price_unavailable {
            "   Current Token Price: unavailable\n\n".to_string()
        } else {
            format!("   Current Token Price: ${:.8}\n\n", row.current_price_usd)
        };
        text.push_str(&format!(
            "{}. {} (Mint: `{}`)\n   PnL: {}\n   Entry({} SOL in USD): ${:.2}\n{}",
            row.rank,
            row.username,
            row.mint_address,
            format_signed_usd(row.pnl),
            stake_sol,
            row.cost_basis_usd,
            price_line,
        ));
    }

    text
}

fn render_wallet_leaderboard(rows: &[WalletLeaderboardRow]) -> String {
    let mut text = String::from("🏆 *Sniper Bowl Leaderboard:* 🏆\n\n");

    for row in rows {
        let net_worth = if row.holdings_unavailable {
            "unavailable".to_string()
        } else {
            format!("${}", format_grouped(row.net_worth_usd))
        };
        text.push_str(&format!(
            "{}. {} (Wallet: `{}`)\n   Net Worth: {}\n   PnL: {}\n\n",
            row.rank,
            row.username,
            row.wallet_address,
            net_worth,
            format_signed_usd(row.pnl),
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_commands_with_and_without_args() {
        assert_eq!(strip_command("/start", "start"), Some(""));
        assert_eq!(strip_command("/start@SnipeBot", "start"), Some(""));
        assert_eq!(
            strip_command("/register_wallet abc def", "register_wallet"),
            Some("abc def")
        );
        assert_eq!(strip_command("/share", "leaderboard"), None);
        assert_eq!(strip_command("plain text", "start"), None);
    }

    #[test]
    fn renders_unavailable_price_rows_distinctly() {
        let rows = vec![TokenLeaderboardRow {
            rank: 1,
            username: "alice".into(),
            mint_address: "Mint111".into(),
            pnl: -75.0,
            cost_basis_usd: 75.0,
            current_price_usd: 0.0,
            price_unavailable: true,
        }];

        let text = render_token_leaderboard(&rows, 0.5);
        assert!(text.contains("Current Token Price: unavailable"));
        assert!(text.contains("PnL: -$75.00"));
    }
}
