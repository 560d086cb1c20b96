use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// How long getUpdates keeps the connection open server-side.
const LONG_POLL_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Api(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Minimal Bot API client: long-poll updates in, messages out.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(http: Client, token: String) -> Self {
        Self {
            http,
            base_url: TELEGRAM_API_BASE.into(),
            token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Long-poll for updates after `offset`. Blocks up to 30 seconds
    /// server-side when nothing is pending.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let resp = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", LONG_POLL_SECS.to_string()),
            ])
            // Leave headroom over the server-side long-poll window.
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<Vec<Update>> = resp.json().await?;
        if !body.ok {
            return Err(TelegramError::Api(
                body.description.unwrap_or_else(|| "getUpdates not ok".into()),
            ));
        }

        Ok(body.result.unwrap_or_default())
    }

    /// Send a text message to a chat.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markdown: bool,
        disable_preview: bool,
    ) -> Result<(), TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": disable_preview,
        });
        if markdown {
            body["parse_mode"] = json!("Markdown");
        }

        let resp = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TelegramError::Api(format!(
                "sendMessage returned {}",
                resp.status()
            )));
        }

        Ok(())
    }
}
