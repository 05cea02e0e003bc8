use anyhow::Result;
use tracing::{error, info};

use crate::config::TelemetryConfig;
use crate::error::ConsoleError;

/// Surfaces the outcome of remote calls to the operator.
///
/// Every outcome is logged; failures are additionally pushed to Telegram or
/// Discord when configured, so a command rejected while the operator is away
/// from the terminal still gets seen. Failed webhook delivery is itself only
/// logged — notifications never take the console down.
pub struct Notifier {
    config: TelemetryConfig,
    http: reqwest::Client,
}

impl Notifier {
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Report a completed command ("Pair added", "Bot stopped").
    pub fn success(&self, message: &str) {
        info!("{message}");
    }

    /// Report a failed remote call with its context ("add pair", "fetch history").
    pub async fn failure(&self, context: &str, err: &ConsoleError) {
        error!("Failed to {context}: {err}");

        if !self.config.notify_on_error {
            return;
        }
        let message = format!("Failed to {context}: {err}");
        if let Err(e) = self.send_telegram(&message).await {
            error!("Telegram notification failed: {e}");
        }
        if let Err(e) = self.send_discord(&message).await {
            error!("Discord notification failed: {e}");
        }
    }

    async fn send_telegram(&self, message: &str) -> Result<()> {
        let (Some(token), Some(chat_id)) = (
            &self.config.telegram_bot_token,
            &self.config.telegram_chat_id,
        ) else {
            return Ok(()); // Not configured
        };

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": format!("marketdesk: {message}"),
        });

        self.http.post(&url).json(&body).send().await?;
        Ok(())
    }

    async fn send_discord(&self, message: &str) -> Result<()> {
        let Some(webhook_url) = &self.config.discord_webhook_url else {
            return Ok(());
        };

        let body = serde_json::json!({
            "content": format!("**marketdesk**: {message}")
        });

        self.http.post(webhook_url).json(&body).send().await?;
        Ok(())
    }
}
