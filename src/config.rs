use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub console: ConsoleConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub url: String,
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub refresh_secs: u64,    // background refetch period for stale views
    pub history_limit: usize, // rows requested per history fetch
    pub table_digits: usize,  // significant digits for credits in tables
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub notify_on_error: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            refresh_secs: 10,
            history_limit: 100,
            table_digits: 9,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                url: "http://127.0.0.1:8080".into(),
                auth_token: None,
            },
            console: ConsoleConfig::default(),
            telemetry: TelemetryConfig {
                log_level: "info".into(),
                telegram_bot_token: None,
                telegram_chat_id: None,
                discord_webhook_url: None,
                notify_on_error: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables (.env file) with defaults.
    ///
    /// Env vars:
    ///   BOT_URL — base URL of the bot gateway (default: http://127.0.0.1:8080)
    ///   BOT_AUTH_TOKEN — bearer token for admin calls (optional)
    ///   REFRESH_SECS — background refresh period (default: 10)
    ///   HISTORY_LIMIT — rows per history fetch (default: 100)
    ///   TABLE_DIGITS — significant digits for credits columns (default: 9)
    ///   TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID — error notifications
    ///   DISCORD_WEBHOOK_URL — error notifications
    ///   NOTIFY_ON_ERROR — set to "false" to keep failures log-only
    ///   RUST_LOG — log level (default: info)
    pub fn load_or_default() -> Self {
        let _ = dotenv::dotenv();

        let mut config = Self::default();

        if let Ok(url) = std::env::var("BOT_URL") {
            if !url.is_empty() {
                config.bot.url = url;
            }
        }
        if let Ok(token) = std::env::var("BOT_AUTH_TOKEN") {
            if !token.is_empty() && token != "your_token_here" {
                config.bot.auth_token = Some(token);
            }
        }

        if let Ok(secs) = std::env::var("REFRESH_SECS") {
            if let Ok(val) = secs.parse() {
                config.console.refresh_secs = val;
            }
        }
        if let Ok(limit) = std::env::var("HISTORY_LIMIT") {
            if let Ok(val) = limit.parse() {
                config.console.history_limit = val;
            }
        }
        if let Ok(digits) = std::env::var("TABLE_DIGITS") {
            if let Ok(val) = digits.parse() {
                config.console.table_digits = val;
            }
        }

        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !token.is_empty() && token != "your_bot_token" {
                config.telemetry.telegram_bot_token = Some(token);
            }
        }
        if let Ok(chat) = std::env::var("TELEGRAM_CHAT_ID") {
            if !chat.is_empty() && chat != "your_chat_id" {
                config.telemetry.telegram_chat_id = Some(chat);
            }
        }
        if let Ok(url) = std::env::var("DISCORD_WEBHOOK_URL") {
            if !url.is_empty() && url != "your_webhook_url" {
                config.telemetry.discord_webhook_url = Some(url);
            }
        }
        if let Ok(flag) = std::env::var("NOTIFY_ON_ERROR") {
            config.telemetry.notify_on_error = flag != "false" && flag != "0";
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.telemetry.log_level = level;
        }

        config
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.bot.url)
            .map_err(|e| anyhow::anyhow!("BOT_URL is not a valid URL: {e}"))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "BOT_URL must be http or https, got {}",
            url.scheme()
        );
        anyhow::ensure!(self.console.refresh_secs >= 1, "REFRESH_SECS must be >= 1");
        anyhow::ensure!(
            self.console.history_limit >= 1 && self.console.history_limit <= 10_000,
            "HISTORY_LIMIT must be in 1..=10000"
        );
        Ok(())
    }
}
