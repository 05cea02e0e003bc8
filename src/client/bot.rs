use num_bigint::BigInt;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::client::wire::{
    Ack, AddPairRequest, PrincipalRequest, StartRequest, UpdateBalanceRequest,
    UpdateSettingsRequest,
};
use crate::config::BotConfig;
use crate::error::{ConsoleError, Result};
use crate::models::history::HistoryItem;
use crate::models::pair::{MarketPair, SpreadSettings};
use crate::models::principal::Principal;
use crate::models::state::{BotState, QuoteInfo};

/// Typed client for the remote bot gateway.
///
/// Every call is an independent request/response with no automatic retry;
/// the caller decides what a failure means. Mutations carry an
/// `X-Request-Id` so a rejected command can be found in the bot's logs.
pub struct BotClient {
    base_url: String,
    auth_token: Option<String>,
    http: reqwest::Client,
}

impl BotClient {
    pub fn new(config: &BotConfig) -> Self {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Some(std::time::Duration::from_secs(30)))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            http,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, &url);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn query<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {path}");
        let resp = self.request(Method::GET, path).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ConsoleError::Api(Self::rejection_message(&text, || {
                format!("HTTP {status}")
            })));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn command<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        info!("{method} {path} request_id={request_id}");

        let mut builder = self
            .request(method, path)
            .header("X-Request-Id", request_id.to_string());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let msg = Self::rejection_message(&text, || format!("HTTP {status}"));
            error!("{path} rejected (request_id={request_id}): {msg}");
            return Err(ConsoleError::Api(msg));
        }

        let ack: Ack = serde_json::from_str(&text).unwrap_or_default();
        if let Some(msg) = ack.rejection() {
            error!("{path} rejected (request_id={request_id}): {msg}");
            return Err(ConsoleError::Api(msg));
        }
        Ok(())
    }

    /// Pull a rejection reason out of an error body, falling back when the
    /// body is empty or not the Ack envelope.
    fn rejection_message(text: &str, fallback: impl FnOnce() -> String) -> String {
        serde_json::from_str::<Ack>(text)
            .ok()
            .and_then(|ack| ack.rejection())
            .unwrap_or_else(fallback)
    }

    // --- queries ---------------------------------------------------------

    pub async fn pairs(&self) -> Result<Vec<MarketPair>> {
        self.query("/pairs").await
    }

    pub async fn history(&self, limit: Option<usize>) -> Result<Vec<HistoryItem>> {
        match limit {
            Some(n) => self.query(&format!("/history?limit={n}")).await,
            None => self.query("/history").await,
        }
    }

    pub async fn bot_state(&self) -> Result<BotState> {
        self.query("/state").await
    }

    pub async fn quote_info(&self) -> Result<QuoteInfo> {
        self.query("/quote-info").await
    }

    pub async fn admins(&self) -> Result<Vec<Principal>> {
        self.query("/admins").await
    }

    // --- commands --------------------------------------------------------

    pub async fn start_bot(&self, timer_interval_secs: u64) -> Result<()> {
        let body = StartRequest {
            timer_interval_secs,
        };
        self.command(Method::POST, "/start", Some(&body)).await
    }

    pub async fn stop_bot(&self) -> Result<()> {
        self.command::<()>(Method::POST, "/stop", None).await
    }

    /// Trigger one market-making round outside the timer schedule.
    pub async fn execute_market_making(&self) -> Result<()> {
        self.command::<()>(Method::POST, "/execute", None).await
    }

    pub async fn add_pair(&self, req: &AddPairRequest) -> Result<()> {
        self.command(Method::POST, "/pairs", Some(req)).await
    }

    pub async fn remove_pair(&self, index: usize) -> Result<()> {
        self.command::<()>(Method::DELETE, &format!("/pairs/{index}"), None)
            .await
    }

    pub async fn update_pair_settings(
        &self,
        base_symbol: &str,
        settings: SpreadSettings,
    ) -> Result<()> {
        settings.validate()?;
        let body = UpdateSettingsRequest {
            spread_value: settings.value,
            spread_bias: settings.bias,
        };
        self.command(
            Method::PUT,
            &format!("/pairs/{base_symbol}/settings"),
            Some(&body),
        )
        .await
    }

    /// Set the quote-side credit budget of a pair, in raw quote-token units.
    pub async fn update_quote_balance(&self, base_symbol: &str, balance: &BigInt) -> Result<()> {
        let body = UpdateBalanceRequest {
            balance: balance.clone(),
        };
        self.command(
            Method::PUT,
            &format!("/pairs/{base_symbol}/quote-balance"),
            Some(&body),
        )
        .await
    }

    pub async fn set_quote_asset(&self, principal: &Principal) -> Result<()> {
        let body = PrincipalRequest {
            principal: principal.clone(),
        };
        self.command(Method::PUT, "/quote-asset", Some(&body)).await
    }

    pub async fn add_admin(&self, principal: &Principal) -> Result<()> {
        let body = PrincipalRequest {
            principal: principal.clone(),
        };
        self.command(Method::POST, "/admins", Some(&body)).await
    }

    pub async fn remove_admin(&self, principal: &Principal) -> Result<()> {
        self.command::<()>(Method::DELETE, &format!("/admins/{principal}"), None)
            .await
    }
}
