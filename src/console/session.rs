//! Wires the cache, client, telemetry and renderer into one operator session.

use std::sync::Arc;
use std::time::Instant;

use crate::client::wire::AddPairRequest;
use crate::client::BotClient;
use crate::config::Config;
use crate::console::cache::{QueryCache, QueryKey};
use crate::console::commands::{Command, HELP};
use crate::console::render;
use crate::display::scale_to_units;
use crate::error::Result;
use crate::telemetry::latency::CallLatency;
use crate::telemetry::notify::Notifier;

/// Fallback timer interval when starting a bot that has never had one.
const DEFAULT_TIMER_SECS: u64 = 60;

pub struct Session {
    config: Config,
    client: Arc<BotClient>,
    cache: Arc<QueryCache>,
    latency: Arc<CallLatency>,
    notifier: Arc<Notifier>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let client = Arc::new(BotClient::new(&config.bot));
        let notifier = Arc::new(Notifier::new(config.telemetry.clone()));
        Self {
            client,
            cache: Arc::new(QueryCache::new()),
            latency: Arc::new(CallLatency::new(256)),
            notifier,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Refetch every invalidated view. The five fetches run concurrently
    /// and settle in any order; a failure notifies and leaves the slot's
    /// old data in place without retrying.
    pub async fn refresh_stale(&self) {
        tokio::join!(
            self.refresh_pairs(),
            self.refresh_history(),
            self.refresh_bot_state(),
            self.refresh_quote_info(),
            self.refresh_admins(),
        );
    }

    async fn refresh_pairs(&self) {
        if !self.cache.pairs.read().await.needs_fetch() {
            return;
        }
        match self.latency.measure("pairs", self.client.pairs()).await {
            Ok(pairs) => self.cache.pairs.write().await.set(pairs),
            Err(err) => {
                self.cache.pairs.write().await.mark_failed();
                self.notifier.failure("fetch pairs", &err).await;
            }
        }
    }

    async fn refresh_history(&self) {
        if !self.cache.history.read().await.needs_fetch() {
            return;
        }
        let limit = Some(self.config.console.history_limit);
        match self
            .latency
            .measure("history", self.client.history(limit))
            .await
        {
            Ok(items) => self.cache.history.write().await.set(items),
            Err(err) => {
                self.cache.history.write().await.mark_failed();
                self.notifier.failure("fetch history", &err).await;
            }
        }
    }

    async fn refresh_bot_state(&self) {
        if !self.cache.bot_state.read().await.needs_fetch() {
            return;
        }
        match self.latency.measure("state", self.client.bot_state()).await {
            Ok(state) => self.cache.bot_state.write().await.set(state),
            Err(err) => {
                self.cache.bot_state.write().await.mark_failed();
                self.notifier.failure("fetch bot state", &err).await;
            }
        }
    }

    async fn refresh_quote_info(&self) {
        if !self.cache.quote_info.read().await.needs_fetch() {
            return;
        }
        match self
            .latency
            .measure("quote-info", self.client.quote_info())
            .await
        {
            Ok(info) => self.cache.quote_info.write().await.set(info),
            Err(err) => {
                self.cache.quote_info.write().await.mark_failed();
                self.notifier.failure("fetch quote info", &err).await;
            }
        }
    }

    async fn refresh_admins(&self) {
        if !self.cache.admins.read().await.needs_fetch() {
            return;
        }
        match self.latency.measure("admins", self.client.admins()).await {
            Ok(admins) => self.cache.admins.write().await.set(admins),
            Err(err) => {
                self.cache.admins.write().await.mark_failed();
                self.notifier.failure("fetch admins", &err).await;
            }
        }
    }

    /// Run one operator command and return the text to print. `Quit` is the
    /// caller's business and returns nothing here.
    pub async fn dispatch(&self, cmd: Command) -> String {
        let invalidates = cmd.invalidates();
        match cmd {
            Command::ShowPairs => {
                self.refresh_pairs().await;
                render::pairs_table(
                    &*self.cache.pairs.read().await,
                    self.config.console.table_digits,
                )
            }
            Command::ShowHistory { limit } => {
                if let Some(n) = limit {
                    // Explicit row count bypasses the configured default.
                    match self
                        .latency
                        .measure("history", self.client.history(Some(n)))
                        .await
                    {
                        Ok(items) => self.cache.history.write().await.set(items),
                        Err(err) => {
                            self.cache.history.write().await.mark_failed();
                            self.notifier.failure("fetch history", &err).await;
                        }
                    }
                } else {
                    self.refresh_history().await;
                }
                render::history_table(&*self.cache.history.read().await)
            }
            Command::ShowState => {
                tokio::join!(self.refresh_bot_state(), self.refresh_quote_info());
                render::state_panel(
                    &*self.cache.bot_state.read().await,
                    &*self.cache.quote_info.read().await,
                    &self.config.bot.url,
                )
            }
            Command::ShowQuote => {
                self.refresh_quote_info().await;
                render::quote_panel(&*self.cache.quote_info.read().await)
            }
            Command::ShowAdmins => {
                self.refresh_admins().await;
                render::admins_list(&*self.cache.admins.read().await)
            }
            Command::Start { interval_secs } => {
                let interval = match interval_secs {
                    Some(secs) => secs,
                    None => self
                        .cache
                        .bot_state
                        .read()
                        .await
                        .data()
                        .map(|s| s.timer_interval_secs)
                        .filter(|secs| *secs > 0)
                        .unwrap_or(DEFAULT_TIMER_SECS),
                };
                let result = self
                    .latency
                    .measure("start", self.client.start_bot(interval))
                    .await;
                self.finish_mutation(
                    "start bot",
                    result,
                    &format!("Bot started (timer {interval}s)"),
                    invalidates,
                )
                .await
            }
            Command::Stop => {
                let result = self.latency.measure("stop", self.client.stop_bot()).await;
                self.finish_mutation("stop bot", result, "Bot stopped", invalidates)
                    .await
            }
            Command::RunOnce => {
                let result = self
                    .latency
                    .measure("execute", self.client.execute_market_making())
                    .await;
                self.finish_mutation(
                    "execute market making",
                    result,
                    "Market-making round triggered",
                    invalidates,
                )
                .await
            }
            Command::AddPair {
                principal,
                symbol,
                decimals,
                spread_value,
            } => {
                let req = AddPairRequest {
                    principal,
                    symbol: symbol.clone(),
                    decimals,
                    spread_value,
                };
                let result = self
                    .latency
                    .measure("add-pair", self.client.add_pair(&req))
                    .await;
                self.finish_mutation(
                    "add pair",
                    result,
                    &format!("Pair {symbol} added"),
                    invalidates,
                )
                .await
            }
            Command::RemovePair { index } => {
                let result = self
                    .latency
                    .measure("rm-pair", self.client.remove_pair(index))
                    .await;
                self.finish_mutation(
                    "remove pair",
                    result,
                    &format!("Pair {index} removed"),
                    invalidates,
                )
                .await
            }
            Command::SetSpread { symbol, settings } => {
                let (ask, bid) = settings.price_preview();
                let result = self
                    .latency
                    .measure(
                        "set-spread",
                        self.client.update_pair_settings(&symbol, settings),
                    )
                    .await;
                self.finish_mutation(
                    "update pair settings",
                    result,
                    &format!("Spread for {symbol} updated (ask rate x{ask}, bid rate x{bid})"),
                    invalidates,
                )
                .await
            }
            Command::SetBalance { symbol, amount } => {
                // The amount is entered in whole quote tokens; the quote
                // asset's decimals turn it into raw units.
                self.refresh_quote_info().await;
                let decimals = match self.cache.quote_info.read().await.data().map(|q| q.decimals)
                {
                    Some(decimals) => decimals,
                    None => return "Quote asset info unavailable; try 'refresh' first".to_string(),
                };
                let units = match scale_to_units(&amount, decimals as u32) {
                    Ok(units) => units,
                    Err(err) => return err.to_string(),
                };
                let result = self
                    .latency
                    .measure(
                        "quote-balance",
                        self.client.update_quote_balance(&symbol, &units),
                    )
                    .await;
                self.finish_mutation(
                    "update quote balance",
                    result,
                    &format!("Quote balance for {symbol} set to {units} units"),
                    invalidates,
                )
                .await
            }
            Command::SetQuoteAsset { principal } => {
                let result = self
                    .latency
                    .measure("set-quote", self.client.set_quote_asset(&principal))
                    .await;
                self.finish_mutation(
                    "set quote asset",
                    result,
                    &format!("Quote asset set to {principal}"),
                    invalidates,
                )
                .await
            }
            Command::AddAdmin { principal } => {
                let result = self
                    .latency
                    .measure("add-admin", self.client.add_admin(&principal))
                    .await;
                self.finish_mutation(
                    "add admin",
                    result,
                    &format!("Admin {principal} added"),
                    invalidates,
                )
                .await
            }
            Command::RemoveAdmin { principal } => {
                let result = self
                    .latency
                    .measure("rm-admin", self.client.remove_admin(&principal))
                    .await;
                self.finish_mutation(
                    "remove admin",
                    result,
                    &format!("Admin {principal} removed"),
                    invalidates,
                )
                .await
            }
            Command::Refresh => {
                self.cache.invalidate_all().await;
                self.refresh_stale().await;
                "All views refreshed".to_string()
            }
            Command::Stats => self.stats().await,
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        }
    }

    async fn finish_mutation(
        &self,
        context: &str,
        result: Result<()>,
        success_msg: &str,
        invalidates: &'static [QueryKey],
    ) -> String {
        match result {
            Ok(()) => {
                self.notifier.success(success_msg);
                self.cache.invalidate_many(invalidates).await;
                self.refresh_stale().await;
                success_msg.to_string()
            }
            Err(err) => {
                self.notifier.failure(context, &err).await;
                format!("Failed to {context}: {err}")
            }
        }
    }

    async fn stats(&self) -> String {
        let mut out = String::from("  CALL LATENCY\n");
        let lines = self.latency.summary_lines();
        if lines.is_empty() {
            out.push_str("  (no calls yet)\n");
        } else {
            for line in lines {
                out.push_str("  ");
                out.push_str(&line);
                out.push('\n');
            }
        }

        out.push_str("\n  VIEW FRESHNESS\n");
        let rows = [
            ("pairs", self.cache.pairs.read().await.fetched_at()),
            ("history", self.cache.history.read().await.fetched_at()),
            ("state", self.cache.bot_state.read().await.fetched_at()),
            ("quote-info", self.cache.quote_info.read().await.fetched_at()),
            ("admins", self.cache.admins.read().await.fetched_at()),
        ];
        for (name, fetched_at) in rows {
            out.push_str(&format!("  {name:<12} {}\n", freshness(fetched_at)));
        }
        out
    }
}

fn freshness(fetched_at: Option<Instant>) -> String {
    match fetched_at {
        Some(at) => format!("{}s ago", at.elapsed().as_secs()),
        None => "never fetched".to_string(),
    }
}
