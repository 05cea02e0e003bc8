//! Plain-text rendering of the cached views.
//!
//! A view that has never held data renders a loading marker; once data has
//! arrived it stays on screen, even while a refetch is pending.

use std::fmt::Write;

use crate::console::cache::Query;
use crate::display::display_with_decimals;
use crate::models::history::HistoryItem;
use crate::models::pair::{MarketPair, TokenInfo};
use crate::models::principal::Principal;
use crate::models::state::{BotState, QuoteInfo};

const LOADING: &str = "  loading...";

/// Raw credits rendered in whole tokens, capped so columns stay readable.
fn credits_cell(token: &TokenInfo, table_digits: usize) -> String {
    display_with_decimals(&token.credits, token.decimals as i32, table_digits)
        .unwrap_or_else(|_| "?".to_string())
}

pub fn pairs_table(query: &Query<Vec<MarketPair>>, table_digits: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  #  PAIR            SPREAD     BIAS        BASE CREDITS       QUOTE CREDITS"
    );

    let Some(pairs) = query.data() else {
        out.push_str(LOADING);
        out.push('\n');
        return out;
    };
    if pairs.is_empty() {
        out.push_str("  (no pairs configured)\n");
        return out;
    }

    for (i, pair) in pairs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{i:>3}  {:<14}  {:>6}  {:>7}  {:>18}  {:>18}",
            format!("{}/{}", pair.base.symbol, pair.quote.symbol),
            pair.spread.value,
            pair.spread.bias,
            credits_cell(&pair.base, table_digits),
            credits_cell(&pair.quote, table_digits),
        );
        let _ = writeln!(
            out,
            "     base  {}  decimals {}",
            pair.base.principal, pair.base.decimals
        );
        let _ = writeln!(
            out,
            "     quote {}  decimals {}",
            pair.quote.principal, pair.quote.decimals
        );
    }
    out
}

pub fn history_table(query: &Query<Vec<HistoryItem>>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  TIME                 PAIR          SPREAD  {:>14}  {:>10}  {:>14}  {:>10}",
        "BID VOLUME", "BID PRICE", "ASK VOLUME", "ASK PRICE"
    );

    let Some(items) = query.data() else {
        out.push_str(LOADING);
        out.push('\n');
        return out;
    };
    if items.is_empty() {
        out.push_str("  (no history yet)\n");
        return out;
    }

    for item in items {
        let time = item.timestamp.format("%Y-%m-%d %H:%M:%S");
        let pair = format!("{}/{}", item.base_symbol, item.quote_symbol);
        if item.is_ok() {
            let cell = |o: &Option<crate::models::history::OrderPlacement>| match o {
                Some(order) => (order.amount.to_string(), order.price.to_string()),
                None => ("-".to_string(), "-".to_string()),
            };
            let (bid_vol, bid_price) = cell(&item.bid);
            let (ask_vol, ask_price) = cell(&item.ask);
            let _ = writeln!(
                out,
                "  {time}  {pair:<12}  {:>6}  {bid_vol:>14}  {bid_price:>10}  {ask_vol:>14}  {ask_price:>10}",
                item.spread_value,
            );
        } else {
            let _ = writeln!(
                out,
                "  {time}  {pair:<12}  {:>6}  {}",
                item.spread_value, item.message,
            );
        }
    }
    out
}

pub fn state_panel(
    state: &Query<BotState>,
    quote: &Query<QuoteInfo>,
    bot_url: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Bot gateway     {bot_url}");

    match state.data() {
        None => {
            out.push_str(LOADING);
            out.push('\n');
        }
        Some(state) => {
            let _ = writeln!(
                out,
                "  Running         {}",
                if state.running { "yes" } else { "no" }
            );
            let _ = writeln!(out, "  Initialized     {}", state.init_label());
            let _ = writeln!(
                out,
                "  Timer interval  {} seconds",
                state.timer_interval_secs
            );
            let _ = writeln!(
                out,
                "  Quote token     {}",
                state
                    .quote_token
                    .as_ref()
                    .map(Principal::to_string)
                    .unwrap_or_else(|| "(not set)".to_string())
            );
        }
    }

    match quote.data() {
        None => {
            if quote.needs_fetch() {
                out.push_str(LOADING);
                out.push('\n');
            }
        }
        Some(info) => {
            let _ = writeln!(
                out,
                "  Quote asset     {} ({}, {} decimals)",
                info.symbol, info.principal, info.decimals
            );
        }
    }
    out
}

pub fn quote_panel(query: &Query<QuoteInfo>) -> String {
    match query.data() {
        None => format!("{LOADING}\n"),
        Some(info) => format!(
            "  Quote asset     {} ({}, {} decimals)\n",
            info.symbol, info.principal, info.decimals
        ),
    }
}

pub fn admins_list(query: &Query<Vec<Principal>>) -> String {
    let mut out = String::new();
    out.push_str("  ADMINS\n");

    let Some(admins) = query.data() else {
        out.push_str(LOADING);
        out.push('\n');
        return out;
    };
    if admins.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for admin in admins {
        let _ = writeln!(out, "  {admin}");
    }
    out
}
