//! One-shot dump of the bot's state, pairs, history and admins.
//!
//! Fetches everything once, prints the same views the interactive console
//! renders, and exits non-zero when the gateway is unreachable. Meant for
//! cron jobs and piping.
//!
//! Usage:  cargo run --bin snapshot

use marketdesk::config::Config;
use marketdesk::console::render;
use marketdesk::console::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default();
    config.validate()?;

    let table_digits = config.console.table_digits;
    let bot_url = config.bot.url.clone();
    let session = Session::new(config);
    session.refresh_stale().await;

    let cache = session.cache();
    if cache.bot_state.read().await.is_loading() {
        anyhow::bail!("bot state unavailable at {bot_url}");
    }

    println!("== STATE ==");
    print!(
        "{}",
        render::state_panel(
            &*cache.bot_state.read().await,
            &*cache.quote_info.read().await,
            &bot_url,
        )
    );
    println!("\n== PAIRS ==");
    print!(
        "{}",
        render::pairs_table(&*cache.pairs.read().await, table_digits)
    );
    println!("\n== HISTORY ==");
    print!("{}", render::history_table(&*cache.history.read().await));
    println!("\n== ADMINS ==");
    print!("{}", render::admins_list(&*cache.admins.read().await));

    Ok(())
}
