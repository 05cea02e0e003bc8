use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};

use marketdesk::config::Config;
use marketdesk::console::commands::Command;
use marketdesk::console::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("================================================");
    info!("  MARKETDESK — market-maker bot operator console");
    info!("================================================");

    let config = Config::load_or_default();
    config.validate()?;

    info!("Bot gateway: {}", config.bot.url);
    if config.bot.auth_token.is_none() {
        warn!("No BOT_AUTH_TOKEN set — admin commands may be rejected");
    }

    let refresh_secs = config.console.refresh_secs;
    let session = Arc::new(Session::new(config));

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Background refresh: the initial fetch of every view, then any view
    // a command invalidated meanwhile.
    {
        let session = session.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(refresh_secs));
            loop {
                tokio::select! {
                    _ = interval.tick() => session.refresh_stale().await,
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
    }

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cmd = match Command::parse(line) {
            Ok(cmd) => cmd,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if cmd == Command::Quit {
            break;
        }

        let output = session.dispatch(cmd).await;
        if !output.is_empty() {
            println!("{output}");
        }
    }

    let _ = shutdown_tx.send(());
    info!("Console closed");
    Ok(())
}
