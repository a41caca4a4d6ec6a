//! Newsdesk service binary.
//!
//! Wires the pieces together: settings, tracing, the store, the daily
//! digest scheduler, and a console command loop standing in for the chat
//! transport. A real deployment replaces the console loop and
//! [`ConsoleGateway`] with the production messaging gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsdesk_core::gateway::{DeliveryError, MessageGateway};
use newsdesk_core::ids::ExternalId;
use newsdesk_digest::{DigestConfig, DigestScheduler, DigestZone};
use newsdesk_server::CommandRouter;
use newsdesk_settings::{NewsdeskSettings, load_settings_from_path, settings_path};
use newsdesk_store::NewsStore;

mod repl;

/// Newsdesk: tagged news items, keyword search, likes, and a daily digest.
#[derive(Debug, Parser)]
#[command(name = "newsdesk", version)]
struct Args {
    /// Settings file (default: ~/.newsdesk/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the state file location.
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Override the log filter (also: NEWSDESK_LOG).
    #[arg(long)]
    log: Option<String>,
}

/// Gateway stand-in that prints deliveries to the console.
struct ConsoleGateway;

#[async_trait]
impl MessageGateway for ConsoleGateway {
    async fn send_text(&self, recipient: &ExternalId, text: &str) -> Result<(), DeliveryError> {
        println!("── to {recipient} ──\n{text}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let path = args.settings.unwrap_or_else(settings_path);
    let mut settings: NewsdeskSettings = load_settings_from_path(&path)
        .with_context(|| format!("loading settings from {}", path.display()))?;
    if let Some(storage) = args.storage {
        settings.storage.path = storage;
    }

    let filter = args
        .log
        .map_or_else(
            || EnvFilter::try_from_env("NEWSDESK_LOG"),
            |f| Ok(EnvFilter::new(f)),
        )
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(settings = %path.display(), storage = %settings.storage.path.display(), "newsdesk starting");
    let store = Arc::new(NewsStore::open(settings.storage.path.clone()));
    let gateway = Arc::new(ConsoleGateway);

    let _scheduler_handle = if settings.digest.enabled {
        let zone: DigestZone = settings
            .digest
            .timezone
            .parse()
            .with_context(|| format!("digest.timezone {:?}", settings.digest.timezone))?;
        let scheduler = Arc::new(DigestScheduler::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
            DigestConfig {
                zone,
                hour: settings.digest.hour,
                minute: settings.digest.minute,
                delivery_timeout: Duration::from_secs(settings.delivery.timeout_secs),
            },
        ));
        Some(scheduler.spawn())
    } else {
        info!("daily digest disabled by settings");
        None
    };

    let router = CommandRouter::new(
        Arc::clone(&store),
        Duration::from_secs(settings.submission.timeout_secs),
    );

    // Console command loop: one operator identity, line-oriented.
    let operator = ExternalId::new("console");
    println!("newsdesk ready — /help for commands, Ctrl-D to exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let output = match repl::parse_line(&line) {
                    Ok(command) => match router.handle(&operator, command) {
                        Ok(response) => response.render(),
                        Err(e) => e.user_message(),
                    },
                    Err(reason) => reason,
                };
                println!("{output}");
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    info!("newsdesk shutting down");
    Ok(())
}
