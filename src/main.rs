//! # newswatch
//!
//! Watches a news listing page, extracts story records, filters them
//! against a keyword interest list, and dispatches matching stories through
//! a notification channel (Mailgun email or WhatsApp template message).
//!
//! ## Usage
//!
//! ```sh
//! # One pipeline run
//! newswatch -c newswatch.toml --once
//!
//! # Scheduled runs at the configured times of day
//! newswatch -c newswatch.toml
//! ```
//!
//! ## Architecture
//!
//! The application is a single pipeline run once or on a fixed-time
//! schedule:
//! 1. **Scrape**: retrieve the listing page and extract story blocks
//! 2. **Filter**: keep stories whose title matches a configured keyword
//! 3. **Dispatch**: send each match through the configured channel,
//!    exhaustively or stopping at the first accepted send

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod filter;
mod models;
mod notify;
mod pipeline;
mod scheduler;
mod scrapers;

use cli::Cli;
use config::{AppConfig, ChannelKind};
use error::NewswatchError;
use notify::{MailgunChannel, NotificationChannel, WhatsAppChannel};
use pipeline::Processor;
use scheduler::{Scheduler, SystemClock};
use scrapers::ListingScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("newswatch starting up");

    // Parse CLI and load configuration; overrides apply before the
    // fail-fast validation so env-supplied secrets count.
    let args = Cli::parse();
    debug!(config = %args.config.display(), once = args.once, "Parsed CLI arguments");

    let mut config = AppConfig::load(&args.config)?;
    args.apply_to(&mut config);
    config.validate()?;

    let source = ListingScraper::new(&config.source.page_url, &config.source.story_selector)?;

    let channel: Box<dyn NotificationChannel> = match config.dispatch.channel {
        ChannelKind::Email => {
            let email = config
                .email
                .as_ref()
                .ok_or_else(|| NewswatchError::MissingConfig("email".into()))?;
            Box::new(MailgunChannel::new(email)?)
        }
        ChannelKind::Whatsapp => {
            let wa = config
                .whatsapp
                .as_ref()
                .ok_or_else(|| NewswatchError::MissingConfig("whatsapp".into()))?;
            Box::new(WhatsAppChannel::new(wa)?)
        }
    };

    info!(
        page_url = %config.source.page_url,
        channel = channel.name(),
        policy = ?config.dispatch.policy,
        keywords = ?config.keywords,
        "Pipeline configured"
    );

    let processor = Arc::new(Processor::new(
        Box::new(source),
        channel,
        config.dispatch.policy,
    ));
    let keywords = Arc::new(config.keywords.clone());

    // --- Run once, or on the configured schedule ---
    match (&config.schedule, args.once) {
        (Some(schedule), false) => {
            let scheduler = Scheduler::new(&schedule.times, Arc::new(SystemClock))?;

            let stop = scheduler.stop_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received; stopping");
                    stop.stop();
                }
            });

            scheduler
                .run(move || {
                    let processor = Arc::clone(&processor);
                    let keywords = Arc::clone(&keywords);
                    async move { processor.process(&keywords).await }
                })
                .await;
        }
        _ => {
            if config.schedule.is_none() && !args.once {
                info!("No [schedule] section configured; running once");
            }
            let summary = processor.process(&keywords).await?;
            info!(
                scraped = summary.scraped,
                matched = summary.matched,
                attempted = summary.attempted,
                accepted = summary.accepted,
                "Run complete"
            );
        }
    }

    Ok(())
}
