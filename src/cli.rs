//! Command-line interface definitions for newswatch.
//!
//! Most settings live in the TOML configuration file; the CLI covers the
//! config path, run mode, and secret overrides that are better supplied
//! through the environment than written to disk.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{AppConfig, ChannelKind};
use crate::pipeline::DispatchPolicy;

/// Command-line arguments for newswatch.
///
/// # Examples
///
/// ```sh
/// # One pipeline run, then exit
/// newswatch -c newswatch.toml --once
///
/// # Scheduled runs at the times configured in the file
/// newswatch -c newswatch.toml
///
/// # Secrets from the environment instead of the file
/// MAILGUN_API_KEY=key-... newswatch -c newswatch.toml --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "newswatch.toml")]
    pub config: PathBuf,

    /// Run the pipeline once and exit instead of scheduling
    #[arg(long)]
    pub once: bool,

    /// Override the configured notification channel
    #[arg(long, value_enum)]
    pub channel: Option<ChannelKind>,

    /// Override the configured dispatch policy
    #[arg(long, value_enum)]
    pub policy: Option<DispatchPolicy>,

    /// Mailgun API key (overrides the config file)
    #[arg(long, env = "MAILGUN_API_KEY", hide_env_values = true)]
    pub mailgun_api_key: Option<String>,

    /// WhatsApp access token (overrides the config file)
    #[arg(long, env = "WHATSAPP_ACCESS_TOKEN", hide_env_values = true)]
    pub whatsapp_access_token: Option<String>,
}

impl Cli {
    /// Fold CLI/environment overrides into the loaded configuration.
    /// Runs before validation so an env-supplied secret satisfies the
    /// fail-fast check.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(channel) = self.channel {
            config.dispatch.channel = channel;
        }
        if let Some(policy) = self.policy {
            config.dispatch.policy = policy;
        }
        if let Some(ref key) = self.mailgun_api_key
            && let Some(ref mut email) = config.email
        {
            email.api_key = key.clone();
        }
        if let Some(ref token) = self.whatsapp_access_token
            && let Some(ref mut wa) = config.whatsapp
        {
            wa.access_token = token.clone();
        }
    }
}
