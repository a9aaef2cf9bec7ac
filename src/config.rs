//! Configuration loading and fail-fast validation.
//!
//! All runtime settings come from a TOML file (path given on the command
//! line), with secrets overridable from the environment via the CLI layer.
//! Required values for the selected notification channel are validated up
//! front: a missing credential is a startup error, never an empty string
//! flowing into a network call.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{NewswatchError, Result};
use crate::pipeline::DispatchPolicy;

/// Default CSS selector path locating story blocks on the listing page.
pub const DEFAULT_STORY_SELECTOR: &str =
    "body main.pageHolder div.main_container section.section_list div.tabdata div.eachStory";

/// Which notification channel dispatches matched stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    /// Transactional email through the Mailgun HTTP API.
    Email,
    /// WhatsApp pre-approved template message through the Graph API.
    Whatsapp,
}

/// Source page settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Address of the news listing page; also the base for relative links.
    pub page_url: String,
    /// Selector path for story blocks. Configuration rather than a constant
    /// so a markup change does not require a rebuild.
    #[serde(default = "default_story_selector")]
    pub story_selector: String,
}

fn default_story_selector() -> String {
    DEFAULT_STORY_SELECTOR.to_string()
}

/// Dispatch settings: channel choice and stop behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    pub channel: ChannelKind,
    #[serde(default)]
    pub policy: DispatchPolicy,
}

/// Mailgun credentials and addressing.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    pub domain: String,
    pub from: String,
    pub to: String,
    /// Override for tests; production default is the public Mailgun API.
    #[serde(default = "default_mailgun_base")]
    pub api_base: String,
}

fn default_mailgun_base() -> String {
    "https://api.mailgun.net".to_string()
}

/// WhatsApp Business credentials, recipient, and template identity.
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
    /// Recipient WhatsApp ID (phone number in international format).
    pub recipient: String,
    pub template_name: String,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Override for tests; production default is the public Graph API.
    #[serde(default = "default_graph_base")]
    pub api_base: String,
}

fn default_language_code() -> String {
    "en_US".to_string()
}

fn default_graph_base() -> String {
    "https://graph.facebook.com/v18.0".to_string()
}

/// Scheduled fire times, as `"HH:MM"` strings in local time.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub times: Vec<String>,
}

/// The full configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub dispatch: DispatchConfig,
    pub email: Option<EmailConfig>,
    pub whatsapp: Option<WhatsAppConfig>,
    pub schedule: Option<ScheduleConfig>,
}

impl AppConfig {
    /// Read a configuration file. Validation is a separate step so
    /// environment overrides from the CLI layer can be applied first.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            NewswatchError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&text).map_err(|e| {
            NewswatchError::config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| NewswatchError::config(e.to_string()))
    }

    /// Fail fast on absent required values for the selected channel.
    pub fn validate(&self) -> Result<()> {
        if self.source.page_url.trim().is_empty() {
            return Err(NewswatchError::MissingConfig("source.page_url".into()));
        }
        if self.keywords.is_empty() {
            return Err(NewswatchError::MissingConfig("keywords".into()));
        }

        match self.dispatch.channel {
            ChannelKind::Email => {
                let email = self
                    .email
                    .as_ref()
                    .ok_or_else(|| NewswatchError::MissingConfig("email".into()))?;
                require(&email.api_key, "email.api_key")?;
                require(&email.domain, "email.domain")?;
                require(&email.from, "email.from")?;
                require(&email.to, "email.to")?;
            }
            ChannelKind::Whatsapp => {
                let wa = self
                    .whatsapp
                    .as_ref()
                    .ok_or_else(|| NewswatchError::MissingConfig("whatsapp".into()))?;
                require(&wa.access_token, "whatsapp.access_token")?;
                require(&wa.phone_number_id, "whatsapp.phone_number_id")?;
                require(&wa.recipient, "whatsapp.recipient")?;
                require(&wa.template_name, "whatsapp.template_name")?;
            }
        }

        Ok(())
    }
}

fn require(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(NewswatchError::MissingConfig(name.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<AppConfig> {
        let config = AppConfig::from_toml(text)?;
        config.validate()?;
        Ok(config)
    }

    const EMAIL_TOML: &str = r#"
        keywords = ["bonus", "split"]

        [source]
        page_url = "https://example.com/markets/news"

        [dispatch]
        channel = "email"
        policy = "exhaustive"

        [email]
        api_key = "key-secret"
        domain = "mg.example.com"
        from = "alerts@mg.example.com"
        to = "me@example.com"
    "#;

    #[test]
    fn test_email_config_parses_with_defaults() {
        let config = load(EMAIL_TOML).unwrap();
        assert_eq!(config.keywords, vec!["bonus", "split"]);
        assert_eq!(config.dispatch.channel, ChannelKind::Email);
        assert_eq!(config.source.story_selector, DEFAULT_STORY_SELECTOR);
        assert_eq!(
            config.email.unwrap().api_base,
            "https://api.mailgun.net"
        );
    }

    #[test]
    fn test_missing_channel_section_fails_fast() {
        let toml = r#"
            keywords = ["bonus"]

            [source]
            page_url = "https://example.com/markets/news"

            [dispatch]
            channel = "whatsapp"
        "#;
        let err = load(toml).unwrap_err();
        assert!(matches!(err, NewswatchError::MissingConfig(ref name) if name == "whatsapp"));
    }

    #[test]
    fn test_absent_keywords_fail_fast() {
        let toml = r#"
            [source]
            page_url = "https://example.com/markets/news"

            [dispatch]
            channel = "email"

            [email]
            api_key = "key-secret"
            domain = "mg.example.com"
            from = "alerts@mg.example.com"
            to = "me@example.com"
        "#;
        let err = load(toml).unwrap_err();
        assert!(matches!(err, NewswatchError::MissingConfig(ref name) if name == "keywords"));
    }

    #[test]
    fn test_blank_credential_fails_fast() {
        let toml = r#"
            keywords = ["bonus"]

            [source]
            page_url = "https://example.com/markets/news"

            [dispatch]
            channel = "email"

            [email]
            api_key = ""
            domain = "mg.example.com"
            from = "alerts@mg.example.com"
            to = "me@example.com"
        "#;
        let err = load(toml).unwrap_err();
        assert!(matches!(err, NewswatchError::MissingConfig(ref name) if name == "email.api_key"));
    }

    #[test]
    fn test_missing_page_url_fails_fast() {
        let toml = r#"
            [source]
            page_url = "  "

            [dispatch]
            channel = "email"

            [email]
            api_key = "k"
            domain = "d"
            from = "f"
            to = "t"
        "#;
        let err = load(toml).unwrap_err();
        assert!(
            matches!(err, NewswatchError::MissingConfig(ref name) if name == "source.page_url")
        );
    }

    #[test]
    fn test_whatsapp_config_language_default() {
        let toml = r#"
            keywords = ["bonus"]

            [source]
            page_url = "https://example.com/markets/news"

            [dispatch]
            channel = "whatsapp"
            policy = "first-success"

            [whatsapp]
            access_token = "token"
            phone_number_id = "12345"
            recipient = "+919999999999"
            template_name = "news_alert"
        "#;
        let config = load(toml).unwrap();
        let wa = config.whatsapp.unwrap();
        assert_eq!(wa.language_code, "en_US");
        assert_eq!(wa.api_base, "https://graph.facebook.com/v18.0");
        assert_eq!(config.dispatch.policy, DispatchPolicy::FirstSuccess);
    }

    #[test]
    fn test_schedule_times_parse() {
        let toml = format!("{EMAIL_TOML}\n[schedule]\ntimes = [\"09:00\", \"18:00\"]\n");
        let config = load(&toml).unwrap();
        assert_eq!(config.schedule.unwrap().times, vec!["09:00", "18:00"]);
    }
}
