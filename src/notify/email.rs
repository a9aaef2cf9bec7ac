//! Transactional email channel backed by the Mailgun HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::error::{NewswatchError, Result};
use crate::models::Story;
use crate::notify::NotificationChannel;

/// Connect/read timeout for send requests.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Mailgun message-send channel.
///
/// Posts a form-encoded request to `{api_base}/v3/{domain}/messages` with
/// basic authentication (username is the literal `"api"`, password is the
/// account API key).
pub struct MailgunChannel {
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
    http: Client,
}

impl MailgunChannel {
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(SEND_TIMEOUT)
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NewswatchError::config(format!("email client build failed: {e}")))?;

        Ok(Self {
            endpoint: format!(
                "{}/v3/{}/messages",
                config.api_base.trim_end_matches('/'),
                config.domain
            ),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
            http,
        })
    }
}

#[async_trait]
impl NotificationChannel for MailgunChannel {
    async fn send(&self, story: &Story) -> bool {
        let subject = format!("News Alert: {}", story.title);
        let body = format!(
            "Title: {}\nTime: {}\nURL: {}\n",
            story.title, story.time, story.url
        );

        let form = [
            ("from", self.from.as_str()),
            ("to", self.to.as_str()),
            ("subject", subject.as_str()),
            ("text", body.as_str()),
        ];

        let result = self
            .http
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(title = %story.title, "Email accepted by provider");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, title = %story.title, "Email rejected by provider");
                false
            }
            Err(e) => {
                warn!(error = %e, title = %story.title, "Email send failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
