//! WhatsApp templated-message channel backed by the Graph API.
//!
//! Sends a pre-approved message template with the story title and time bound
//! to the template body placeholders and the story URL bound to a
//! call-to-action button. Only a strict HTTP 200 counts as acceptance; any
//! other status has its response body logged and reports `false`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::config::WhatsAppConfig;
use crate::error::{NewswatchError, Result};
use crate::models::Story;
use crate::notify::NotificationChannel;

/// Connect/read timeout for send requests.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// WhatsApp Business template-message channel.
pub struct WhatsAppChannel {
    endpoint: String,
    access_token: String,
    recipient: String,
    template_name: String,
    language_code: String,
    http: Client,
}

impl WhatsAppChannel {
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(SEND_TIMEOUT)
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NewswatchError::config(format!("whatsapp client build failed: {e}")))?;

        Ok(Self {
            endpoint: format!(
                "{}/{}/messages",
                config.api_base.trim_end_matches('/'),
                config.phone_number_id
            ),
            access_token: config.access_token.clone(),
            recipient: config.recipient.clone(),
            template_name: config.template_name.clone(),
            language_code: config.language_code.clone(),
            http,
        })
    }

    fn payload(&self, story: &Story) -> serde_json::Value {
        json!({
            "messaging_product": "whatsapp",
            "to": self.recipient,
            "type": "template",
            "template": {
                "name": self.template_name,
                "language": { "code": self.language_code },
                "components": [
                    {
                        "type": "body",
                        "parameters": [
                            { "type": "text", "text": story.title },
                            { "type": "text", "text": story.time },
                        ],
                    },
                    {
                        "type": "button",
                        "sub_type": "url",
                        "index": "0",
                        "parameters": [
                            { "type": "text", "text": story.url },
                        ],
                    },
                ],
            },
        })
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    async fn send(&self, story: &Story) -> bool {
        let result = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&self.payload(story))
            .send()
            .await;

        match result {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                info!(title = %story.title, "WhatsApp template message accepted");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, title = %story.title, "WhatsApp send rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, title = %story.title, "WhatsApp send failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "whatsapp"
    }
}
