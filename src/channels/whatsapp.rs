//! WhatsApp channel — outbound messages through the Twilio Messages API.
//!
//! Inbound messages arrive as Twilio webhooks and are handled by the gateway;
//! this side only pushes unsolicited messages to the one configured number.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use super::MessageSender;
use crate::error::ChannelError;

/// Twilio credentials and the fixed origin/destination pair.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub api_base: String,
    pub account_sid: String,
    pub auth_token: SecretString,
    /// Origin number, with or without the `whatsapp:` prefix.
    pub from_number: String,
    /// Destination number, with or without the `whatsapp:` prefix.
    pub to_number: String,
}

impl WhatsAppConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.twilio.com";
}

/// Subset of Twilio's message resource we log.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

/// Sends WhatsApp messages via Twilio.
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

/// Prefix a phone number with `whatsapp:` unless it already has it.
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{number}")
    }
}

#[async_trait]
impl MessageSender for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, text: &str) -> Result<(), ChannelError> {
        if text.trim().is_empty() {
            return Err(ChannelError::InvalidMessage(
                "refusing to send an empty message".into(),
            ));
        }

        let form = [
            ("From", whatsapp_address(&self.config.from_number)),
            ("To", whatsapp_address(&self.config.to_number)),
            ("Body", text.to_string()),
        ];

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "whatsapp".into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ChannelError::AuthFailed {
                name: "whatsapp".into(),
                reason: resp.text().await.unwrap_or_default(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = ?status, "Twilio rejected WhatsApp message");
            return Err(ChannelError::SendFailed {
                name: "whatsapp".into(),
                reason: format!("HTTP {status}: {body}"),
            });
        }

        match resp.json::<MessageResource>().await {
            Ok(msg) => info!(
                sid = msg.sid.as_deref().unwrap_or("-"),
                status = msg.status.as_deref().unwrap_or("-"),
                "WhatsApp message sent"
            ),
            Err(_) => info!("WhatsApp message sent"),
        }
        Ok(())
    }
}
