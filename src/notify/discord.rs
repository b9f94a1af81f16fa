//! Discord incoming-webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{Notifier, NotifyError};
use crate::models::{value_text, Reservation};

/// Embed accent colour (egg-yolk yellow).
const EMBED_COLOR: u32 = 0xF5_C5_18;

#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    color: u32,
    fields: Vec<EmbedField>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: &'static str,
    value: String,
    inline: bool,
}

impl EmbedField {
    fn new(name: &'static str, value: impl Into<String>, inline: bool) -> Self {
        let value = value.into();
        // Discord rejects empty field values.
        let value = if value.is_empty() { "-".to_string() } else { value };
        Self {
            name,
            value,
            inline,
        }
    }
}

/// Posts a summary of each reservation to a Discord channel.
#[derive(Clone)]
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhook_url: String) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

fn text_or(value: &Value, fallback: &str) -> String {
    value_text(value).unwrap_or_else(|| fallback.to_string())
}

fn build_payload(reservation: &Reservation) -> WebhookPayload {
    let mut fields = vec![
        EmbedField::new("Name", reservation.display_name(), true),
        EmbedField::new("Email", text_or(&reservation.email, "Not provided"), true),
        EmbedField::new("Phone", text_or(&reservation.phone, ""), true),
        EmbedField::new("Quantity", text_or(&reservation.quantity, "Not specified"), true),
        EmbedField::new("Batch", text_or(&reservation.batch, ""), true),
        EmbedField::new("Pickup Date", text_or(&reservation.pickup_date, ""), true),
    ];
    let message = text_or(&reservation.message, "");
    if !message.is_empty() {
        fields.push(EmbedField::new("Message", message, false));
    }

    WebhookPayload {
        embeds: vec![Embed {
            title: "New Egg Reservation".to_string(),
            color: EMBED_COLOR,
            fields,
            timestamp: reservation.submitted_at.clone(),
        }],
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn reservation_created(&self, reservation: &Reservation) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&build_payload(reservation))
            .send()
            .await
            .map_err(|error| NotifyError::Transport(error.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        tracing::debug!(reservation_id = reservation.id, "Posted reservation to Discord");
        Ok(())
    }
}
