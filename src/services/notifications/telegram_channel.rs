//! Telegram Bot API channel.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::channel::{ChannelKind, ChannelSender, Delivery, DeliveryReport};
use crate::config::TelegramSettings;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "telegram";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts notifications to a chat through `sendMessage`.
///
/// The `reqwest::Client` is injected so it can be shared with other
/// components; the per-request timeout comes from `TelegramSettings`.
pub struct TelegramChannel {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl TelegramChannel {
    pub fn new(client: reqwest::Client, settings: &TelegramSettings) -> Self {
        Self {
            client,
            endpoint: send_message_url(&settings.api_url, &settings.bot_token),
            timeout: Duration::from_secs(settings.timeout),
        }
    }
}

fn send_message_url(api_url: &str, bot_token: &str) -> String {
    format!(
        "{}/bot{}/sendMessage",
        api_url.trim_end_matches('/'),
        bot_token
    )
}

#[async_trait]
impl ChannelSender for TelegramChannel {
    async fn send(&self, delivery: &Delivery) -> AppResult<DeliveryReport> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&SendMessageRequest {
                chat_id: &delivery.destination,
                text: delivery.render_text(),
            })
            .send()
            .await
            .map_err(|e| AppError::upstream(SERVICE, e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::upstream(SERVICE, e.without_url()))?;
        // Proxies in front of the Bot API may answer errors with HTML
        let body = serde_json::from_str::<BotApiResponse>(&text).ok();

        // The bot token is part of the URL, so errors above are stripped of it.
        if !status.is_success() {
            let description = body
                .and_then(|b| b.description)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(AppError::upstream(
                SERVICE,
                anyhow::anyhow!(
                    "sendMessage rejected with status {}: {}",
                    status.as_u16(),
                    description
                ),
            ));
        }

        match body {
            Some(body) if body.ok => {}
            Some(body) => {
                return Err(AppError::upstream(
                    SERVICE,
                    anyhow::anyhow!(
                        "sendMessage rejected: {}",
                        body.description
                            .unwrap_or_else(|| "no description".to_string())
                    ),
                ));
            }
            None => {
                return Err(AppError::upstream(
                    SERVICE,
                    anyhow::anyhow!("sendMessage returned a non-JSON body"),
                ));
            }
        }

        Ok(DeliveryReport {
            channel: ChannelKind::Telegram,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }
}
