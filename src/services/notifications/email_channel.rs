//! SMTP email channel.

use std::time::Instant;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::channel::{ChannelKind, ChannelSender, Delivery, DeliveryReport};
use crate::config::EmailSettings;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "smtp";

/// Sends notifications as plain-text mail over a STARTTLS relay.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailChannel {
    /// Build the transport once; connections are pooled by lettre.
    pub fn new(settings: &EmailSettings) -> AppResult<Self> {
        let from: Mailbox = settings
            .from_address
            .parse()
            .map_err(|e| AppError::Configuration {
                key: "notifications.email.from_address".to_string(),
                source: anyhow::Error::new(e),
            })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| AppError::Configuration {
                key: "notifications.email.smtp_host".to_string(),
                source: anyhow::Error::new(e),
            })?
            .port(settings.smtp_port);

        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, delivery: &Delivery) -> AppResult<Message> {
        let to: Mailbox = delivery.destination.parse().map_err(|e| AppError::Validation {
            field: "email".to_string(),
            reason: format!("Invalid recipient address: {}", e),
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(delivery.locale.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(delivery.render_text())
            .map_err(|e| AppError::upstream(SERVICE, e))
    }
}

#[async_trait]
impl ChannelSender for EmailChannel {
    async fn send(&self, delivery: &Delivery) -> AppResult<DeliveryReport> {
        let start = Instant::now();
        let message = self.build_message(delivery)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::upstream(SERVICE, e))?;

        Ok(DeliveryReport {
            channel: ChannelKind::Email,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }
}
