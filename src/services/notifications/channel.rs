//! Channel sender trait and the values handed to it.
//!
//! A channel is one independent delivery mechanism (email, telegram, push).
//! Senders never see the account itself, only a `Delivery`.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;

/// Notification channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Push,
    Telegram,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Push => "push",
            ChannelKind::Telegram => "telegram",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the fixed text surrounding the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    /// Parse a stored language code. Unknown or empty codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "de" => Locale::De,
            _ => Locale::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            Locale::En => "EVNotify: Notification",
            Locale::De => "EVNotify: Benachrichtigung",
        }
    }

    pub fn preamble(&self) -> &'static str {
        match self {
            Locale::En => "EVNotify has sent you a notification about your vehicle:",
            Locale::De => "EVNotify hat eine Benachrichtigung zu Ihrem Fahrzeug gesendet:",
        }
    }
}

/// Opaque notification payload, passed through unchanged to every channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload(serde_json::Value);

impl Payload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Text rendering for human-facing channels.
    ///
    /// JSON strings are returned as-is, anything else as compact JSON.
    pub fn as_text(&self) -> String {
        match &self.0 {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// One send request for one channel
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Email address, telegram chat id, or account key for push
    pub destination: String,
    pub locale: Locale,
    pub payload: Payload,
}

impl Delivery {
    /// Localized preamble, a blank line, then the payload text
    pub fn render_text(&self) -> String {
        format!("{}\n\n{}", self.locale.preamble(), self.payload.as_text())
    }
}

/// Outcome of a successful send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub channel: ChannelKind,
    pub duration_ms: u64,
}

/// Trait for notification channels.
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// Senders run inside detached tasks, so they must be Send + Sync and handle
/// their own failures; the dispatcher only logs the returned error.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, delivery: &Delivery) -> AppResult<DeliveryReport>;

    fn kind(&self) -> ChannelKind;
}
