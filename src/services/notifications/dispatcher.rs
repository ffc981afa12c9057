//! Notification dispatcher.
//!
//! Authorizes a request against the account store and fans the payload out
//! to every channel the account has enabled. Sends run as detached tasks on a
//! `TaskTracker`; the caller is acknowledged as soon as they are launched.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;

use super::channel::{ChannelKind, ChannelSender, Delivery, Locale, Payload};
use crate::error::{AppError, AppResult};
use crate::models::Account;
use crate::repositories::AccountStore;

pub const MISSING_PARAMETERS: &str = "Missing parameters. Unable to handle request";

/// Incoming notification request before validation
#[derive(Debug, Clone, Default)]
pub struct NotificationRequest {
    pub account_key: Option<String>,
    pub token: Option<String>,
    pub payload: serde_json::Value,
}

impl NotificationRequest {
    /// Both credentials, if present and non-empty
    fn credentials(&self) -> Option<(&str, &str)> {
        let account_key = self.account_key.as_deref().filter(|s| !s.is_empty())?;
        let token = self.token.as_deref().filter(|s| !s.is_empty())?;
        Some((account_key, token))
    }
}

/// Channels launched for an authorized request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Acknowledgment {
    pub channels: Vec<ChannelKind>,
}

/// Configured senders, one optional slot per channel
#[derive(Clone, Default)]
pub struct ChannelSet {
    email: Option<Arc<dyn ChannelSender>>,
    push: Option<Arc<dyn ChannelSender>>,
    telegram: Option<Arc<dyn ChannelSender>>,
}

impl ChannelSet {
    pub fn with_email(mut self, sender: Arc<dyn ChannelSender>) -> Self {
        self.email = Some(sender);
        self
    }

    pub fn with_push(mut self, sender: Arc<dyn ChannelSender>) -> Self {
        self.push = Some(sender);
        self
    }

    pub fn with_telegram(mut self, sender: Arc<dyn ChannelSender>) -> Self {
        self.telegram = Some(sender);
        self
    }

    pub fn configured(&self) -> Vec<ChannelKind> {
        [
            (ChannelKind::Email, &self.email),
            (ChannelKind::Push, &self.push),
            (ChannelKind::Telegram, &self.telegram),
        ]
        .into_iter()
        .filter_map(|(kind, slot)| slot.as_ref().map(|_| kind))
        .collect()
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    accounts: Arc<dyn AccountStore>,
    channels: ChannelSet,
    tracker: TaskTracker,
}

impl NotificationDispatcher {
    pub fn new(accounts: Arc<dyn AccountStore>, channels: ChannelSet) -> Self {
        Self {
            accounts,
            channels,
            tracker: TaskTracker::new(),
        }
    }

    /// Validate, authorize and fan out.
    ///
    /// # Errors
    ///
    /// - `AppError::UnprocessableContent` if `akey` or `token` is missing or empty
    /// - `AppError::Unauthorized` for an unknown account, a token mismatch, or
    ///   a failed store lookup
    ///
    /// Channel failures are never returned; they are logged by the send task.
    pub async fn handle(&self, request: NotificationRequest) -> AppResult<Acknowledgment> {
        let Some((account_key, token)) = request.credentials() else {
            return Err(AppError::UnprocessableContent {
                message: MISSING_PARAMETERS.to_string(),
            });
        };

        let account = match self.accounts.find_account(account_key).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                return Err(AppError::Unauthorized {
                    message: format!("unknown account '{}'", account_key),
                });
            }
            Err(e) => {
                tracing::warn!(
                    account_key = %account_key,
                    error = %e,
                    "Account lookup failed, rejecting as unauthorized"
                );
                return Err(AppError::Unauthorized {
                    message: format!("account lookup failed for '{}'", account_key),
                });
            }
        };

        if !account.token_matches(token) {
            return Err(AppError::Unauthorized {
                message: format!("token mismatch for account '{}'", account_key),
            });
        }

        let channels = self.fan_out(&account, Payload::new(request.payload));

        tracing::info!(
            account_key = %account.account_key,
            channels = ?channels,
            "Notifications dispatched"
        );

        Ok(Acknowledgment { channels })
    }

    fn fan_out(&self, account: &Account, payload: Payload) -> Vec<ChannelKind> {
        let locale = Locale::from_code(&account.locale);

        let targets = [
            (
                ChannelKind::Email,
                account
                    .email_address
                    .clone()
                    .filter(|address| !address.trim().is_empty()),
                &self.channels.email,
            ),
            (
                ChannelKind::Push,
                account.push_enabled.then(|| account.account_key.clone()),
                &self.channels.push,
            ),
            (
                ChannelKind::Telegram,
                account
                    .messaging_identity
                    .filter(|chat_id| *chat_id != 0)
                    .map(|chat_id| chat_id.to_string()),
                &self.channels.telegram,
            ),
        ];

        let mut launched = Vec::new();
        for (kind, destination, sender) in targets {
            let Some(destination) = destination else {
                continue;
            };
            let Some(sender) = sender else {
                tracing::debug!(
                    account_key = %account.account_key,
                    channel = %kind,
                    "Channel enabled for account but not configured, skipping"
                );
                continue;
            };

            self.spawn_send(
                sender.clone(),
                Delivery {
                    destination,
                    locale,
                    payload: payload.clone(),
                },
            );
            launched.push(kind);
        }

        launched
    }

    /// Detached send; the handle is dropped so a panic stays inside the task.
    fn spawn_send(&self, sender: Arc<dyn ChannelSender>, delivery: Delivery) {
        self.tracker.spawn(async move {
            let channel = sender.kind();
            match sender.send(&delivery).await {
                Ok(report) => tracing::info!(
                    channel = %report.channel,
                    duration_ms = report.duration_ms,
                    "Notification delivered"
                ),
                Err(e) => tracing::error!(
                    channel = %channel,
                    error = ?e,
                    "Notification delivery failed"
                ),
            }
        });
    }

    pub fn configured_channels(&self) -> Vec<ChannelKind> {
        self.channels.configured()
    }

    /// Number of sends still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait up to `timeout` for in-flight sends. Returns `false` on timeout.
    ///
    /// Used during shutdown; new sends may still be spawned afterwards.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();
        drained
    }
}
