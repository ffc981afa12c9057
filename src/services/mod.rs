//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, external clients and handlers.

pub mod notifications;
mod station_service;

pub use notifications::NotificationDispatcher;
pub use station_service::StationService;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{NotificationSettings, StationSettings};
use crate::error::{AppError, AppResult};
use crate::external::{StationDirectory, build_http_client};
use crate::repositories::AccountStore;
use notifications::{ChannelSet, EmailChannel, NoopPushChannel, TelegramChannel};

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since every member holds `Arc`s or pooled clients.
#[derive(Clone)]
pub struct Services {
    pub notifications: NotificationDispatcher,
    pub stations: StationService,
}

impl Services {
    pub fn new(notifications: NotificationDispatcher, stations: StationService) -> Self {
        Self {
            notifications,
            stations,
        }
    }

    /// Wire every service from configuration.
    ///
    /// Only enabled channels get a sender; accounts asking for a missing one
    /// are skipped by the dispatcher.
    pub fn from_settings(
        notifications: &NotificationSettings,
        stations: &StationSettings,
        accounts: Arc<dyn AccountStore>,
    ) -> AppResult<Self> {
        let channels = build_channels(notifications)?;
        let directory = StationDirectory::from_settings(stations)?;

        Ok(Self::new(
            NotificationDispatcher::new(accounts, channels),
            StationService::new(directory),
        ))
    }
}

fn build_channels(settings: &NotificationSettings) -> AppResult<ChannelSet> {
    let mut channels = ChannelSet::default();

    if settings.email.enabled {
        channels = channels.with_email(Arc::new(EmailChannel::new(&settings.email)?));
    }

    if settings.push.enabled {
        channels = channels.with_push(Arc::new(NoopPushChannel));
    }

    if settings.telegram.enabled {
        let client = build_http_client(Duration::from_secs(settings.telegram.timeout), 10)
            .map_err(|e| AppError::Configuration {
                key: "notifications.telegram".to_string(),
                source: e.into(),
            })?;
        channels = channels.with_telegram(Arc::new(TelegramChannel::new(
            client,
            &settings.telegram,
        )));
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifications::ChannelKind;

    #[test]
    fn test_only_enabled_channels_are_built() {
        let mut settings = NotificationSettings::default();
        assert!(build_channels(&settings).unwrap().configured().is_empty());

        settings.push.enabled = true;
        settings.telegram.enabled = true;
        settings.telegram.bot_token = "42:abc".to_string();

        assert_eq!(
            build_channels(&settings).unwrap().configured(),
            vec![ChannelKind::Push, ChannelKind::Telegram]
        );
    }
}
