//! Push channel placeholder.

use async_trait::async_trait;

use super::channel::{ChannelKind, ChannelSender, Delivery, DeliveryReport};
use crate::error::AppResult;

/// Accepts push deliveries without sending anything.
///
/// Keeps the fanout symmetric until a push backend exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPushChannel;

#[async_trait]
impl ChannelSender for NoopPushChannel {
    async fn send(&self, delivery: &Delivery) -> AppResult<DeliveryReport> {
        tracing::debug!(
            account_key = %delivery.destination,
            locale = delivery.locale.code(),
            "Push channel is a no-op, skipping delivery"
        );

        Ok(DeliveryReport {
            channel: ChannelKind::Push,
            duration_ms: 0,
        })
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Push
    }
}
