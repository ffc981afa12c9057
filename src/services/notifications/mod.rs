//! Notification system with pluggable channels.
//!
//! The `NotificationDispatcher` authorizes a caller against the account store
//! and launches one background send per enabled channel. Channels implement
//! `ChannelSender`; email, telegram and a no-op push sender ship here.

mod channel;
mod dispatcher;
mod email_channel;
mod push_channel;
mod telegram_channel;

pub use channel::{ChannelKind, ChannelSender, Delivery, DeliveryReport, Locale, Payload};
pub use dispatcher::{
    Acknowledgment, ChannelSet, MISSING_PARAMETERS, NotificationDispatcher, NotificationRequest,
};
pub use email_channel::EmailChannel;
pub use push_channel::NoopPushChannel;
pub use telegram_channel::TelegramChannel;
