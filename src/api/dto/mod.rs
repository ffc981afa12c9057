//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `notification` - Notification dispatch request/response
//! - `station` - Station proxy requests and envelopes
//! - `health` - Health check responses
//! - `error` - Common error response DTOs

mod error;
mod health;
mod notification;
mod station;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use notification::{NOTIFICATIONS_SENT, NotificationSentResponse, SendNotificationRequest};
pub use station::{
    CardsResponse, StationId, StationIdRequest, StationResponse, StationSearchRequest,
    StationsResponse, envelope,
};
