//! Clients for third-party HTTP services.

pub mod client;
pub mod stations;

pub use client::build_http_client;
pub use stations::StationDirectory;
