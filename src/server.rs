//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::settings::Settings;
use crate::db::establish_async_connection_pool;
use crate::repositories::{AccountStore, DieselAccountStore};
use crate::services::Services;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// After the listener stops, in-flight notification sends get up to
    /// `notifications.shutdown_drain_timeout` seconds to finish.
    ///
    /// # Errors
    /// - Database connection pool initialization errors
    /// - Channel or station client construction errors
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            "Application starting"
        );

        // Secrets (database URL, SMTP password, bot token, api key) stay out of the log
        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            max_connections = settings.database.max_connections,
            connection_timeout = settings.database.connection_timeout,
            "Server configuration loaded"
        );
        tracing::info!(
            api_url = %settings.stations.api_url,
            api_key_configured = !settings.stations.api_key.is_empty(),
            "Station directory configured"
        );

        tracing::info!("Initializing database connection pool...");
        let pool = establish_async_connection_pool(&settings.database).await?;
        let accounts: Arc<dyn AccountStore> = Arc::new(DieselAccountStore::new(pool));
        tracing::info!("Database connection pool initialized");

        let services = Services::from_settings(
            &settings.notifications,
            &settings.stations,
            accounts.clone(),
        )?;
        tracing::info!(
            channels = ?services.notifications.configured_channels(),
            drain_timeout = settings.notifications.shutdown_drain_timeout,
            "Notification channels configured"
        );
        let state = AppState::new(services, accounts);
        let router = create_router(state.clone());

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        let dispatcher = &state.services.notifications;
        let pending = dispatcher.in_flight();
        if pending > 0 {
            tracing::info!(pending, "Waiting for in-flight notifications");
        }
        let drain_timeout = Duration::from_secs(settings.notifications.shutdown_drain_timeout);
        if !dispatcher.drain(drain_timeout).await {
            tracing::warn!(
                pending = dispatcher.in_flight(),
                timeout_secs = drain_timeout.as_secs(),
                "Shutdown drain timed out, abandoning notification sends"
            );
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
