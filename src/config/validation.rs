//! Configuration validation logic
//!
//! Each section validates its own values; `Settings::validate` runs them all
//! so a bad file fails at startup instead of on the first request.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, EmailSettings, LoggerSettings, NotificationSettings, ServerConfig, Settings,
    StationSettings, TelegramSettings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a PostgreSQL connection string
    /// - Pool bounds must be positive and `min <= max`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if self.file.enabled {
            if self.file.path.trim().is_empty() {
                return Err(ConfigError::validation(
                    "logger.file.path",
                    "File path cannot be empty when file output is enabled.",
                ));
            }

            if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
                return Err(ConfigError::ValidationError {
                    field: "logger.file.format".to_string(),
                    message: format!(
                        "Invalid log format '{}'. Valid formats are: {}",
                        self.file.format,
                        VALID_LOG_FORMATS.join(", ")
                    ),
                });
            }
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl EmailSettings {
    /// Disabled channels are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.smtp_host.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.email.smtp_host",
                "SMTP host is required when the email channel is enabled.",
            ));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::validation(
                "notifications.email.smtp_port",
                "SMTP port must be between 1 and 65535.",
            ));
        }

        if !self.from_address.contains('@') {
            return Err(ConfigError::validation(
                "notifications.email.from_address",
                "Sender address must be a valid mailbox, e.g. 'EVNotify <noreply@example.com>'.",
            ));
        }

        Ok(())
    }
}

impl TelegramSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.telegram.bot_token",
                "Bot token is required when the telegram channel is enabled.",
            ));
        }

        if !is_http_url(&self.api_url) {
            return Err(ConfigError::validation(
                "notifications.telegram.api_url",
                "Bot API URL must start with http:// or https://.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "notifications.telegram.timeout",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl NotificationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.email.validate()?;
        self.telegram.validate()?;
        Ok(())
    }
}

impl StationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_url) {
            return Err(ConfigError::validation(
                "stations.api_url",
                "Station directory URL must start with http:// or https://.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "stations.timeout",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate every configuration section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.notifications.validate()?;
        self.stations.validate()?;
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/evnotify".to_string();
        settings
    }

    fn assert_field(result: Result<(), ConfigError>, expected: &str) {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected),
            other => panic!("Expected ValidationError for {}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_default_settings_with_database_url_are_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_server_port_zero() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        assert_field(settings.validate(), "server.port");
    }

    #[test]
    fn test_database_url_required() {
        let settings = Settings::default();
        assert_field(settings.validate(), "database.url");
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut settings = valid_settings();
        settings.database.url = "mysql://localhost/evnotify".to_string();
        assert_field(settings.validate(), "database.url");
    }

    #[test]
    fn test_database_min_exceeds_max() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 5;
        assert_field(settings.validate(), "database.min_connections");
    }

    #[test]
    fn test_logger_invalid_level() {
        let mut settings = valid_settings();
        settings.logger.level = "verbose".to_string();
        assert_field(settings.validate(), "logger.level");
    }

    #[test]
    fn test_logger_requires_an_output() {
        let mut settings = valid_settings();
        settings.logger.console.enabled = false;
        settings.logger.file.enabled = false;
        assert_field(settings.validate(), "logger");
    }

    #[test]
    fn test_enabled_email_requires_host() {
        let mut settings = valid_settings();
        settings.notifications.email.enabled = true;
        settings.notifications.email.from_address = "noreply@example.com".to_string();
        assert_field(settings.validate(), "notifications.email.smtp_host");
    }

    #[test]
    fn test_enabled_email_requires_mailbox() {
        let mut settings = valid_settings();
        settings.notifications.email.enabled = true;
        settings.notifications.email.smtp_host = "smtp.example.com".to_string();
        settings.notifications.email.from_address = "noreply".to_string();
        assert_field(settings.validate(), "notifications.email.from_address");
    }

    #[test]
    fn test_disabled_channels_skip_validation() {
        let mut settings = valid_settings();
        settings.notifications.email.smtp_host.clear();
        settings.notifications.telegram.bot_token.clear();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_enabled_telegram_requires_token() {
        let mut settings = valid_settings();
        settings.notifications.telegram.enabled = true;
        assert_field(settings.validate(), "notifications.telegram.bot_token");
    }

    #[test]
    fn test_station_url_scheme() {
        let mut settings = valid_settings();
        settings.stations.api_url = "ftp://stations.example.com".to_string();
        assert_field(settings.validate(), "stations.api_url");
    }
}
