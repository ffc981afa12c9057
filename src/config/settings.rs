//! Configuration settings structures for evnotify
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "evnotify".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/evnotify.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_channel_timeout() -> u64 {
    10
}

fn default_drain_timeout() -> u64 {
    10
}

fn default_station_api_url() -> String {
    "https://api.goingelectric.de".to_string()
}

fn default_station_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Account store connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections kept in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection checkout timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output (only applied on a TTY)
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }
}

// ============================================================================
// Notification Channel Configuration
// ============================================================================

/// SMTP relay used by the email channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: String,

    /// SMTP password; prefer `EVNOTIFY_NOTIFICATIONS__EMAIL__PASSWORD`
    #[serde(default)]
    pub password: String,

    /// Sender mailbox, e.g. `EVNotify <noreply@evnotify.de>`
    #[serde(default)]
    pub from_address: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
        }
    }
}

/// Telegram Bot API used by the messaging-bot channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub bot_token: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_channel_timeout")]
    pub timeout: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_telegram_api_url(),
            bot_token: String::new(),
            timeout: default_channel_timeout(),
        }
    }
}

/// Push channel; only a no-op sender exists today
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushSettings {
    #[serde(default)]
    pub enabled: bool,
}

/// Notification dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub email: EmailSettings,

    #[serde(default)]
    pub telegram: TelegramSettings,

    #[serde(default)]
    pub push: PushSettings,

    /// Seconds to wait for in-flight channel sends during shutdown
    #[serde(default = "default_drain_timeout")]
    pub shutdown_drain_timeout: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: EmailSettings::default(),
            telegram: TelegramSettings::default(),
            push: PushSettings::default(),
            shutdown_drain_timeout: default_drain_timeout(),
        }
    }
}

// ============================================================================
// Station Directory Configuration
// ============================================================================

/// Upstream charging-station directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSettings {
    #[serde(default = "default_station_api_url")]
    pub api_url: String,

    /// Key segment appended after the endpoint path, e.g. `?key=abc123`
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_station_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for StationSettings {
    fn default() -> Self {
        Self {
            api_url: default_station_api_url(),
            api_key: String::new(),
            timeout: default_station_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub stations: StationSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_server_config() -> impl Strategy<Value = ServerConfig> {
        (
            prop_oneof![
                Just("127.0.0.1".to_string()),
                Just("0.0.0.0".to_string()),
                Just("localhost".to_string()),
            ],
            1u16..=65535u16,
        )
            .prop_map(|(host, port)| ServerConfig { host, port })
    }

    fn arb_email_settings() -> impl Strategy<Value = EmailSettings> {
        (
            any::<bool>(),
            "[a-z]{3,10}\\.example\\.com",
            prop_oneof![Just(25u16), Just(465u16), Just(587u16)],
            "[a-z]{1,12}",
            "[a-zA-Z0-9]{0,24}",
        )
            .prop_map(|(enabled, smtp_host, smtp_port, username, password)| {
                EmailSettings {
                    enabled,
                    smtp_host,
                    smtp_port,
                    from_address: format!("{}@example.com", username),
                    username,
                    password,
                }
            })
    }

    fn arb_notification_settings() -> impl Strategy<Value = NotificationSettings> {
        (
            arb_email_settings(),
            any::<bool>(),
            "[0-9]{6,10}:[A-Za-z0-9]{10,20}",
            1u64..=60u64,
            any::<bool>(),
            0u64..=120u64,
        )
            .prop_map(
                |(email, telegram_enabled, bot_token, timeout, push, drain)| {
                    NotificationSettings {
                        email,
                        telegram: TelegramSettings {
                            enabled: telegram_enabled,
                            api_url: default_telegram_api_url(),
                            bot_token,
                            timeout,
                        },
                        push: PushSettings { enabled: push },
                        shutdown_drain_timeout: drain,
                    }
                },
            )
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            arb_server_config(),
            arb_notification_settings(),
            "\\?key=[a-f0-9]{8,32}",
            1usize..=20usize,
        )
            .prop_map(|(server, notifications, api_key, max_redirects)| Settings {
                server,
                notifications,
                stations: StationSettings {
                    api_key,
                    max_redirects,
                    ..StationSettings::default()
                },
                ..Settings::default()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings)
                .expect("Settings should serialize to TOML");
            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("TOML should deserialize back to Settings");
            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_application_config_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.name, "evnotify");
        assert_eq!(config.version, crate::pkg_version());
    }

    #[test]
    fn test_server_config_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_station_settings_match_upstream_contract() {
        let config = StationSettings::default();
        assert_eq!(config.timeout, 10);
        assert_eq!(config.max_redirects, 10);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_channels_disabled_by_default() {
        let config = NotificationSettings::default();
        assert!(!config.email.enabled);
        assert!(!config.telegram.enabled);
        assert!(!config.push.enabled);
        assert_eq!(config.email.smtp_port, 587);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
[server]
port = 8080

[notifications.telegram]
enabled = true
bot_token = "123456:abcdef"
"#;
        let settings: Settings = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert!(settings.notifications.telegram.enabled);
        assert_eq!(settings.notifications.telegram.timeout, 10);
        assert!(!settings.notifications.email.enabled);
        assert_eq!(settings.notifications.shutdown_drain_timeout, 10);
    }

    #[test]
    fn test_logger_settings_into_logger_config_with_file() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            console: ConsoleSettings::default(),
            file: FileSettings {
                enabled: true,
                path: "logs/test.log".to_string(),
                append: false,
                format: "compact".to_string(),
            },
        };

        let config = settings.into_logger_config().expect("valid logger settings");
        assert_eq!(config.level, "debug");
        assert!(config.file.enabled);
        assert_eq!(config.file.format, LogFormat::Compact);
        assert_eq!(config.file.path, PathBuf::from("logs/test.log"));
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..FileSettings::default()
            },
            ..LoggerSettings::default()
        };

        match settings.into_logger_config() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "logger.file.format")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "loud".to_string(),
            ..LoggerSettings::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
