//! Configuration management for flipflop-auth
//!
//! Separates network startup configuration from the authentication policy
//! consumed by the session workflow. Values come from an optional
//! `config.toml` and can be overridden with `FLIPFLOP_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::auth::{LockoutPolicy, TokenMode};

/// Locations searched for a config file, in order (without the `.toml` suffix)
const CONFIG_PATHS: [&str; 2] = [
    "flipflop-auth/config", // Container layout: /app/flipflop-auth/config.toml
    "config",               // Local development: ./config.toml
];

/// Complete server configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub policy: AuthPolicy,
}

/// Network settings, read once when the listener is bound
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StartupConfig {
    /// IP address to bind the control listener
    pub bind_address: String,

    /// TCP port for the control listener
    pub port: u16,

    /// Maximum concurrently connected clients
    pub max_clients: usize,

    /// Maximum request line length in bytes
    pub max_command_length: usize,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2323,
            max_clients: 32,
            max_command_length: 512,
        }
    }
}

/// Authentication policy applied by the session workflow
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthPolicy {
    /// Consecutive failures that trigger a lockout
    pub max_attempts: u32,

    /// How long a lockout lasts
    pub lockout_secs: u64,

    pub token_mode: TokenMode,

    /// Offset from UTC used when rendering login timestamps
    pub utc_offset_minutes: i32,

    pub max_username_length: usize,
    pub max_password_length: usize,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_secs: 60,
            token_mode: TokenMode::PerLogin,
            utc_offset_minutes: 330,
            max_username_length: 64,
            max_password_length: 128,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = CONFIG_PATHS
            .iter()
            .find(|path| Path::new(&format!("{path}.toml")).exists())
        {
            log::info!("Loading configuration from {path}.toml");
            builder = builder.add_source(File::with_name(path));
        } else {
            log::warn!("No config.toml found (tried {CONFIG_PATHS:?}), using defaults");
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("FLIPFLOP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.startup.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.startup.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.startup.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.startup.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.policy.max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "max_attempts must be greater than 0".into(),
            ));
        }

        if self.policy.lockout_secs == 0 {
            return Err(config::ConfigError::Message(
                "lockout_secs must be greater than 0".into(),
            ));
        }

        if self.policy.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(config::ConfigError::Message(
                "utc_offset_minutes must be within +/- 24 hours".into(),
            ));
        }

        if self.policy.max_username_length == 0 {
            return Err(config::ConfigError::Message(
                "max_username_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Get bind address and port as a socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AuthPolicy {
    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            max_attempts: self.max_attempts,
            lockout_duration: Duration::from_secs(self.lockout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy.max_attempts, 3);
        assert_eq!(config.policy.lockout_secs, 60);
        assert_eq!(config.startup.control_socket(), "127.0.0.1:2323");
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = ServerConfig::default();
        config.startup.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        temp_env::with_vars(
            [
                ("FLIPFLOP_MAX_ATTEMPTS", Some("5")),
                ("FLIPFLOP_TOKEN_MODE", Some("reproducible")),
                ("FLIPFLOP_BIND_ADDRESS", Some("0.0.0.0")),
            ],
            || {
                let config = ServerConfig::load().unwrap();
                assert_eq!(config.policy.max_attempts, 5);
                assert_eq!(config.policy.token_mode, TokenMode::Reproducible);
                assert_eq!(config.startup.bind_address, "0.0.0.0");
                assert_eq!(config.policy.lockout_secs, 60);
            },
        );
    }

    #[test]
    fn invalid_environment_value_rejected() {
        temp_env::with_vars([("FLIPFLOP_MAX_ATTEMPTS", Some("0"))], || {
            assert!(ServerConfig::load().is_err());
        });
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut config = ServerConfig::default();
        config.policy.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn offset_out_of_range_rejected() {
        let mut config = ServerConfig::default();
        config.policy.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "port = 4000\nmax_attempts = 5\ntoken_mode = \"reproducible\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: ServerConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.startup.port, 4000);
        assert_eq!(config.startup.bind_address, "127.0.0.1");
        assert_eq!(config.policy.max_attempts, 5);
        assert_eq!(config.policy.lockout_secs, 60);
        assert_eq!(config.policy.token_mode, TokenMode::Reproducible);
    }
}
