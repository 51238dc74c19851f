//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, JwtConfig, LoggerSettings, PasswordConfig, SeedConfig,
    ServerConfig, Settings, StorageBackend,
};
use crate::utils::jwt::parse_duration;

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Secrets shorter than this are accepted with a warning
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Upper bound on the hashing cost; higher values stall every login
const MAX_HASH_COST: u32 = 16;

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Please specify an address to bind to.",
            ));
        }

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
    /// Validate storage configuration
    ///
    /// # Validation Rules
    /// - The postgres backend requires a `postgres://` or `postgresql://` URL
    /// - Max connections must be greater than 0
    /// - Min connections must not exceed max connections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StorageBackend::Postgres {
            self.validate_url()?;
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        Ok(())
    }

    /// Validate the connection URL, regardless of the selected backend
    pub fn validate_url(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "DATABASE_URL is required when the postgres backend is selected.",
            ));
        }

        if !["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        Ok(())
    }
}

impl JwtConfig {
    /// Validate JWT configuration
    ///
    /// # Validation Rules
    /// - Secret must not be empty
    /// - Both lifetimes must parse as positive durations
    /// - Refresh tokens must outlive access tokens
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT_SECRET is required. Please set a strong random secret.",
            ));
        }

        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                length = self.secret.len(),
                "JWT secret is shorter than {} characters",
                RECOMMENDED_SECRET_LEN
            );
        }

        let access = parse_duration(&self.access_expires_in).ok_or_else(|| {
            ConfigError::validation(
                "jwt.access_expires_in",
                format!("Invalid duration '{}'. Use forms like 15m, 1h or 7d.", self.access_expires_in),
            )
        })?;
        let refresh = parse_duration(&self.refresh_expires_in).ok_or_else(|| {
            ConfigError::validation(
                "jwt.refresh_expires_in",
                format!("Invalid duration '{}'. Use forms like 15m, 1h or 7d.", self.refresh_expires_in),
            )
        })?;

        if access >= refresh {
            return Err(ConfigError::validation(
                "jwt",
                "Refresh token expiration should be longer than access token expiration",
            ));
        }

        Ok(())
    }
}

impl PasswordConfig {
    /// Validate password hashing configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hash_cost == 0 || self.hash_cost > MAX_HASH_COST {
            return Err(ConfigError::validation(
                "password.hash_cost",
                format!("Hash cost must be between 1 and {}.", MAX_HASH_COST),
            ));
        }
        Ok(())
    }
}

impl SeedConfig {
    /// Validate seed configuration: email and password come as a pair
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.admin_email, &self.admin_password) {
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::validation(
                "seed",
                "admin_email and admin_password must be set together.",
            )),
            _ => Ok(()),
        }
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.directory.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.directory",
                "Log directory is required when file logging is enabled.",
            ));
        }

        let format = self.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all settings; the first failing section is reported
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.password.validate()?;
        self.logger.validate()?;
        self.seed.validate()?;
        Ok(())
    }
}
