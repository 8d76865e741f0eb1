// crates/campus-gate-config/src/config.rs
// ============================================================================
// Module: Campus Gate Configuration
// Description: Configuration loading and validation for Campus Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Missing
//! or invalid configuration fails closed to preserve security posture; the
//! signing secret in particular has a minimum length and no default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "campus-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CAMPUS_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Minimum signing secret length in bytes.
pub(crate) const MIN_SECRET_LENGTH: usize = 32;
/// Default access credential lifetime in seconds (one hour).
pub(crate) const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
/// Default refresh credential lifetime in seconds (thirty days).
pub(crate) const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;
/// Default suspicious-activity threshold per origin.
pub(crate) const DEFAULT_SUSPICIOUS_THRESHOLD: u64 = 10;
/// Maximum number of configured super-admin emails.
pub(crate) const MAX_SUPER_ADMIN_EMAILS: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration file exceeds the size limit.
    #[error("config {path} exceeds {limit} bytes")]
    TooLarge {
        /// Offending path.
        path: PathBuf,
        /// Size limit in bytes.
        limit: usize,
    },
    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// A configuration value failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Sections
// ============================================================================

/// Credential signing and lifetime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    pub secret: String,
    /// Access credential lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: i64,
    /// Refresh credential lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: i64,
    /// Emails granted the platform-operator role at login.
    #[serde(default)]
    pub super_admin_emails: Vec<String>,
}

/// Tamper-monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Per-origin suspicious-activity count that raises a WARNING event.
    #[serde(default = "default_suspicious_threshold")]
    pub suspicious_threshold: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            suspicious_threshold: DEFAULT_SUSPICIOUS_THRESHOLD,
        }
    }
}

/// Audit trail settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Optional JSON-lines audit log path; unset keeps records in memory.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

/// Default access lifetime hook for serde.
const fn default_access_ttl() -> i64 {
    DEFAULT_ACCESS_TTL_SECS
}

/// Default refresh lifetime hook for serde.
const fn default_refresh_ttl() -> i64 {
    DEFAULT_REFRESH_TTL_SECS
}

/// Default suspicious threshold hook for serde.
const fn default_suspicious_threshold() -> u64 {
    DEFAULT_SUSPICIOUS_THRESHOLD
}

// ============================================================================
// SECTION: Root Configuration
// ============================================================================

/// Root Campus Gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusGateConfig {
    /// Credential settings.
    pub auth: AuthConfig,
    /// Tamper-monitor settings.
    #[serde(default)]
    pub security: SecurityConfig,
    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl CampusGateConfig {
    /// Loads configuration from the default or env-overridden path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            env::var_os(CONFIG_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from);
        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }
        let config: Self =
            toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values, fail closed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a weak secret, non-positive
    /// lifetimes, a zero threshold, or an oversized operator list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth.secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if self.auth.access_ttl_secs <= 0 {
            return Err(ConfigError::Invalid("auth.access_ttl_secs must be positive".to_string()));
        }
        if self.auth.refresh_ttl_secs <= 0 {
            return Err(ConfigError::Invalid(
                "auth.refresh_ttl_secs must be positive".to_string(),
            ));
        }
        if self.auth.super_admin_emails.len() > MAX_SUPER_ADMIN_EMAILS {
            return Err(ConfigError::Invalid(format!(
                "auth.super_admin_emails exceeds {MAX_SUPER_ADMIN_EMAILS} entries"
            )));
        }
        if self.auth.super_admin_emails.iter().any(|email| !email.contains('@')) {
            return Err(ConfigError::Invalid(
                "auth.super_admin_emails entries must be email addresses".to_string(),
            ));
        }
        if self.security.suspicious_threshold == 0 {
            return Err(ConfigError::Invalid(
                "security.suspicious_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
