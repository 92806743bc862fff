//! Application configuration module
//!
//! Configuration is assembled in three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file named by `MASAGENA_CONFIG`
//! 3. Environment variables (`SERVER_PORT`, `BIND_ADDR`, `DATABASE_URL`,
//!    `ERROR_POLICY`, `SESSION_LIFETIME_MINUTES`, `SESSION_SECURE_COOKIE`,
//!    `RUST_LOG`)
//!
//! # Example file
//!
//! ```toml
//! bind_addr = "0.0.0.0:8000"
//! error_policy = "compat"
//!
//! [[seed.users]]
//! name = "Admin"
//! email = "admin@masagena.test"
//! password = "12345678"
//! roles = ["Admin"]
//!
//! [[seed.notifications]]
//! email = "admin@masagena.test"
//! message = "New order received"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suffix appended to the user's name when naming a bearer token
pub const DEFAULT_TOKEN_SUFFIX: &str = "Masagena@@";
/// Name of the session cookie
pub const DEFAULT_SESSION_COOKIE: &str = "masagena_session";
/// Idle session lifetime
pub const DEFAULT_SESSION_LIFETIME_MINUTES: u32 = 120;
/// bcrypt cost used when hashing seeded passwords
pub const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOG_FILTER: &str = "info";

/// How handler errors are rendered to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Each error kind gets its own status code and a `{"message"}` body
    #[default]
    Strict,
    /// Errors collapse into the endpoint's catch-all status with a
    /// `{"msg"}` body, matching the legacy API byte for byte
    Compat,
}

impl FromStr for ErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "compat" => Ok(Self::Compat),
            other => Err(ConfigError::InvalidValue {
                key: "error_policy",
                value: other.to_string(),
            }),
        }
    }
}

/// A user created in the in-memory store at startup
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A notification created in the in-memory store at startup
#[derive(Debug, Clone, Deserialize)]
pub struct SeedNotification {
    /// Email of the recipient, must match a seeded user
    pub email: String,
    #[serde(rename = "type", default = "default_notification_type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

fn default_notification_type() -> String {
    "App\\Notifications\\AdminNotification".to_string()
}

/// Seed data for the in-memory store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub notifications: Vec<SeedNotification>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Error rendering policy
    pub error_policy: ErrorPolicy,
    /// Session cookie name
    pub session_cookie: String,
    /// Idle lifetime of a session, in minutes
    pub session_lifetime_minutes: u32,
    /// Whether cookies carry the `Secure` attribute
    pub secure_cookies: bool,
    /// Suffix of bearer token names
    pub token_suffix: String,
    /// bcrypt cost for seeded passwords
    pub bcrypt_cost: u32,
    /// `tracing-subscriber` filter directive
    pub log_filter: String,
    /// Seed data for the in-memory store
    pub seed: SeedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3000))),
            database_url: None,
            error_policy: ErrorPolicy::default(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            session_lifetime_minutes: DEFAULT_SESSION_LIFETIME_MINUTES,
            secure_cookies: false,
            token_suffix: DEFAULT_TOKEN_SUFFIX.to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the config file (if any) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(path) = std::env::var("MASAGENA_CONFIG") {
            builder = builder.merge_file(Path::new(&path))?;
        }
        builder.merge_env(|key| std::env::var(key).ok())?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_suffix.is_empty() {
            return Err(ConfigError::MissingValue("token_suffix"));
        }
        if self.session_cookie.is_empty()
            || !self
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::InvalidValue {
                key: "session_cookie",
                value: self.session_cookie.clone(),
            });
        }
        if self.session_lifetime_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session_lifetime_minutes",
                value: "0".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                value: self.bcrypt_cost.to_string(),
            });
        }
        for notification in &self.seed.notifications {
            if !self.seed.users.iter().any(|u| u.email == notification.email) {
                return Err(ConfigError::InvalidValue {
                    key: "seed.notifications.email",
                    value: notification.email.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Shape of the optional TOML file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind_addr: Option<SocketAddr>,
    database_url: Option<String>,
    error_policy: Option<ErrorPolicy>,
    session_cookie: Option<String>,
    session_lifetime_minutes: Option<u32>,
    secure_cookies: Option<bool>,
    token_suffix: Option<String>,
    bcrypt_cost: Option<u32>,
    log_filter: Option<String>,
    #[serde(default)]
    seed: SeedConfig,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the bind address
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    /// Set the error rendering policy
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// Set the session lifetime in minutes
    pub fn session_lifetime_minutes(mut self, minutes: u32) -> Self {
        self.config.session_lifetime_minutes = minutes;
        self
    }

    /// Mark cookies `Secure`
    pub fn secure_cookies(mut self, secure: bool) -> Self {
        self.config.secure_cookies = secure;
        self
    }

    /// Set the bcrypt cost used for seeded passwords
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    /// Set the seed data
    pub fn seed(mut self, seed: SeedConfig) -> Self {
        self.config.seed = seed;
        self
    }

    /// Overlay values from a TOML file
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&contents)
    }

    /// Overlay values from TOML text
    pub fn merge_toml(mut self, contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents)?;
        let config = &mut self.config;

        if let Some(v) = file.bind_addr {
            config.bind_addr = v;
        }
        if let Some(v) = file.database_url {
            config.database_url = Some(v);
        }
        if let Some(v) = file.error_policy {
            config.error_policy = v;
        }
        if let Some(v) = file.session_cookie {
            config.session_cookie = v;
        }
        if let Some(v) = file.session_lifetime_minutes {
            config.session_lifetime_minutes = v;
        }
        if let Some(v) = file.secure_cookies {
            config.secure_cookies = v;
        }
        if let Some(v) = file.token_suffix {
            config.token_suffix = v;
        }
        if let Some(v) = file.bcrypt_cost {
            config.bcrypt_cost = v;
        }
        if let Some(v) = file.log_filter {
            config.log_filter = v;
        }
        config.seed.users.extend(file.seed.users);
        config.seed.notifications.extend(file.seed.notifications);

        Ok(self)
    }

    /// Overlay values from environment variables, read through `lookup`
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = &mut self.config;

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = parse_value("BIND_ADDR", &addr)?;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.bind_addr.set_port(parse_value("SERVER_PORT", &port)?);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            config.database_url = Some(url);
        }
        if let Some(policy) = lookup("ERROR_POLICY") {
            config.error_policy = policy.parse()?;
        }
        if let Some(minutes) = lookup("SESSION_LIFETIME_MINUTES") {
            config.session_lifetime_minutes = parse_value("SESSION_LIFETIME_MINUTES", &minutes)?;
        }
        if let Some(secure) = lookup("SESSION_SECURE_COOKIE") {
            config.secure_cookies = parse_value("SESSION_SECURE_COOKIE", &secure)?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
