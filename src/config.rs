//! Configuration module for the mechanic shop service.
//!
//! A profile (development, testing or production) is selected through
//! `APP_ENV` and resolved once at startup into a [`Config`] that is passed
//! by reference to whatever needs it.

use std::fmt;
use std::str::FromStr;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming the active profile.
pub const PROFILE_ENV_VAR: &str = "APP_ENV";

const SECRET_KEY_ENV_VAR: &str = "SECRET_KEY";
const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Development,
    Testing,
    Production,
}

impl Profile {
    /// Environment variable holding this profile's database URL.
    pub fn database_url_var(self) -> &'static str {
        match self {
            Profile::Development => "DEV_DATABASE_URL",
            Profile::Testing => "TEST_DATABASE_URL",
            Profile::Production => "DATABASE_URL",
        }
    }

    /// URL used when the profile's variable is unset.
    pub fn default_database_url(self) -> &'static str {
        match self {
            Profile::Development => "sqlite:mechanic_shop.db",
            Profile::Testing => "sqlite::memory:",
            Profile::Production => "sqlite:mechanic_shop.db",
        }
    }

    /// Resolve the database URL through `lookup`, falling back to the
    /// hardcoded default. Empty values count as unset.
    pub fn resolve_database_url<F>(self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(self.database_url_var())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.default_database_url().to_string())
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Development => write!(f, "development"),
            Profile::Testing => write!(f, "testing"),
            Profile::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "default" => Ok(Profile::Development),
            "testing" => Ok(Profile::Testing),
            "production" => Ok(Profile::Production),
            _ => Err(format!("Unknown configuration profile: {}", s)),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub secret_key: String,
    pub debug: bool,
    pub testing: bool,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Whether the URL points at a private in-memory SQLite database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Layered file/environment settings before profile resolution.
#[derive(Debug, Deserialize)]
struct Settings {
    server: ServerConfig,
    database: PoolSettings,
}

#[derive(Debug, Deserialize)]
struct PoolSettings {
    max_connections: u32,
}

impl Config {
    /// Load configuration for the profile named by `APP_ENV`.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SHOP__*, plus the profile's database URL variable)
    /// 2. config/<profile>.toml (if exists)
    /// 3. config/default.toml (if exists)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let profile = match std::env::var(PROFILE_ENV_VAR) {
            Ok(name) => name.parse().map_err(ConfigError::Message)?,
            Err(_) => Profile::default(),
        };

        Self::load_for(profile, |key| std::env::var(key).ok())
    }

    /// Load configuration for an explicit profile, reading profile
    /// variables through `lookup`.
    pub fn load_for<F>(profile: Profile, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings: Settings = ConfigLoader::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000_i64)?
            .set_default("database.max_connections", 5_i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", profile)).required(false))
            .add_source(
                Environment::with_prefix("SHOP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(Self::from_settings(profile, settings, lookup))
    }

    fn from_settings<F>(profile: Profile, settings: Settings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = profile.resolve_database_url(&lookup);
        let secret_key = lookup(SECRET_KEY_ENV_VAR)
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

        Self {
            profile,
            server: settings.server,
            database: DatabaseConfig {
                url,
                max_connections: settings.database.max_connections,
            },
            secret_key,
            debug: profile == Profile::Development,
            testing: profile == Profile::Testing,
        }
    }
}
