//! Tracing setup for the mechanic shop service.
//!
//! The active profile picks the output format and, when `RUST_LOG` is unset,
//! the default verbosity: production emits JSON lines for log shippers,
//! development gets readable multi-line output with SQL statements, and
//! testing stays compact.

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use crate::config::{Config, Profile};

/// How log events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Production => LogFormat::Json,
            Profile::Development => LogFormat::Pretty,
            Profile::Testing => LogFormat::Compact,
        }
    }
}

/// Filter directive used when `RUST_LOG` is not set.
///
/// Debug builds of the config also surface every statement sqlx runs.
pub fn default_directive(config: &Config) -> String {
    let level = if config.debug { "debug" } else { "info" };
    let sql = if config.debug { "info" } else { "warn" };
    format!("mechanic_shop={level},tower_http={level},sqlx={sql}")
}

/// Install the global subscriber for `config`'s profile.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &Config) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let layer = match LogFormat::for_profile(config.profile) {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_target(true).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).try_init()
}

/// Initialize tracing for tests (human-readable format, no JSON).
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("mechanic_shop=debug")
        .try_init();
}
