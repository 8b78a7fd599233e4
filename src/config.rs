#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use tracing::Level;

use crate::types::AcademicLevel;

/// Address the API server listens on when `SHULE_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration shared across the crate.
#[derive(Debug)]
pub struct ConfigState {
    /// Socket address for the API server.
    bind_addr:     String,
    /// Maximum level emitted by the fmt subscriber.
    log_level:     Level,
    /// Level the CLI assumes when none is given.
    default_level: AcademicLevel,
}

impl ConfigState {
    /// Construct a new configuration instance from the environment.
    fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construct a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = read("SHULE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let log_level = match read("SHULE_LOG_LEVEL") {
            Some(value) => value
                .parse::<Level>()
                .with_context(|| format!("SHULE_LOG_LEVEL has an invalid value: {value}"))?,
            None => Level::INFO,
        };

        let default_level = match read("SHULE_DEFAULT_LEVEL") {
            Some(value) => value
                .parse::<AcademicLevel>()
                .context("SHULE_DEFAULT_LEVEL is not a recognised academic level")?,
            None => AcademicLevel::OLevel,
        };

        Ok(Self {
            bind_addr,
            log_level,
            default_level,
        })
    }

    /// Returns the API server bind address.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Returns the configured log level.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Returns the academic level used when the CLI is not given one.
    pub fn default_level(&self) -> AcademicLevel {
        self.default_level
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone, Debug)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let mut guard = slot().lock().expect("config slot poisoned");
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(ConfigState::new()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}
