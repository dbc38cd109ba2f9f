//! Runtime configuration for the thread store and its calling layer.
//!
//! Values come from defaults, then environment variables, then CLI flags.
//!
//! | Variable                     | Meaning                                   |
//! |------------------------------|-------------------------------------------|
//! | `THREADSTORE_MAX_BODY_SIZE`  | Maximum post body size in bytes           |
//! | `THREADSTORE_LATENCY_MS`     | Artificial delay before each mutation     |

use crate::error::{Result, ThreadError};
use crate::forum::constants::{
    DEFAULT_LATENCY_MS, DEFAULT_MAX_BODY_SIZE, MAX_BODY_SIZE_LIMIT, MAX_LATENCY_MS,
};
use std::time::Duration;

/// Environment variable overriding the maximum body size.
pub const ENV_MAX_BODY_SIZE: &str = "THREADSTORE_MAX_BODY_SIZE";

/// Environment variable overriding the client latency.
pub const ENV_LATENCY_MS: &str = "THREADSTORE_LATENCY_MS";

/// Store and client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum post body size in bytes, measured after trimming.
    pub max_body_size: usize,
    /// Delay the async client waits before applying each mutation.
    pub latency: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
        }
    }
}

impl StoreConfig {
    /// Builds a configuration from defaults overridden by the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MAX_BODY_SIZE) {
            config = config.with_max_body_size(parse_number(ENV_MAX_BODY_SIZE, &value)?)?;
        }
        if let Some(value) = lookup(ENV_LATENCY_MS) {
            config = config.with_latency_ms(parse_number(ENV_LATENCY_MS, &value)?)?;
        }
        Ok(config)
    }

    /// Sets the maximum body size.
    pub fn with_max_body_size(mut self, size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BODY_SIZE_LIMIT {
            return Err(ThreadError::config(format!(
                "max body size must be between 1 and {} bytes, got {}",
                MAX_BODY_SIZE_LIMIT, size
            )));
        }
        self.max_body_size = size;
        Ok(self)
    }

    /// Sets the client latency in milliseconds.
    pub fn with_latency_ms(mut self, millis: u64) -> Result<Self> {
        if millis > MAX_LATENCY_MS {
            return Err(ThreadError::config(format!(
                "latency must be at most {} ms, got {}",
                MAX_LATENCY_MS, millis
            )));
        }
        self.latency = Duration::from_millis(millis);
        Ok(self)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ThreadError::config(format!("{} must be a number, got {:?}", key, value)))
}
