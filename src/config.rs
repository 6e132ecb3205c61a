//! Checkout configuration
//! Handles environment variable loading, validation, and defaults.

use crate::checkout::poller::PollPolicy;
use crate::orders::client::OrderApiConfig;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingValue(String),
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Top-level configuration for the checkout confirmation core.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub api: OrderApiConfig,
    pub poll: PollPolicy,
    /// Wait after an in-page synchronous success before trusting the order
    /// record, to absorb webhook latency.
    pub settle_delay: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api: OrderApiConfig::default(),
            poll: PollPolicy::default(),
            settle_delay: Duration::from_millis(2000),
        }
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for everything except the order API base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenv::dotenv().ok();

        let api = OrderApiConfig {
            base_url: env::var("ORDER_API_BASE_URL")
                .map_err(|_| ConfigError::MissingValue("ORDER_API_BASE_URL".to_string()))?,
            bearer_token: env::var("ORDER_API_TOKEN").ok(),
            timeout_secs: env::var("ORDER_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDER_API_TIMEOUT_SECS".to_string()))?,
        };

        let poll = PollPolicy {
            max_attempts: env::var("ORDER_POLL_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDER_POLL_MAX_ATTEMPTS".to_string()))?,
            interval: Duration::from_millis(
                env::var("ORDER_POLL_INTERVAL_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .map_err(|_| {
                        ConfigError::InvalidValue("ORDER_POLL_INTERVAL_MS".to_string())
                    })?,
            ),
        };

        let settle_delay = Duration::from_millis(
            env::var("CHECKOUT_SETTLE_DELAY_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CHECKOUT_SETTLE_DELAY_MS".to_string()))?,
        );

        let config = Self {
            api,
            poll,
            settle_delay,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("ORDER_API_BASE_URL".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "ORDER_API_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if self.poll.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "ORDER_POLL_MAX_ATTEMPTS must be greater than zero".to_string(),
            ));
        }
        if self.poll.interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "ORDER_POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
