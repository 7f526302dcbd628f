//! Process-wide settings, read once at startup.

use std::time::Duration;

use crate::error::{AdvisorError, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_MARKET_DATA_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub market_data_base_url: String,
    pub market_data_timeout: Duration,
    pub market_data_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            market_data_base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            market_data_timeout: Duration::from_secs(DEFAULT_MARKET_DATA_TIMEOUT_SECS),
            market_data_api_key: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        let port_var = ["FINADVISOR_PORT", "PORT"]
            .into_iter()
            .find_map(|key| get(key).map(|value| (key, value)));
        if let Some((key, value)) = port_var {
            config.port = value
                .parse()
                .map_err(|_| AdvisorError::invalid(key, format!("{value:?} is not a valid port")))?;
        }

        if let Some(url) = get("MARKET_DATA_BASE_URL") {
            config.market_data_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(value) = get("MARKET_DATA_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| {
                AdvisorError::invalid(
                    "MARKET_DATA_TIMEOUT_SECS",
                    format!("{value:?} is not a whole number of seconds"),
                )
            })?;
            if secs == 0 {
                return Err(AdvisorError::invalid(
                    "MARKET_DATA_TIMEOUT_SECS",
                    "must be > 0",
                ));
            }
            config.market_data_timeout = Duration::from_secs(secs);
        }

        config.market_data_api_key = get("MARKET_DATA_API_KEY");

        Ok(config)
    }
}
