use anyhow::{Context, Result};
use std::net::SocketAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite:./invoicedash.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_RATE_LIMIT_BURST: u32 = 30;
const DEFAULT_RATE_LIMIT_PERIOD_SECS: u64 = 2;

/// Per client IP: `burst` requests up front, one more every `period_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub burst: u32,
    pub period_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub rate_limit: Option<RateLimit>,
}

impl Default for Config {
    /// In-memory SQLite, no rate limiting. Used by tests and tooling.
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            rate_limit: None,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;

        let burst = match get("RATE_LIMIT_BURST") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .context("RATE_LIMIT_BURST must be a non-negative integer")?,
            None => DEFAULT_RATE_LIMIT_BURST,
        };
        let period_secs = match get("RATE_LIMIT_PERIOD_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .context("RATE_LIMIT_PERIOD_SECS must be a positive integer")?,
            None => DEFAULT_RATE_LIMIT_PERIOD_SECS,
        };
        if period_secs == 0 {
            anyhow::bail!("RATE_LIMIT_PERIOD_SECS must be greater than 0");
        }

        let rate_limit = (burst > 0).then_some(RateLimit { burst, period_secs });

        Ok(Self {
            database_url,
            bind_addr,
            rate_limit,
        })
    }
}
