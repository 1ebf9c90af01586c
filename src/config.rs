//! Configuration management

use std::time::Duration;

use anyhow::{self, Context, Result};

use crate::services::tracker::PollPolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog backend base URL
    pub api_base_url: String,

    /// Bearer token for the backend, when it requires one
    pub api_token: Option<String>,

    /// Polling policy; intervals can be overridden from the environment,
    /// everything else is fixed client policy
    pub poll: PollPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("CATALOG_API_URL")
            .context("CATALOG_API_URL must be set")?;

        let api_token = std::env::var("CATALOG_API_TOKEN").ok().filter(|t| !t.is_empty());

        let mut poll = PollPolicy::default();
        if let Some(interval) = read_millis("POLL_INTERVAL_MS")? {
            poll.initial_interval = interval;
        }
        if let Some(max) = read_millis("POLL_MAX_INTERVAL_MS")? {
            poll.max_interval = max;
        }
        if poll.initial_interval > poll.max_interval {
            anyhow::bail!(
                "POLL_INTERVAL_MS ({:?}) must not exceed POLL_MAX_INTERVAL_MS ({:?})",
                poll.initial_interval,
                poll.max_interval
            );
        }

        Ok(Self {
            api_base_url,
            api_token,
            poll,
        })
    }
}

fn read_millis(name: &str) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(raw) => {
            let millis: u64 = raw
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds, got '{}'", name, raw))?;
            Ok(Some(Duration::from_millis(millis)))
        }
        Err(_) => Ok(None),
    }
}
