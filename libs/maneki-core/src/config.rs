use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    /// Conservative fixed timeout at the remote-call boundary. A single
    /// error surfaces on timeout; there are no automatic retries.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("STORE_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let api_token = env::var("STORE_API_TOKEN").context("STORE_API_TOKEN is not set")?;
        let request_timeout = env::var("STORE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        Ok(Self {
            api_base_url,
            api_token,
            request_timeout,
        })
    }
}
