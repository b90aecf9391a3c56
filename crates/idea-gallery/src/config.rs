use std::str::FromStr;
use std::time::Duration;

use ideas_common::client::IdeasClientConfig;

use crate::error::AppError;

const DEFAULT_PAGE_SIZE: usize = 6;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the spreadsheet-backed endpoint returning the idea list.
    pub api_url: String,
    /// Ideas per gallery page. Fixed for the lifetime of a session.
    pub page_size: usize,
    /// Quiet period before a search input is committed.
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub max_error_body_bytes: usize,
    /// Call-to-action link for submitting new ideas.
    pub submit_url: Option<String>,
    /// Serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `IDEAS_API_URL`
    ///
    /// Optional:
    /// - `IDEAS_PAGE_SIZE` (default: 6)
    /// - `IDEAS_SEARCH_DEBOUNCE_MS` (default: 500)
    /// - `IDEAS_TIMEOUT_SECS` (default: 30)
    /// - `IDEAS_MAX_ERROR_BODY_BYTES` (default: 8192)
    /// - `IDEAS_SUBMIT_URL`
    /// - `MCP_TCP_LISTEN_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_url = get("IDEAS_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::Config("IDEAS_API_URL environment variable is required".to_string())
            })?;

        let page_size = parse_or(&get, "IDEAS_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(AppError::Config(
                "IDEAS_PAGE_SIZE must be greater than zero".to_string(),
            ));
        }

        let debounce_ms = parse_or(&get, "IDEAS_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?;
        let timeout_secs = parse_or(&get, "IDEAS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let max_error_body_bytes =
            parse_or(&get, "IDEAS_MAX_ERROR_BODY_BYTES", DEFAULT_MAX_ERROR_BODY_BYTES)?;

        Ok(Self {
            api_url,
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            max_error_body_bytes,
            submit_url: get("IDEAS_SUBMIT_URL").filter(|s| !s.trim().is_empty()),
            tcp_listen_addr: get("MCP_TCP_LISTEN_ADDR").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn client_config(&self) -> IdeasClientConfig {
        IdeasClientConfig {
            endpoint: self.api_url.clone(),
            timeout: self.request_timeout,
            max_error_body_bytes: self.max_error_body_bytes,
        }
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}"))),
    }
}
