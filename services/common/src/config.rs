//! Upstream endpoint and client configuration

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};

/// Upstream service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    /// Base URL of the Binance-compatible REST price feed
    pub price_feed: String,
    /// Base URL of the OpenAI-compatible advisory oracle
    pub advisory: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            price_feed: "https://api.binance.com".to_string(),
            advisory: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Advisory oracle client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleClientConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Bearer token; calls fail over to the advisory fallback when absent
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for OracleClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ServiceEndpoints::default().advisory,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Price feed client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedClientConfig {
    /// Base URL, e.g. `https://api.binance.com`
    pub endpoint: String,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ServiceEndpoints::default().price_feed,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
