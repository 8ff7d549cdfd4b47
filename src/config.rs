//! Configuration management for Fluxo.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;

/// Main configuration for the Fluxo service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluxoConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,

    /// Cash-flow projection configuration
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Movement store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
        }
    }
}

fn default_http_addr() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Sliding window duration in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Maximum requests allowed per identifier within the window
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,

    /// Entry count above which expired entries are swept
    #[serde(default = "default_sweep_threshold")]
    pub sweep_threshold: usize,

    /// Per-route overrides of the default window/limit
    #[serde(default)]
    pub routes: HashMap<String, LimitRule>,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
            sweep_threshold: default_sweep_threshold(),
            routes: HashMap::new(),
        }
    }
}

/// A rate limit rule as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitRule {
    /// Sliding window duration in milliseconds
    pub window_ms: u64,
    /// Maximum requests allowed within the window
    pub max_requests: u64,
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> u64 {
    10
}

fn default_sweep_threshold() -> usize {
    1000
}

/// Cash-flow projection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Horizon length in days when the request does not specify one
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u32,

    /// Largest horizon a request may ask for
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_horizon_days: default_horizon_days(),
            max_horizon_days: default_max_horizon_days(),
        }
    }
}

fn default_horizon_days() -> u32 {
    30
}

fn default_max_horizon_days() -> u32 {
    365
}

/// Movement store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to a JSON file of movement records loaded at startup
    pub seed_path: Option<String>,
}

impl FluxoConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: FluxoConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::FluxoError::Config(e.to_string()))?;
        Ok(config)
    }
}
