//! Gateway client configuration.
//!
//! Configuration can be loaded from:
//! - A TOML configuration file
//! - Code, via struct literals over the defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::dispatch::ExecutionPolicy;

/// Gateway client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway URL to connect to.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Authentication token presented on identify and resume.
    #[serde(default)]
    pub token: String,

    /// Identify handshake parameters.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Reconnect behavior.
    #[serde(default)]
    pub reconnect: ReconnectConfig,

    /// Heartbeat behavior.
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    /// Handler execution behavior.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Outbound token gates.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Identify handshake parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Member-count threshold above which offline members are withheld.
    #[serde(default = "default_large_threshold")]
    pub large_threshold: u32,

    /// `[shard_id, shard_count]` pair for sharded connections.
    #[serde(default)]
    pub shard: Option<[u32; 2]>,

    /// Event-group subscription bitmask, when the service uses one.
    #[serde(default)]
    pub intents: Option<u64>,
}

/// Reconnect behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Whether transport loss triggers automatic reconnection.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// First retry delay in milliseconds; doubles per failed attempt.
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Retry delay ceiling in milliseconds.
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

/// Heartbeat behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    /// Interval used when the server's hello omits one, in milliseconds.
    #[serde(default = "default_heartbeat_interval")]
    pub fallback_interval_ms: u64,
}

/// Handler execution behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Whether handlers run inline on the read path or on their own
    /// tasks.
    #[serde(default)]
    pub policy: ExecutionPolicy,
}

/// Outbound token gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Identify attempts allowed per window.
    #[serde(default = "default_identify_limit")]
    pub identify_limit: u32,

    /// Identify window length in milliseconds.
    #[serde(default = "default_identify_window")]
    pub identify_window_ms: u64,
}

// Default value functions
fn default_gateway_url() -> String {
    "ws://127.0.0.1:8080/gateway".to_string()
}

fn default_true() -> bool {
    true
}

fn default_large_threshold() -> u32 {
    250
}

fn default_initial_backoff() -> u64 {
    1_000 // 1 second
}

fn default_max_backoff() -> u64 {
    600_000 // 10 minutes
}

fn default_heartbeat_interval() -> u64 {
    45_000 // 45 seconds
}

fn default_identify_limit() -> u32 {
    1
}

fn default_identify_window() -> u64 {
    5_000 // 5 seconds
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            token: String::new(),
            identity: IdentityConfig::default(),
            reconnect: ReconnectConfig::default(),
            heartbeat: HeartbeatConfig::default(),
            dispatch: DispatchConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            large_threshold: default_large_threshold(),
            shard: None,
            intents: None,
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            fallback_interval_ms: default_heartbeat_interval(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            identify_limit: default_identify_limit(),
            identify_window_ms: default_identify_window(),
        }
    }
}

impl GatewayConfig {
    /// Build a configuration with just a token, defaults elsewhere.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: GatewayConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Fallback heartbeat interval as a [`Duration`].
    #[must_use]
    pub fn fallback_heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat.fallback_interval_ms)
    }

    /// Identify gate window as a [`Duration`].
    #[must_use]
    pub fn identify_window(&self) -> Duration {
        Duration::from_millis(self.limits.identify_window_ms)
    }
}
