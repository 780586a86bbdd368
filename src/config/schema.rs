//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Root configuration for the connection core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PoolConfig {
    /// Idle tracking settings.
    pub idle: IdleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Idle connection tracking.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Idle timeout in milliseconds. 0 disables idle tracking.
    pub timeout_ms: u64,

    /// Pending idle-expired connections the collector can buffer.
    pub collector_capacity: usize,
}

impl IdleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            collector_capacity: 64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
