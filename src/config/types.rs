//! Configuration type definitions.

use serde::Deserialize;

use super::defaults::{
    default_info_message_ttl_secs, default_mask_ttl_secs, default_mask_universe,
    default_metrics_port, default_operation_timeout_secs, default_queue_capacity,
    default_reveal_panel_ttl_secs, default_true,
};

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Fan-out engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Prometheus metrics endpoint.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Human-readable name, used only in logs.
    pub name: String,
    /// Log format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    pub path: String,
}

/// Fan-out engine tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// The universe of candidate mask strings a group's pool draws from.
    #[serde(default = "default_mask_universe")]
    pub mask_universe: Vec<String>,
    /// Inactivity threshold after which a member's mask may be recycled.
    #[serde(default = "default_mask_ttl_secs")]
    pub mask_ttl_secs: u64,
    /// How long a caller waits for an operation to complete before
    /// surfacing a user-visible timeout. The worker keeps running past this.
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,
    /// How long transient status messages (e.g. "deleting...") stay visible
    /// before being auto-deleted.
    #[serde(default = "default_info_message_ttl_secs")]
    pub info_message_ttl_secs: u64,
    /// How long an ephemeral `/reveal` panel stays visible.
    #[serde(default = "default_reveal_panel_ttl_secs")]
    pub reveal_panel_ttl_secs: u64,
    /// Mailbox capacity for each group's operation queue sender side, used
    /// only for the bounded disconnect-style channels; the operation queue
    /// itself is unbounded.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mask_universe: default_mask_universe(),
            mask_ttl_secs: default_mask_ttl_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
            info_message_ttl_secs: default_info_message_ttl_secs(),
            reveal_panel_ttl_secs: default_reveal_panel_ttl_secs(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Prometheus metrics endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable the `/metrics` HTTP endpoint.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Port to serve metrics on. `0` disables the endpoint (used by tests).
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_metrics_port(),
        }
    }
}
