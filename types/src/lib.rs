//! Shared configuration types for the Presage service.
//!
//! Kept free of logic so both the core crate and the service binary can
//! depend on it without pulling in the runtime stack.

use serde::{Deserialize, Serialize};

/// Service configuration, loaded from the platform config directory and
/// overridable through environment variables at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Maximum forward offset from the current source number within which a
    /// table entry may be selected for prediction.
    pub trigger_distance: u64,

    /// A pending prediction expires once the source feed passes
    /// `predicted_number + prediction_timeout` without resolving it.
    pub prediction_timeout: u64,

    /// Seconds between filler announcements while paused.
    pub filler_interval_secs: u64,

    /// Seconds between auto-resume deadline checks.
    pub auto_resume_tick_secs: u64,

    /// Identity of the administrator on the command channel.
    pub admin_id: i64,

    /// Identity of the inbound (source) feed.
    pub source_feed_id: i64,

    /// Identity of the outbound (announcement) feed.
    pub announce_feed_id: i64,

    /// Listen port for the liveness endpoint.
    pub health_port: u16,

    /// Override for the lookup-table store location. Empty means the
    /// platform data directory.
    pub table_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            trigger_distance: 2,
            prediction_timeout: 10,
            filler_interval_secs: 300,
            auto_resume_tick_secs: 30,
            admin_id: 0,
            source_feed_id: 0,
            announce_feed_id: 0,
            health_port: 10000,
            table_path: String::new(),
        }
    }
}

impl ServiceConfig {
    /// Apply environment overrides (deployment platforms inject these).
    ///
    /// `PRESAGE_ADMIN_ID`, `PRESAGE_SOURCE_FEED`, `PRESAGE_ANNOUNCE_FEED`
    /// and `PORT` take priority over the config file when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(id) = env_i64("PRESAGE_ADMIN_ID") {
            self.admin_id = id;
        }
        if let Some(id) = env_i64("PRESAGE_SOURCE_FEED") {
            self.source_feed_id = id;
        }
        if let Some(id) = env_i64("PRESAGE_ANNOUNCE_FEED") {
            self.announce_feed_id = id;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            self.health_port = port;
        }
        self
    }
}

fn env_i64(name: &str) -> Option<i64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
