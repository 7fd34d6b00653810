//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// Listener configuration for the public and admin servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address shared by both listeners.
    #[serde(default = "default_host")]
    pub host: String,
    /// Public port serving `GET /links/{id}`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Admin port serving link creation, listing, and uploads.
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,
    /// Maximum accepted upload body in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            admin_port: default_admin_port(),
            max_upload_bytes: default_max_upload(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_admin_port() -> u16 {
    8081
}

fn default_max_upload() -> usize {
    2000 * 1024 * 1024 // 2000 MiB
}

fn default_shutdown_grace() -> u64 {
    10
}
