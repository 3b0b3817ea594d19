//! Server settings loaded via OrthoConfig (`TRACKER_*` environment
//! variables, configuration file or command-line flags).

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRACKER")]
pub struct TrackerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Absent means the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
}

impl TrackerSettings {
    /// Parse the configured listen address, falling back to the default.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid TRACKER_BIND_ADDR '{raw}': {err}"),
            )
        })
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
