//! # Host configuration.
//!
//! [`Config`] is the external configuration surface: application identity,
//! HTTP server addresses and timeouts, event bus queue capacities, database
//! backends, and log sink selection. The core treats it as opaque input — it
//! is loaded once at startup and handed to the composition root.
//!
//! Loaded from YAML via [`Config::load`]; every section has documented
//! defaults so tests and local runs work without a file.
//!
//! # Example
//! ```
//! use apphost::Config;
//!
//! let cfg = Config::default();
//! assert_eq!(cfg.log.level, "info");
//! assert!(cfg.http_server("data_collection_api").is_some());
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration for the service host.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application identity (name/version/env), for logs only.
    pub application: ApplicationInfo,
    /// One entry per HTTP-serving application.
    pub http_server: Vec<HttpServerConfig>,
    /// One entry per event bus (alias + queue capacity).
    pub event_bus: Vec<EventBusConfig>,
    /// One entry per database backend.
    pub database: Vec<DatabaseConfig>,
    /// Log sink selection.
    pub log: LogConfig,
}

impl Default for Config {
    /// Provides a runnable default: one HTTP server on `127.0.0.1:8080`, one
    /// event bus under the `sample_task` alias, no databases, text logs at
    /// `info`.
    fn default() -> Self {
        Self {
            application: ApplicationInfo::default(),
            http_server: vec![HttpServerConfig::default()],
            event_bus: vec![EventBusConfig::default()],
            database: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Returns the HTTP server section with the given name, if configured.
    pub fn http_server(&self, name: &str) -> Option<&HttpServerConfig> {
        self.http_server.iter().find(|s| s.name == name)
    }

    /// Returns the event bus section with the given alias, if configured.
    pub fn event_bus(&self, alias: &str) -> Option<&EventBusConfig> {
        self.event_bus.iter().find(|b| b.alias == alias)
    }
}

/// Application identity, echoed into the startup log line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationInfo {
    pub name: String,
    pub version: String,
    pub env: String,
}

impl Default for ApplicationInfo {
    fn default() -> Self {
        Self {
            name: "apphost".to_string(),
            version: "0.1.0".to_string(),
            env: "dev".to_string(),
        }
    }
}

/// Settings for one HTTP-serving application.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    /// Application name used to look this section up.
    pub name: String,
    /// Bind address, e.g. `127.0.0.1:8080`.
    pub addr: String,
    /// Graceful-drain budget for `stop`, in seconds.
    pub close_timeout_secs: u64,
    /// Per-request read timeout, in seconds (informational for the transport).
    pub read_timeout_secs: u64,
    /// Per-request write timeout, in seconds (informational for the transport).
    pub write_timeout_secs: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            name: "data_collection_api".to_string(),
            addr: "127.0.0.1:8080".to_string(),
            close_timeout_secs: 10,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
        }
    }
}

impl HttpServerConfig {
    /// Graceful-drain budget as a [`Duration`].
    pub fn close_timeout(&self) -> Duration {
        Duration::from_secs(self.close_timeout_secs)
    }
}

/// Settings for one event bus.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Registry alias the bus is published under.
    pub alias: String,
    /// Capacity of the bounded inbound event queue.
    pub queue_capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            alias: "sample_task".to_string(),
            queue_capacity: 16,
        }
    }
}

/// Settings for one database backend.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
}

/// Log sink selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level filter (`trace`..`error`); `RUST_LOG` overrides it.
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_runnable() {
        let cfg = Config::default();
        assert_eq!(cfg.http_server.len(), 1);
        assert_eq!(cfg.event_bus[0].alias, "sample_task");
        assert_eq!(cfg.event_bus[0].queue_capacity, 16);
        assert!(cfg.database.is_empty());
        assert_eq!(
            cfg.http_server("data_collection_api").unwrap().addr,
            "127.0.0.1:8080"
        );
        assert!(cfg.http_server("nope").is_none());
    }

    #[test]
    fn parses_yaml_sections() {
        let raw = r#"
application:
  name: collector
  env: prod
http_server:
  - name: api
    addr: 0.0.0.0:9000
    close_timeout_secs: 5
event_bus:
  - alias: metrics
    queue_capacity: 128
database:
  - name: main
    host: db.internal
    port: 5432
    user: svc
    database: app
log:
  level: debug
  format: json
"#;
        let cfg: Config = serde_yaml::from_str(raw).unwrap();
        assert_eq!(cfg.application.name, "collector");
        assert_eq!(cfg.application.env, "prod");
        let api = cfg.http_server("api").unwrap();
        assert_eq!(api.addr, "0.0.0.0:9000");
        assert_eq!(api.close_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.event_bus("metrics").unwrap().queue_capacity, 128);
        assert_eq!(cfg.database[0].port, 5432);
        assert_eq!(cfg.log.format, "json");
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join("apphost_config_test.yaml");
        std::fs::write(&path, "log:\n  level: warn\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.log.level, "warn");
        std::fs::remove_file(&path).ok();
    }
}
