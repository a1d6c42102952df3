//! Server configuration with environment variable overrides.
//!
//! Loading flow: start from compiled defaults, then apply `TILLER_*`
//! environment variables. Each variable has strict parsing rules — integers
//! must be valid and within range, and invalid values are silently ignored,
//! falling back to the default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the panel server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Directory of pre-provisioned static client assets. May be absent;
    /// the panel protocol works without it.
    pub assets_dir: PathBuf,
    /// Maximum concurrent WebSocket clients.
    pub max_clients: usize,
    /// Per-client outbound queue depth before messages are dropped.
    pub client_queue_capacity: usize,
    /// Router inbox depth for gateway notifications and commands.
    pub inbox_capacity: usize,
    /// Interval between server-initiated Ping frames, in seconds.
    pub heartbeat_interval_secs: u64,
    /// Disconnect a client silent for this long, in seconds.
    pub heartbeat_timeout_secs: u64,
    /// Max inbound WebSocket message size in bytes.
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            assets_dir: PathBuf::from("assets"),
            max_clients: 16,
            client_queue_capacity: 64,
            inbox_capacity: 256,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 60,
            max_message_size: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Defaults with `TILLER_*` environment overrides applied.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply `TILLER_*` environment variable overrides to this configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = read_string(&get, "TILLER_HOST") {
            self.host = v;
        }
        if let Some(v) = read_u16(&get, "TILLER_PORT") {
            self.port = v;
        }
        if let Some(v) = read_string(&get, "TILLER_ASSETS_DIR") {
            self.assets_dir = PathBuf::from(v);
        }
        if let Some(v) = read_usize(&get, "TILLER_MAX_CLIENTS", 1, 10_000) {
            self.max_clients = v;
        }
        if let Some(v) = read_usize(&get, "TILLER_CLIENT_QUEUE", 1, 65_536) {
            self.client_queue_capacity = v;
        }
        if let Some(v) = read_usize(&get, "TILLER_INBOX", 1, 65_536) {
            self.inbox_capacity = v;
        }
        if let Some(v) = read_u64(&get, "TILLER_HEARTBEAT_INTERVAL_SECS", 1, 600) {
            self.heartbeat_interval_secs = v;
        }
        if let Some(v) = read_u64(&get, "TILLER_HEARTBEAT_TIMEOUT_SECS", 1, 3_600) {
            self.heartbeat_timeout_secs = v;
        }
        if let Some(v) = read_usize(&get, "TILLER_MAX_MESSAGE_SIZE", 64, 16 * 1024 * 1024) {
            self.max_message_size = v;
        }
    }
}

fn read_string(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    get(name).filter(|v| !v.is_empty())
}

fn read_u16(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u16> {
    get(name).and_then(|v| v.parse::<u16>().ok())
}

fn read_u64(get: &impl Fn(&str) -> Option<String>, name: &str, min: u64, max: u64) -> Option<u64> {
    get(name)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| (min..=max).contains(v))
}

fn read_usize(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    min: usize,
    max: usize,
) -> Option<usize> {
    get(name)
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| (min..=max).contains(v))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_host_and_port() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 0);
    }

    #[test]
    fn default_limits() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.max_clients, 16);
        assert_eq!(cfg.client_queue_capacity, 64);
        assert_eq!(cfg.inbox_capacity, 256);
        assert_eq!(cfg.max_message_size, 64 * 1024);
    }

    #[test]
    fn default_heartbeat() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.heartbeat_interval_secs, 30);
        assert_eq!(cfg.heartbeat_timeout_secs, 60);
    }

    #[test]
    fn default_assets_dir() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.assets_dir, PathBuf::from("assets"));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ServerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host, cfg.host);
        assert_eq!(back.max_clients, cfg.max_clients);
        assert_eq!(back.assets_dir, cfg.assets_dir);
    }

    #[test]
    fn override_valid_port() {
        let mut cfg = ServerConfig::default();
        cfg.apply_overrides(overrides(&[("TILLER_PORT", "8080")]));
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn override_invalid_value_ignored() {
        let mut cfg = ServerConfig::default();
        cfg.apply_overrides(overrides(&[("TILLER_MAX_CLIENTS", "not-a-number")]));
        assert_eq!(cfg.max_clients, 16);
    }

    #[test]
    fn override_out_of_range_ignored() {
        let mut cfg = ServerConfig::default();
        cfg.apply_overrides(overrides(&[("TILLER_HEARTBEAT_INTERVAL_SECS", "0")]));
        assert_eq!(cfg.heartbeat_interval_secs, 30);
    }

    #[test]
    fn override_host_and_assets() {
        let mut cfg = ServerConfig::default();
        cfg.apply_overrides(overrides(&[
            ("TILLER_HOST", "0.0.0.0"),
            ("TILLER_ASSETS_DIR", "/srv/panel"),
        ]));
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.assets_dir, PathBuf::from("/srv/panel"));
    }

    #[test]
    fn empty_string_override_ignored() {
        let mut cfg = ServerConfig::default();
        cfg.apply_overrides(overrides(&[("TILLER_HOST", "")]));
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn several_overrides_at_once() {
        let mut cfg = ServerConfig::default();
        cfg.apply_overrides(overrides(&[
            ("TILLER_MAX_CLIENTS", "4"),
            ("TILLER_CLIENT_QUEUE", "8"),
            ("TILLER_INBOX", "32"),
            ("TILLER_MAX_MESSAGE_SIZE", "1024"),
        ]));
        assert_eq!(cfg.max_clients, 4);
        assert_eq!(cfg.client_queue_capacity, 8);
        assert_eq!(cfg.inbox_capacity, 32);
        assert_eq!(cfg.max_message_size, 1024);
    }

    #[test]
    fn load_without_env_matches_default() {
        // No TILLER_* variables are set in the test environment.
        let cfg = ServerConfig::load();
        assert_eq!(cfg.host, ServerConfig::default().host);
    }
}
