//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bootstrap
//! server. All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP/HTTPS listener addresses and TLS material.
    pub listener: ListenerConfig,

    /// Accept loop tuning.
    pub accept: AcceptConfig,

    /// Optional raw TCP listener.
    pub tcp: Option<TcpConfig>,

    /// Optional UDP socket.
    pub udp: Option<UdpConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener group configuration.
///
/// Either address may be left out to disable that protocol. An empty string
/// counts as "not set".
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plain HTTP bind address (e.g., "0.0.0.0:8080").
    pub plain_address: Option<String>,

    /// HTTPS bind address (e.g., "0.0.0.0:8443").
    pub tls_address: Option<String>,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            plain_address: Some("0.0.0.0:8080".to_string()),
            tls_address: None,
            cert_path: String::new(),
            key_path: String::new(),
        }
    }
}

impl ListenerConfig {
    /// Plain address, if set and non-empty.
    pub fn plain(&self) -> Option<&str> {
        non_empty(&self.plain_address)
    }

    /// TLS address, if set and non-empty.
    pub fn tls(&self) -> Option<&str> {
        non_empty(&self.tls_address)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accept loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AcceptConfig {
    /// First retry delay after a transient accept error, in milliseconds.
    pub min_delay_ms: u64,

    /// Upper bound for the retry delay, in milliseconds.
    pub max_delay_ms: u64,

    /// Value applied to `TCP_NODELAY` on every accepted connection.
    pub nodelay: bool,
}

impl Default for AcceptConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 5,
            max_delay_ms: 1000,
            nodelay: false,
        }
    }
}

impl AcceptConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Raw TCP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TcpConfig {
    /// Bind address.
    pub address: String,
}

/// UDP socket configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UdpConfig {
    /// Bind address.
    pub address: String,

    /// Requested size for both the receive and send buffers.
    #[serde(default = "default_udp_buffer")]
    pub buffer_bytes: usize,
}

fn default_udp_buffer() -> usize {
    4 * 1024 * 1024
}

/// Timeout configuration for HTTP serving.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_addresses_count_as_unset() {
        let config = ListenerConfig {
            plain_address: Some("  ".into()),
            tls_address: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.plain(), None);
        assert_eq!(config.tls(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [accept]
            nodelay = true
            "#,
        )
        .unwrap();
        assert!(config.accept.nodelay);
        assert_eq!(config.accept.min_delay(), Duration::from_millis(5));
        assert_eq!(config.accept.max_delay(), Duration::from_secs(1));
        assert_eq!(config.listener.plain(), Some("0.0.0.0:8080"));
        assert!(config.udp.is_none());
    }

    #[test]
    fn udp_buffer_defaults_when_omitted() {
        let config: ServerConfig = toml::from_str(
            r#"
            [udp]
            address = "127.0.0.1:0"
            "#,
        )
        .unwrap();
        assert_eq!(config.udp.unwrap().buffer_bytes, 4 * 1024 * 1024);
    }
}
