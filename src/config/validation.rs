//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays > 0, buffer sizes > 0)
//! - Check that TLS listeners have their certificate material configured
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - A config with no listener at all is valid; the group is then a no-op

use std::fmt;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let accept = &config.accept;
    if accept.min_delay_ms == 0 {
        errors.push(ValidationError::new("accept.min_delay_ms", "must be greater than 0"));
    }
    if accept.min_delay_ms > accept.max_delay_ms {
        errors.push(ValidationError::new(
            "accept.max_delay_ms",
            format!(
                "must be at least min_delay_ms ({} > {})",
                accept.min_delay_ms, accept.max_delay_ms
            ),
        ));
    }

    if config.listener.tls().is_some() {
        if config.listener.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.cert_path", "required when tls_address is set"));
        }
        if config.listener.key_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.key_path", "required when tls_address is set"));
        }
    }

    if let Some(tcp) = &config.tcp {
        if tcp.address.trim().is_empty() {
            errors.push(ValidationError::new("tcp.address", "must not be empty"));
        }
    }

    if let Some(udp) = &config.udp {
        if udp.address.trim().is_empty() {
            errors.push(ValidationError::new("udp.address", "must not be empty"));
        }
        if udp.buffer_bytes == 0 {
            errors.push(ValidationError::new("udp.buffer_bytes", "must be greater than 0"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ListenerConfig, UdpConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn no_listeners_is_valid() {
        let config = ServerConfig {
            listener: ListenerConfig {
                plain_address: None,
                tls_address: None,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.accept.min_delay_ms = 0;
        config.listener.tls_address = Some("127.0.0.1:8443".into());
        config.udp = Some(UdpConfig {
            address: "127.0.0.1:0".into(),
            buffer_bytes: 0,
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "accept.min_delay_ms",
                "listener.cert_path",
                "listener.key_path",
                "udp.buffer_bytes",
            ]
        );
    }

    #[test]
    fn inverted_delays_rejected() {
        let mut config = ServerConfig::default();
        config.accept.min_delay_ms = 2000;
        config.accept.max_delay_ms = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "accept.max_delay_ms");
    }
}
