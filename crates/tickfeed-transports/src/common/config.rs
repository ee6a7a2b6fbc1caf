// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common configuration types for transports

use serde::{Deserialize, Serialize};

use super::error::{TransportError, TransportResult};

/// Receive buffer applied on the single-topic subscribe path (bytes)
pub const DEFAULT_RECEIVE_BUFFER: i32 = 200_000;

/// Receive high water mark applied on the single-topic subscribe path (0 = unlimited)
pub const DEFAULT_RECEIVE_HWM: i32 = 0;

/// Build a TCP endpoint string from a host and a port
pub fn tcp_endpoint(host: &str, port: &str) -> String {
    format!("tcp://{}:{}", host, port)
}

/// Subscriber (client-side) transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriberConfig {
    /// Endpoints to connect to, all on the same socket
    pub endpoints: Vec<String>,
}

impl SubscriberConfig {
    /// Create a config connecting to a single endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_endpoints(vec![endpoint.into()])
    }

    /// Create a config connecting to every endpoint in order
    pub fn with_endpoints<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
        }
    }

    /// One `tcp://{host}:{port}` endpoint per port, sharing one host
    ///
    /// Ports are kept as strings (that is how callers configure them) but must
    /// parse as non-zero TCP port numbers.
    pub fn from_ports<S: AsRef<str>>(host: &str, ports: &[S]) -> TransportResult<Self> {
        if host.trim().is_empty() {
            return Err(TransportError::InvalidConfig(
                "Host address cannot be empty".to_string(),
            ));
        }
        if ports.is_empty() {
            return Err(TransportError::InvalidConfig(
                "At least one port is required".to_string(),
            ));
        }

        let mut endpoints = Vec::with_capacity(ports.len());
        for port in ports {
            let port = port.as_ref().trim();
            match port.parse::<u16>() {
                Ok(p) if p > 0 => endpoints.push(tcp_endpoint(host, port)),
                _ => {
                    return Err(TransportError::InvalidConfig(format!(
                        "Invalid port '{}'",
                        port
                    )))
                }
            }
        }

        Ok(Self::with_endpoints(endpoints))
    }

    /// Validate configuration
    pub fn validate(&self) -> TransportResult<()> {
        if self.endpoints.is_empty() {
            return Err(TransportError::InvalidConfig(
                "At least one endpoint is required".to_string(),
            ));
        }

        if let Some(empty) = self.endpoints.iter().position(|e| e.trim().is_empty()) {
            return Err(TransportError::InvalidConfig(format!(
                "Endpoint #{} is empty",
                empty
            )));
        }

        Ok(())
    }
}

/// Socket options that bound (or unbound) receive-side queueing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveTuning {
    /// Kernel receive buffer size in bytes
    pub receive_buffer: i32,

    /// Queued-message limit (0 = unlimited)
    pub receive_hwm: i32,
}

impl Default for ReceiveTuning {
    fn default() -> Self {
        Self {
            receive_buffer: DEFAULT_RECEIVE_BUFFER,
            receive_hwm: DEFAULT_RECEIVE_HWM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ports_builds_tcp_endpoints() {
        let config = SubscriberConfig::from_ports("10.0.0.5", &["5601", "5602", "5603"]).unwrap();
        assert_eq!(
            config.endpoints,
            vec![
                "tcp://10.0.0.5:5601",
                "tcp://10.0.0.5:5602",
                "tcp://10.0.0.5:5603"
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_ports_rejects_empty_and_bad_ports() {
        let empty: [&str; 0] = [];
        assert!(SubscriberConfig::from_ports("127.0.0.1", &empty).is_err());
        assert!(SubscriberConfig::from_ports("127.0.0.1", &["abc"]).is_err());
        assert!(SubscriberConfig::from_ports("127.0.0.1", &["0"]).is_err());
        assert!(SubscriberConfig::from_ports("127.0.0.1", &["70000"]).is_err());
        assert!(SubscriberConfig::from_ports("", &["5600"]).is_err());
    }

    #[test]
    fn test_validate_rejects_blank_endpoint() {
        let config = SubscriberConfig::with_endpoints(["tcp://127.0.0.1:5600", " "]);
        assert!(matches!(
            config.validate(),
            Err(TransportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_tuning_is_unbounded() {
        let tuning = ReceiveTuning::default();
        assert_eq!(tuning.receive_buffer, 200_000);
        assert_eq!(tuning.receive_hwm, 0);
    }
}
