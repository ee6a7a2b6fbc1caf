// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the structs that map to sections in `tickfeed.toml`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TickfeedConfig {
    pub subscriber: SubscriberSettings,
    pub logging: LoggingSettings,
}

/// How many payload frames survive decoding of one message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadMode {
    /// Only the last decoded payload frame is kept
    #[default]
    Last,
    /// Every decoded payload frame is kept, in order, as a JSON array
    All,
}

impl std::str::FromStr for PayloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(Self::Last),
            "all" => Ok(Self::All),
            other => Err(format!("unknown payload mode '{}' (expected last or all)", other)),
        }
    }
}

/// Subscriber connection and receive settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubscriberSettings {
    /// Host shared by every port
    pub ip: String,
    /// Publisher ports on `ip`, connected in order
    pub ports: Vec<String>,
    /// Default single-topic filter
    pub topic: String,
    /// Multi-topic filters; non-empty switches consumers to tagged output
    pub topics: Vec<String>,
    /// Receive buffer in bytes (single-topic path only)
    pub receive_buffer: i32,
    /// Receive high water mark, 0 = unlimited (single-topic path only)
    pub receive_hwm: i32,
    /// Give up after this long without a message, 0 = wait forever
    pub receive_timeout_ms: u64,
    /// How often a blocked receive wakes up to check for cancellation
    pub poll_interval_ms: u64,
    pub payload_mode: PayloadMode,
}

impl Default for SubscriberSettings {
    fn default() -> Self {
        Self {
            ip: "192.168.20.101".to_string(),
            ports: vec!["5600".to_string()],
            topic: "ads".to_string(),
            topics: Vec::new(),
            receive_buffer: 200_000,
            receive_hwm: 0,
            receive_timeout_ms: 0,
            poll_interval_ms: 100,
            payload_mode: PayloadMode::Last,
        }
    }
}

impl SubscriberSettings {
    /// Receive timeout, `None` when waiting forever
    pub fn receive_timeout(&self) -> Option<Duration> {
        (self.receive_timeout_ms > 0).then(|| Duration::from_millis(self.receive_timeout_ms))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// True when the multi-topic (tagged) mode is configured
    pub fn is_multi_topic(&self) -> bool {
        !self.topics.is_empty()
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level for every crate (trace, debug, info, warn, error)
    pub level: String,
    /// Console format: text or json
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
