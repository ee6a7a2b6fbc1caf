// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so a bad config file can be fixed in
//! one edit rather than one error at a time.

use crate::{ConfigError, ConfigResult, TickfeedConfig};
use std::collections::HashSet;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    InvalidPort { value: String },
    DuplicatePort { value: String },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort { value } => {
                write!(f, "Port '{}' is not a valid TCP port (1-65535)", value)
            }
            Self::DuplicatePort { value } => {
                write!(f, "Port {} is listed more than once", value)
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - At least one port, each a valid TCP port, no duplicates
/// - Non-empty host
/// - Non-negative receive options and a non-zero poll interval
/// - Known log level and format
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &TickfeedConfig) -> ConfigResult<()> {
    report(&collect_errors(config), "Configuration validation failed")
}

/// `Ok` for no errors, otherwise one `ValidationError` listing all of them
pub(crate) fn report(errors: &[ConfigValidationError], heading: &str) -> ConfigResult<()> {
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "{}:\n{}",
        heading, error_messages
    )))
}

/// Every validation problem in `config`, in a stable order
pub fn collect_errors(config: &TickfeedConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    validate_ports(config, &mut errors);
    validate_required_fields(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    errors
}

fn validate_ports(config: &TickfeedConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.subscriber.ports.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "subscriber.ports".to_string(),
        });
        return;
    }

    let mut seen = HashSet::new();
    for value in &config.subscriber.ports {
        match value.trim().parse::<u16>() {
            Ok(port) if port > 0 => {
                if !seen.insert(port) {
                    errors.push(ConfigValidationError::DuplicatePort {
                        value: value.clone(),
                    });
                }
            }
            _ => errors.push(ConfigValidationError::InvalidPort {
                value: value.clone(),
            }),
        }
    }
}

fn validate_required_fields(config: &TickfeedConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.subscriber.ip.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "subscriber.ip".to_string(),
        });
    }
}

fn validate_value_ranges(config: &TickfeedConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.subscriber.receive_buffer < 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "subscriber.receive_buffer".to_string(),
            reason: "must be >= 0".to_string(),
        });
    }
    if config.subscriber.receive_hwm < 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "subscriber.receive_hwm".to_string(),
            reason: "must be >= 0 (0 = unlimited)".to_string(),
        });
    }
    if config.subscriber.poll_interval_ms == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "subscriber.poll_interval_ms".to_string(),
            reason: "must be > 0".to_string(),
        });
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
        });
    }
    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("expected one of {}", LOG_FORMATS.join(", ")),
        });
    }
}
