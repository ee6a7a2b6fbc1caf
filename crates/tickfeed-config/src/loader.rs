// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones win:
//! 1. TOML file (base values, defaults for anything missing)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::validation::report;
use crate::{ConfigError, ConfigResult, ConfigValidationError, TickfeedConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "TICKFEED_CONFIG_PATH";

/// Find the tickfeed configuration file
///
/// Search order:
/// 1. `TICKFEED_CONFIG_PATH` environment variable
/// 2. Current working directory: `./tickfeed.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by {} not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<TickfeedConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let config: TickfeedConfig = toml::from_str(&content)?;

    with_overrides(config, cli_args)
}

/// Like [`load_config`], but falls back to built-in defaults when no file is
/// found by discovery
///
/// An explicit `config_path` that does not exist is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<TickfeedConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV).is_err() => {
            with_overrides(TickfeedConfig::default(), cli_args)
        }
        Err(e) => Err(e),
    }
}

fn with_overrides(
    mut config: TickfeedConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<TickfeedConfig> {
    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }
    Ok(config)
}

/// Parse one override value, recording a validation error instead of
/// dropping it when it does not parse
fn parse_override<T>(
    source: &str,
    value: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(ConfigValidationError::InvalidValue {
                field: source.to_string(),
                reason: format!("'{}': {}", value, e),
            });
            None
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `TICKFEED_IP` -> `subscriber.ip`
/// - `TICKFEED_PORTS` -> `subscriber.ports` (comma-separated)
/// - `TICKFEED_TOPIC` -> `subscriber.topic`
/// - `TICKFEED_TOPICS` -> `subscriber.topics` (comma-separated)
/// - `TICKFEED_RECEIVE_BUFFER` -> `subscriber.receive_buffer`
/// - `TICKFEED_RECEIVE_HWM` -> `subscriber.receive_hwm`
/// - `TICKFEED_LOG_LEVEL` -> `logging.level`
/// - `TICKFEED_LOG_FORMAT` -> `logging.format`
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming every variable whose value
/// does not parse; the others are still applied.
pub fn apply_environment_overrides(config: &mut TickfeedConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if let Ok(value) = env::var("TICKFEED_IP") {
        config.subscriber.ip = value;
    }
    if let Ok(value) = env::var("TICKFEED_PORTS") {
        config.subscriber.ports = split_list(&value);
    }
    if let Ok(value) = env::var("TICKFEED_TOPIC") {
        config.subscriber.topic = value;
    }
    if let Ok(value) = env::var("TICKFEED_TOPICS") {
        config.subscriber.topics = split_list(&value);
    }
    if let Ok(value) = env::var("TICKFEED_RECEIVE_BUFFER") {
        if let Some(size) = parse_override("TICKFEED_RECEIVE_BUFFER", &value, &mut errors) {
            config.subscriber.receive_buffer = size;
        }
    }
    if let Ok(value) = env::var("TICKFEED_RECEIVE_HWM") {
        if let Some(hwm) = parse_override("TICKFEED_RECEIVE_HWM", &value, &mut errors) {
            config.subscriber.receive_hwm = hwm;
        }
    }

    if let Ok(value) = env::var("TICKFEED_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("TICKFEED_LOG_FORMAT") {
        config.logging.format = value;
    }

    report(&errors, "Invalid environment override")
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"ip": "10.0.0.1", "ports": "5601,5602"}`)
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming every argument whose value
/// does not parse; the others are still applied.
pub fn apply_cli_overrides(
    config: &mut TickfeedConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if let Some(value) = cli_args.get("ip") {
        config.subscriber.ip = value.clone();
    }
    if let Some(value) = cli_args.get("ports") {
        config.subscriber.ports = split_list(value);
    }
    if let Some(value) = cli_args.get("topic") {
        config.subscriber.topic = value.clone();
    }
    if let Some(value) = cli_args.get("topics") {
        config.subscriber.topics = split_list(value);
    }
    if let Some(value) = cli_args.get("payload_mode") {
        if let Some(mode) = parse_override("payload_mode", value, &mut errors) {
            config.subscriber.payload_mode = mode;
        }
    }
    if let Some(value) = cli_args.get("receive_timeout_ms") {
        if let Some(timeout) = parse_override("receive_timeout_ms", value, &mut errors) {
            config.subscriber.receive_timeout_ms = timeout;
        }
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }

    report(&errors, "Invalid command-line override")
}
