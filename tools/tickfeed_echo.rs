// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! tickfeed-echo: print every payload received from one or more publishers
//!
//! Output is one line per message on stdout: the JSON payload, or
//! `topic<TAB>payload` when several topics are given.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

use tickfeed::config::{load_config_or_default, validate_config, TickfeedConfig};
use tickfeed::observability::{init_logging, CrateDebugFlags, LogFormat, LoggingConfig};
use tickfeed::prelude::*;

/// Subscribe to ZMQ publishers and echo decoded payloads as JSON lines
#[derive(Parser, Debug)]
#[command(name = "tickfeed-echo", version, author, long_about = None)]
struct Args {
    /// Path to tickfeed.toml (default: discover from the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Publisher host
    #[arg(long)]
    ip: Option<String>,

    /// Publisher port (repeat for several publishers)
    #[arg(short, long = "port")]
    ports: Vec<String>,

    /// Topic for single-topic mode
    #[arg(short, long)]
    topic: Option<String>,

    /// Topics for multi-topic mode (repeat or comma-separate); output is tagged
    #[arg(long = "topics", value_delimiter = ',')]
    topics: Vec<String>,

    /// Payload frames to keep: last or all
    #[arg(long)]
    payload_mode: Option<String>,

    /// Give up after this many milliseconds without a message (0 = wait forever)
    #[arg(long)]
    receive_timeout_ms: Option<u64>,

    /// Stop after this many messages
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Log level for crates without a debug flag
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long)]
    log_format: Option<String>,

    /// Enable debug logging for a crate (repeatable, e.g. tickfeed-transports)
    #[arg(long = "debug")]
    debug: Vec<String>,

    /// Enable debug logging for every tickfeed crate
    #[arg(long, default_value_t = false)]
    debug_all: bool,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(ip) = &self.ip {
            overrides.insert("ip".to_string(), ip.clone());
        }
        if !self.ports.is_empty() {
            overrides.insert("ports".to_string(), self.ports.join(","));
        }
        if let Some(topic) = &self.topic {
            overrides.insert("topic".to_string(), topic.clone());
        }
        if !self.topics.is_empty() {
            overrides.insert("topics".to_string(), self.topics.join(","));
        }
        if let Some(mode) = &self.payload_mode {
            overrides.insert("payload_mode".to_string(), mode.clone());
        }
        if let Some(timeout) = self.receive_timeout_ms {
            overrides.insert("receive_timeout_ms".to_string(), timeout.to_string());
        }
        if let Some(level) = &self.log_level {
            overrides.insert("log_level".to_string(), level.clone());
        }
        if let Some(format) = &self.log_format {
            overrides.insert("log_format".to_string(), format.clone());
        }
        overrides
    }

    fn debug_flags(&self) -> CrateDebugFlags {
        let mut flags = CrateDebugFlags::from_names(&self.debug);
        if self.debug_all {
            flags.enable_all();
        }
        flags.merge_env()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config_or_default(args.config.as_deref(), Some(&args.overrides()))
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    init_logging(&logging_config(&config)?, &args.debug_flags())?;

    info!(
        "Subscribing to {} on port(s) {}",
        config.subscriber.ip,
        config.subscriber.ports.join(", ")
    );

    let mut subscriber = TopicSubscriber::from_settings(&config.subscriber)
        .context("Failed to create subscriber")?;

    let stop = subscriber.stop_handle();
    ctrlc::set_handler(move || {
        info!("Shutdown signal received...");
        stop.stop();
    })?;

    let result = if config.subscriber.is_multi_topic() {
        echo_tagged(&mut subscriber, &config.subscriber.topics, args.count)
    } else {
        echo(&mut subscriber, args.count)
    };

    subscriber.close()?;
    if let Err(e) = &result {
        error!("Feed ended: {:#}", e);
    }
    result
}

fn logging_config(config: &TickfeedConfig) -> Result<LoggingConfig> {
    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;

    Ok(LoggingConfig {
        level: config.logging.level.clone(),
        format,
    })
}

fn echo(subscriber: &mut TopicSubscriber, count: Option<usize>) -> Result<()> {
    let feed = subscriber.subscribe()?;
    let mut out = io::stdout().lock();

    for payload in feed.take(count.unwrap_or(usize::MAX)) {
        writeln!(out, "{}", payload?)?;
    }
    Ok(())
}

fn echo_tagged(
    subscriber: &mut TopicSubscriber,
    topics: &[String],
    count: Option<usize>,
) -> Result<()> {
    let feed = subscriber.subscribe_topics(topics.iter().cloned())?;
    let mut out = io::stdout().lock();

    for item in feed.take(count.unwrap_or(usize::MAX)) {
        let (topic, payload) = item?;
        writeln!(out, "{}\t{}", topic, payload)?;
    }
    Ok(())
}
