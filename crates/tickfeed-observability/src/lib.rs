// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # tickfeed-observability
//!
//! Logging setup shared by tickfeed binaries, with per-crate debug flags.
//! Library crates only emit `tracing` events; binaries call [`init_logging`].

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known tickfeed crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "tickfeed",
    "tickfeed-config",
    "tickfeed-subscriber",
    "tickfeed-transports",
];
