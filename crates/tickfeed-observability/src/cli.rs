// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! Crates are named as in Cargo.toml (`tickfeed-subscriber`), `all` selects
//! every tickfeed crate, and `TICKFEED_DEBUG` adds more from the environment.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable listing crates to debug (comma-separated, or `all`)
pub const DEBUG_ENV: &str = "TICKFEED_DEBUG";

/// Crates with debug logging enabled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Build flags from bare crate names (`all` enables every known crate)
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = CrateDebugFlags::default();
        for name in names {
            let name = name.as_ref().trim();
            if name == "all" {
                flags.enable_all();
            } else if !name.is_empty() {
                flags.enable(name);
            }
        }
        flags
    }

    /// Add crates named in `TICKFEED_DEBUG`
    pub fn merge_env(mut self) -> Self {
        if let Ok(env_var) = env::var(DEBUG_ENV) {
            let from_env = Self::from_names(env_var.split(','));
            self.enabled_crates.extend(from_env.enabled_crates);
        }
        self
    }

    pub fn enable(&mut self, crate_name: &str) {
        self.enabled_crates.insert(crate_name.to_string());
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Create an `EnvFilter` directive string
    ///
    /// Tracing targets are module paths, so `tickfeed-subscriber` becomes
    /// `tickfeed_subscriber=debug`. `default_level` applies to everything else.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut filters = vec![default_level.to_lowercase()];
        for crate_name in &self.enabled_crates {
            filters.push(format!("{}=debug", crate_name.replace('-', "_")));
        }
        filters.join(",")
    }
}
