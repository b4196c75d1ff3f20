// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Load-time checking configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up by [`CheckConfig::load`]
pub const CONFIG_FILE: &str = "polytopo.toml";

/// What to do with a mesh after it is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Run the invariant checker on loaded meshes
    pub check_invariants: bool,
    /// Drop isolated vertices and reclaim them right after loading
    pub strip_isolated: bool,
    /// Longest face or boundary loop walked before giving up
    pub max_loop_len: usize,
    /// Verbose output
    pub verbose: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            check_invariants: true,
            strip_isolated: false,
            max_loop_len: 1 << 20,
            verbose: false,
        }
    }
}

impl CheckConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: CheckConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `polytopo.toml` when present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply `POLYTOPO_*` overrides looked up through `var`
    ///
    /// Values that fail to parse leave the setting unchanged.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(verbose) = var("POLYTOPO_VERBOSE") {
            self.verbose = verbose.parse().unwrap_or(self.verbose);
        }

        if let Some(check) = var("POLYTOPO_CHECK") {
            self.check_invariants = check.parse().unwrap_or(self.check_invariants);
        }

        if let Some(max_loop) = var("POLYTOPO_MAX_LOOP") {
            self.max_loop_len = max_loop.parse().unwrap_or(self.max_loop_len);
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
