// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, then
//! `CE_*` environment variables. CLI flags are applied on top by `main`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CE";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the migration files
    pub migrations_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from("migrations"),
            log_level: "info".to_string(),
        }
    }
}

/// Default config file location for this platform
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "electric-capital", "crypto-ecosystems")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration
///
/// An explicit `path` must exist; the platform default file is optional.
///
/// # Errors
///
/// Fails when a file is unreadable or a value has the wrong type.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();

    let file = match path {
        Some(p) => Some(config::File::from(p.to_path_buf()).required(true)),
        None => default_path().map(|p| config::File::from(p).required(false)),
    };

    let mut builder = config::Config::builder()
        .set_default("migrations_dir", defaults.migrations_dir.to_string_lossy().into_owned())?
        .set_default("log_level", defaults.log_level)?;
    if let Some(file) = file {
        builder = builder.add_source(file);
    }
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

    builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
