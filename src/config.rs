// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `GRAPHSTEPS_*` environment variables. Command-line flags override all
//! three at the call site.

use crate::runner::DEFAULT_SPEED;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GRAPHSTEPS";

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixture used when neither `--graph` nor `--file` is given;
    /// unset means the algorithm's own default fixture
    pub fixture: Option<String>,
    /// Default start node
    pub start: String,
    /// Default goal node
    pub goal: Option<String>,
    /// Animation speed for `play`
    pub speed: u32,
    /// Colored terminal output
    pub color: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixture: None,
            start: "A".to_string(),
            goal: None,
            speed: DEFAULT_SPEED,
            color: true,
            log_level: "info".to_string(),
        }
    }
}

/// Default settings file location
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hyperpolymath", "graphsteps")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load settings
///
/// An explicit `path` must exist; the default location is optional.
///
/// # Errors
///
/// Fails when an explicit file is missing or any layer holds invalid values.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let file = match path {
        Some(path) => Some((path.to_path_buf(), true)),
        None => default_path().map(|p| (p, false)),
    };

    let mut builder = config::Config::builder();
    if let Some((file, required)) = &file {
        debug!(path = %file.display(), required, "settings file");
        builder = builder.add_source(
            config::File::from(file.as_path())
                .format(config::FileFormat::Toml)
                .required(*required),
        );
    }
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    let settings: Settings = builder
        .build()
        .context("Failed to read settings")?
        .try_deserialize()
        .context("Invalid settings")?;
    Ok(settings)
}
