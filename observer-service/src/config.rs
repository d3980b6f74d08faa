// Copyright (C) 2026 StarHuntingGames
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;

use anyhow::{Context, bail};
use observer_common::{DEFAULT_CACHE_NAMESPACE, expand_env_vars};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Dynamodb,
    None,
}

impl CacheBackend {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dynamodb" => Ok(Self::Dynamodb),
            "none" | "null" => Ok(Self::None),
            other => bail!("unknown cache backend {other:?} (expected memory, dynamodb or none)"),
        }
    }
}

/// Service settings: defaults, then the optional YAML file named by
/// `OBSERVER_CONFIG_PATH`, then individual environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub bind: String,
    pub replays_dir: PathBuf,
    pub cache_namespace: String,
    pub auth_strict: bool,
    pub cache_backend: CacheBackend,
    pub cache_table: String,
    pub upstream_base_url: String,
    pub upstream_timeout_seconds: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8088".to_string(),
            replays_dir: PathBuf::from("./replays"),
            cache_namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            auth_strict: false,
            cache_backend: CacheBackend::Memory,
            cache_table: "replay_observer_cache".to_string(),
            upstream_base_url: "http://spectator.euw1.lol.riotgames.com:80".to_string(),
            upstream_timeout_seconds: 5,
        }
    }
}

impl ObserverConfig {
    pub fn load() -> anyhow::Result<Self> {
        let lookup = |name: &str| std::env::var(name).ok();
        let mut config = match lookup("OBSERVER_CONFIG_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// A missing file falls back to defaults; an unreadable or malformed one
    /// stops startup, since it may carry `auth_strict`.
    fn from_yaml_file(path: &str) -> anyhow::Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path, "observer config file not found; using defaults");
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read observer config {path}"));
            }
        };

        let config = Self::from_yaml_str(&raw)
            .with_context(|| format!("failed to parse observer config {path}"))?;
        info!(path = %path, "loaded observer config from YAML");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let expanded = expand_env_vars(raw);
        serde_yaml::from_str(&expanded).context("invalid observer config yaml")
    }

    /// Overrides settings with the environment variables that are set.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(value) = lookup("OBSERVER_BIND") {
            self.bind = value;
        }
        if let Some(value) = lookup("REPLAYS_DIR") {
            self.replays_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("OBSERVER_CACHE_NAMESPACE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            self.cache_namespace = value;
        }
        if let Some(value) = lookup("OBSERVER_AUTH_STRICT") {
            self.auth_strict = parse_flag(&value)
                .with_context(|| format!("invalid OBSERVER_AUTH_STRICT {value:?}"))?;
        }
        if let Some(value) = lookup("OBSERVER_CACHE_BACKEND") {
            self.cache_backend = CacheBackend::parse(&value)?;
        }
        if let Some(value) = lookup("OBSERVER_CACHE_TABLE") {
            self.cache_table = value;
        }
        if let Some(value) = lookup("UPSTREAM_SPECTATOR_BASE_URL") {
            self.upstream_base_url = value;
        }
        if let Some(value) = lookup("UPSTREAM_TIMEOUT_SECONDS") {
            self.upstream_timeout_seconds = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .with_context(|| format!("invalid UPSTREAM_TIMEOUT_SECONDS {value:?}"))?;
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
