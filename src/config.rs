//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/tasknet.sqlite"
//!
//! [search]
//! default_limit = 50
//! max_limit = 200
//! excerpt_radius = 60
//! tag_facet_limit = 25
//! per_source_limit = 200
//! isolate_source_failures = true
//!
//! [server]
//! bind = "127.0.0.1:8420"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Only `[db]` is required; every other section falls back to the defaults
//! shown above.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use tasknet_core::search::SearchParams;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
    #[serde(default = "default_excerpt_radius")]
    pub excerpt_radius: usize,
    #[serde(default = "default_tag_facet_limit")]
    pub tag_facet_limit: usize,
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    #[serde(default = "default_isolate")]
    pub isolate_source_failures: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            excerpt_radius: default_excerpt_radius(),
            tag_facet_limit: default_tag_facet_limit(),
            per_source_limit: default_per_source_limit(),
            isolate_source_failures: default_isolate(),
        }
    }
}

impl SearchConfig {
    /// Core search parameters derived from this section.
    pub fn params(&self) -> SearchParams {
        SearchParams {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            excerpt_radius: self.excerpt_radius,
            tag_facet_limit: self.tag_facet_limit,
            per_source_limit: self.per_source_limit,
            isolate_failures: self.isolate_source_failures,
        }
    }
}

fn default_limit() -> i64 {
    50
}
fn default_max_limit() -> i64 {
    200
}
fn default_excerpt_radius() -> usize {
    60
}
fn default_tag_facet_limit() -> usize {
    25
}
fn default_per_source_limit() -> usize {
    200
}
fn default_isolate() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8420".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults used when no config file is available (offline search).
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/tasknet.sqlite"),
            },
            search: SearchConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Check value ranges. Called by [`load_config`].
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.max_limit < 1 {
            anyhow::bail!("search.max_limit must be >= 1");
        }
        if search.default_limit < 1 || search.default_limit > search.max_limit {
            anyhow::bail!(
                "search.default_limit must be in [1, {}] (search.max_limit)",
                search.max_limit
            );
        }
        if search.excerpt_radius == 0 {
            anyhow::bail!("search.excerpt_radius must be > 0");
        }
        if search.tag_facet_limit == 0 {
            anyhow::bail!("search.tag_facet_limit must be > 0");
        }
        if search.per_source_limit == 0 {
            anyhow::bail!("search.per_source_limit must be > 0");
        }
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
