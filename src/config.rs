use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::search::SearchOptions;

pub const SUPPORTED_LOCALES: &[&str] = &["en", "ja"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_search_threshold")]
    pub search_threshold: f64,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
    /// 0 keeps the whole learning history.
    #[serde(default)]
    pub history_limit: usize,
    #[serde(default = "default_recent_activity")]
    pub recent_activity: usize,
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_locale() -> String {
    "en".to_string()
}
fn default_data_dir() -> String {
    crate::store::json_store::default_data_dir()
        .to_string_lossy()
        .to_string()
}
fn default_search_threshold() -> f64 {
    0.4
}
fn default_search_limit() -> usize {
    10
}
fn default_max_query_length() -> usize {
    100
}
fn default_recent_activity() -> usize {
    5
}
fn default_color() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            data_dir: default_data_dir(),
            search_threshold: default_search_threshold(),
            search_limit: default_search_limit(),
            max_query_length: default_max_query_length(),
            history_limit: 0,
            recent_activity: default_recent_activity(),
            color: default_color(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Missing file gives the defaults. The result is always validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("parse config {}", path.display()))?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docktutor")
            .join("config.toml")
    }

    /// Clamp numeric fields into range and reset an unknown locale.
    /// Call after deserialization and after applying CLI overrides.
    pub fn validate(&mut self) {
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            tracing::warn!(locale = %self.locale, "unsupported locale, using en");
            self.locale = default_locale();
        }
        if !self.search_threshold.is_finite() {
            self.search_threshold = default_search_threshold();
        }
        self.search_threshold = self.search_threshold.clamp(0.0, 1.0);
        self.search_limit = self.search_limit.clamp(1, 50);
        self.max_query_length = self.max_query_length.clamp(1, 1000);
        self.recent_activity = self.recent_activity.min(50);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            threshold: self.search_threshold,
            limit: self.search_limit,
            max_query_length: self.max_query_length,
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}
