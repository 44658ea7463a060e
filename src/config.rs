use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::theme::{is_known_theme, parse_color};

pub const DEFAULT_READY_MESSAGE: &str = "Ready - Select an option and press Enter";
pub const DEFAULT_TITLE: &str = "NoC Raven - Terminal Management Interface";

/// Read-only settings; nothing here is ever written back.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub theme_overrides: Option<HashMap<String, String>>,
    #[serde(default)]
    pub ready_message: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub menu: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    #[must_use]
    pub fn ready_message(&self) -> &str {
        self.ready_message.as_deref().unwrap_or(DEFAULT_READY_MESSAGE)
    }
}

/// Parse by extension: yaml/yml, json, otherwise toml.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_app_config_file(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let cfg = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yml" | "yaml") => serde_yaml::from_str::<AppConfig>(&s)?,
        Some("json") => serde_json::from_str::<AppConfig>(&s)?,
        _ => toml::from_str::<AppConfig>(&s)?,
    };
    Ok(cfg)
}

/// First existing `config.{toml,yaml,yml,json}` under `dir`.
#[must_use]
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    ["config.toml", "config.yaml", "config.yml", "config.json"]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".raven"))
}

/// An explicit path must load; otherwise `~/.raven/config.*` is used when present.
///
/// # Errors
/// Returns error if the chosen file exists but cannot be parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_app_config_file(path);
    }
    match global_config_dir().and_then(|d| find_config_in(&d)) {
        Some(path) => load_app_config_file(&path),
        None => Ok(AppConfig::default()),
    }
}

#[must_use]
pub fn validate_app_config(cfg: &AppConfig) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    if let Some(name) = &cfg.theme {
        if !is_known_theme(name) {
            warnings.push(format!("theme '{name}' is unknown, using 'dark'"));
        }
    }
    if let Some(map) = &cfg.theme_overrides {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_unstable();
        for k in keys {
            if parse_color(&map[k]).is_none() {
                warnings.push(format!("theme_overrides.{k}: cannot parse color '{}'", map[k]));
            }
        }
    }
    if cfg.shell.as_deref().is_some_and(|s| s.trim().is_empty()) {
        warnings.push("shell is empty, using the platform default".to_string());
    }
    warnings
}
