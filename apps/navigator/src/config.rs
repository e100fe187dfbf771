use std::{fs, io, path::Path};

use anyhow::Context;
use place::PlaceRequest;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_place: String,
    pub log_filter: String,
    pub not_found_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_place: "apple".into(),
            log_filter: "info".into(),
            not_found_title: "404".into(),
        }
    }
}

impl Settings {
    pub fn default_place_request(&self) -> anyhow::Result<PlaceRequest> {
        let raw = self
            .default_place
            .strip_prefix('#')
            .unwrap_or(&self.default_place);
        place::decode(raw)
            .with_context(|| format!("invalid default_place '{}'", self.default_place))
    }
}

/// Defaults, overlaid by the TOML file at `path` (if present), overlaid by
/// `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let settings = load_file(path)?;
    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

fn load_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    toml::from_str(&raw).with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env_overrides(mut settings: Settings, var: impl Fn(&str) -> Option<String>) -> Settings {
    if let Some(v) = var("APP__DEFAULT_PLACE") {
        settings.default_place = v;
    }
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("APP__NOT_FOUND_TITLE") {
        settings.not_found_title = v;
    }
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
