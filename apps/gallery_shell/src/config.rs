use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{PostCategory, PostId};

pub const DEFAULT_CONFIG_PATH: &str = "gallery.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub reveal_delay_ms: u64,
    pub post_id: String,
    pub post_category: PostCategory,
    pub seed_demo: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 500,
            post_id: "sample".into(),
            post_category: PostCategory::Daily,
            seed_demo: true,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn post_id(&self) -> PostId {
        PostId::new(self.post_id.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    reveal_delay_ms: Option<u64>,
    post_id: Option<String>,
    post_category: Option<String>,
    seed_demo: Option<bool>,
    log_filter: Option<String>,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    if let Some(file_cfg) = read_file_settings(path)? {
        apply_file_settings(&mut settings, file_cfg);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let parsed = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.reveal_delay_ms {
        settings.reveal_delay_ms = v;
    }
    if let Some(v) = file_cfg.post_id {
        settings.post_id = v;
    }
    if let Some(category) = file_cfg.post_category.and_then(|v| v.parse().ok()) {
        settings.post_category = category;
    }
    if let Some(v) = file_cfg.seed_demo {
        settings.seed_demo = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    for key in ["GALLERY_REVEAL_DELAY_MS", "APP__REVEAL_DELAY_MS"] {
        if let Some(parsed) = env(key).and_then(|v| v.trim().parse::<u64>().ok()) {
            settings.reveal_delay_ms = parsed;
        }
    }

    if let Some(v) = env("APP__POST_ID").filter(|v| !v.trim().is_empty()) {
        settings.post_id = v.trim().to_string();
    }

    if let Some(category) = env("APP__POST_CATEGORY").and_then(|v| v.parse().ok()) {
        settings.post_category = category;
    }

    if let Some(v) = env("APP__SEED_DEMO").and_then(|v| parse_flag(&v)) {
        settings.seed_demo = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
