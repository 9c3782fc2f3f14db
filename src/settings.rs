use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_BASE, StoryType};
use crate::cli::Cli;
use crate::feed::DEFAULT_PAGE_SIZE;
use crate::fetch::RetryPolicy;

const APP_SENTINEL: &str = "hnfeed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Retries for retryable API errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    /// Listing shown at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<StoryType>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            theme: None,
            api_base_url: None,
            page_size: None,
            retries: None,
            feed: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.page_size == Some(0) {
            bail!("page_size must be at least 1");
        }
        Ok(())
    }

    /// Settings with every tunable spelled out at its default.
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Some(DEFAULT_API_BASE.to_string()),
            page_size: Some(DEFAULT_PAGE_SIZE),
            retries: Some(RetryPolicy::default().retries),
            feed: Some(StoryType::default()),
            ..Self::default()
        }
    }
}

/// Effective configuration after layering CLI flags over the settings file
/// over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub feed: StoryType,
    pub page_size: usize,
    pub api_base_url: String,
    pub retry: RetryPolicy,
    pub theme: Option<String>,
}

impl RuntimeConfig {
    pub fn resolve(cli: &Cli, settings: &Settings) -> Self {
        let retry = settings
            .retries
            .map(RetryPolicy::with_retries)
            .unwrap_or_default();
        Self {
            feed: cli.feed.or(settings.feed).unwrap_or_default(),
            page_size: cli
                .page_size
                .or(settings.page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .max(1),
            api_base_url: cli
                .api_base_url
                .clone()
                .or_else(|| settings.api_base_url.clone())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            retry,
            theme: cli.theme.clone().or_else(|| settings.theme.clone()),
        }
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("hnfeed")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn themes_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("themes")
}

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join("hnfeed.log")
}
