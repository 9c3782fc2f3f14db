use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::Theme;

pub fn load_theme_file(path: &Path) -> Result<Theme> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read theme from {}", path.display()))?;
    let theme: Theme = toml::from_str(&content)
        .with_context(|| format!("Failed to parse theme from {}", path.display()))?;
    Ok(theme)
}

pub fn theme_to_toml(theme: &Theme) -> Result<String> {
    toml::to_string_pretty(theme).context("Failed to serialize theme")
}
