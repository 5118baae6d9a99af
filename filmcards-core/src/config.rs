//! Render Configuration
//!
//! Everything about the page that is not film data. Loaded from a camelCase
//! JSON file; any field left out takes its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::DEFAULT_TAG_NAME;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tag name '{0}': must be lowercase letters, digits or '-', start with a letter and contain '-'")]
    InvalidTagName(String),

    #[error("Invalid container id '{0}': must be non-empty and contain no whitespace or quotes")]
    InvalidContainerId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    #[serde(default = "default_page_title")]
    pub page_title: String,
    /// Skip cards whose data fails to parse instead of aborting the page.
    #[serde(default)]
    pub isolate_failures: bool,
    #[serde(default = "default_true")]
    pub toggle_script: bool,
}

fn default_stylesheet() -> String { "style.css".to_string() }
fn default_tag_name() -> String { DEFAULT_TAG_NAME.to_string() }
fn default_container_id() -> String { "film-container".to_string() }
fn default_page_title() -> String { "Film Development Times".to_string() }
fn default_true() -> bool { true }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stylesheet: default_stylesheet(),
            tag_name: default_tag_name(),
            container_id: default_container_id(),
            page_title: default_page_title(),
            isolate_failures: false,
            toggle_script: true,
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Tag and container id end up inside markup and script unescaped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tag = &self.tag_name;
        let tag_ok = tag.starts_with(|c: char| c.is_ascii_lowercase())
            && tag.contains('-')
            && tag.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !tag_ok {
            return Err(ConfigError::InvalidTagName(tag.clone()));
        }

        let id = &self.container_id;
        if id.is_empty() || id.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
            return Err(ConfigError::InvalidContainerId(id.clone()));
        }

        Ok(())
    }
}
