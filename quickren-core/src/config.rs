use crate::entry::FileCategory;
use crate::pattern::PatternDescriptor;
use crate::selection::STATE_DIR_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Pattern used when none is given on the command line
    #[serde(default)]
    pub pattern: PatternDescriptor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultsConfig {
    /// Default preview format: "table", "summary", "json", or "none"
    #[serde(default = "default_preview")]
    pub preview_format: String,

    /// Descend into subdirectories when selecting files
    #[serde(default)]
    pub recursive: bool,

    /// Match the search filter case-sensitively
    #[serde(default)]
    pub case_sensitive: bool,

    #[serde(default)]
    pub preset: Option<FileCategory>,

    /// File-name globs, e.g. `["*.jpg", "*.png"]`
    #[serde(default)]
    pub globs: Vec<String>,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            preview_format: default_preview(),
            recursive: false,
            case_sensitive: false,
            preset: None,
            globs: Vec::new(),
            use_color: None,
        }
    }
}

fn default_preview() -> String {
    "table".to_string()
}

impl Config {
    /// Load `.quickren/config.toml` under `working_dir`, or defaults if absent
    pub fn load(working_dir: &Path) -> Result<Self> {
        let config_path = working_dir.join(STATE_DIR_NAME).join("config.toml");
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
