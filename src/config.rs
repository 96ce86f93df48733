//! Runtime configuration.
//!
//! Values are resolved in this order, later sources winning:
//! built-in defaults, `config.toml` in the data directory, the
//! `CODESHELF_DATA_DIR` environment variable, and finally an explicit
//! data directory handed in by the caller (the `--data-dir` flag).

use crate::error::Result;
use crate::models::category::DEFAULT_CATEGORY_COLOR;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "codeshelf";
pub const CONFIG_FILENAME: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "CODESHELF_DATA_DIR";

pub const DEFAULT_SNIPPETS_KEY: &str = "code_snippets";
pub const DEFAULT_CATEGORIES_KEY: &str = "code_categories";

/// The two keys under which the collections live in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub snippets: String,
    pub categories: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            snippets: DEFAULT_SNIPPETS_KEY.to_string(),
            categories: DEFAULT_CATEGORIES_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage: StorageKeys,
    /// Colour given to categories created without one.
    pub default_color: String,
    /// Create the stock categories when the store has none.
    pub seed_default_categories: bool,
}

/// On-disk shape of `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: Option<StorageKeys>,
    default_color: Option<String>,
    seed_default_categories: Option<bool>,
}

impl Config {
    /// Defaults rooted at `data_dir`, without reading anything from disk.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            storage: StorageKeys::default(),
            default_color: DEFAULT_CATEGORY_COLOR.to_string(),
            seed_default_categories: true,
        }
    }

    /// Resolve the full configuration.
    pub fn load(data_dir_override: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir_override {
            Some(dir) => dir.to_path_buf(),
            None => env::var_os(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        };

        let mut config = Self::with_data_dir(&data_dir);
        let config_path = data_dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            config.merge_toml(&content)?;
            log::debug!("loaded config from {}", config_path.display());
        }

        Ok(config)
    }

    /// Overlay the fields present in a `config.toml` document.
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(content)?;

        if let Some(storage) = file.storage {
            self.storage = storage;
        }
        if let Some(color) = file.default_color {
            self.default_color = color;
        }
        if let Some(seed) = file.seed_default_categories {
            self.seed_default_categories = seed;
        }

        Ok(())
    }

    /// Directory holding the per-key store files.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
}
