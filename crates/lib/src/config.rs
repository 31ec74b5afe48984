use crate::raster::SvgRasterizer;
use crate::store::{FileStore, Gallery, DEFAULT_KEY, DEFAULT_MAX_ENTRIES};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PattiConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_store_key")]
    pub key: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
            key: default_store_key(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".patti")
}

fn default_store_key() -> String {
    DEFAULT_KEY.to_string()
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

impl PattiConfig {
    /// Reads `patti.toml` (or `path`) if present, then `PATTI_*` environment
    /// variables, e.g. `PATTI_STORE__DIR`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("patti").required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PATTI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let config: Self = settings.try_deserialize()?;
        if config.store.key.trim().is_empty() {
            return Err(ConfigError::Message("store.key must not be empty".to_string()));
        }
        if config.store.max_entries == 0 {
            return Err(ConfigError::Message(
                "store.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn gallery(&self) -> Gallery<FileStore> {
        Gallery::with_key(
            FileStore::new(&self.store.dir),
            self.store.key.clone(),
            self.store.max_entries,
        )
    }

    pub fn rasterizer(&self) -> SvgRasterizer {
        SvgRasterizer {
            width: self.render.width,
            height: self.render.height,
        }
    }
}
