use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.sankavollerei.com";
pub const DEFAULT_GRID_COLUMNS: usize = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct HistoryConfig {
    /// Overrides the default `comicHistory.json` location.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            grid_columns: default_grid_columns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_grid_columns() -> usize {
    DEFAULT_GRID_COLUMNS
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("komik").join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config: {}", e);
                Config::default()
            }
        }
    }

    pub fn parse(content: &str) -> crate::error::Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| crate::error::KomikError::Config(e.to_string()))?;
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        if config.ui.grid_columns == 0 {
            config.ui.grid_columns = DEFAULT_GRID_COLUMNS;
        }
        Ok(config)
    }

    /// Resolved history file: configured path, else `<data dir>/komik/comicHistory.json`.
    pub fn history_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.history.path {
            return Some(path.clone());
        }
        let data_dir = dirs::data_dir()?;
        Some(
            data_dir
                .join("komik")
                .join(format!("{}.json", crate::history::HISTORY_KEY)),
        )
    }
}
