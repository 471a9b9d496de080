use crate::constants::VIDEO_EXTENSIONS;
use crate::services::import::LibraryRoot;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Event bus buffer size (default: 100)
    pub event_bus_buffer_size: usize,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/showarr.db".to_string(),
            log_level: "info".to_string(),
            event_bus_buffer_size: 100,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    pub path: String,

    /// Rescan this root on every reload instead of using cached shows.
    #[serde(default)]
    pub auto_reload: bool,
}

impl From<&RootConfig> for LibraryRoot {
    fn from(root: &RootConfig) -> Self {
        Self::new(&root.path, root.auto_reload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// File extensions treated as episodes, without the leading dot.
    pub media_extensions: Vec<String>,

    /// Concurrent episode metadata loads. 0 uses the number of CPU cores.
    pub metadata_concurrency: usize,

    /// Add placeholder entries for missing episode numbers in new shows.
    pub show_missing_episodes: bool,

    pub roots: Vec<RootConfig>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            media_extensions: VIDEO_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            metadata_concurrency: 0,
            show_missing_episodes: false,
            roots: Vec::new(),
        }
    }
}

impl LibraryConfig {
    #[must_use]
    pub fn library_roots(&self) -> Vec<LibraryRoot> {
        self.roots.iter().map(LibraryRoot::from).collect()
    }

    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        if self.metadata_concurrency > 0 {
            return self.metadata_concurrency;
        }
        std::thread::available_parallelism().map_or(4, usize::from)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("showarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".showarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.event_bus_buffer_size == 0 {
            anyhow::bail!("Event bus buffer size must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("min_db_connections cannot exceed max_db_connections");
        }

        if self.library.media_extensions.is_empty() {
            anyhow::bail!("At least one media extension must be configured");
        }

        for (i, root) in self.library.roots.iter().enumerate() {
            if root.path.trim().is_empty() {
                anyhow::bail!("Library root #{} has an empty path", i + 1);
            }
            if self.library.roots[..i].iter().any(|r| r.path == root.path) {
                anyhow::bail!("Library root '{}' is configured twice", root.path);
            }
        }

        Ok(())
    }
}
