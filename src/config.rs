use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub storage: StorageConfig,

    pub auth: AuthConfig,

    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 10)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,

    /// How often the watchdog probes store connectivity, in seconds.
    pub db_probe_interval_seconds: u64,

    /// Fixed delay between reconnect probes once connectivity is lost.
    pub db_retry_delay_seconds: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/mediaspace.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 10,
            min_db_connections: 1,
            db_probe_interval_seconds: 30,
            db_retry_delay_seconds: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Maximum accepted request body size, in megabytes.
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8888,
            cors_allowed_origins: vec!["*".to_string()],
            max_upload_mb: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root folder for uploaded files; stored paths start with its name.
    pub upload_root: String,

    /// Cache-Control max-age for served uploads, in seconds.
    pub cache_max_age_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: "uploads".to_string(),
            cache_max_age_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Email that receives the admin flag at registration. Unset means no
    /// account is ever seeded as admin.
    pub admin_email: Option<String>,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// The page whose visits the weekly dashboard aggregates.
    pub dashboard_page: String,

    /// Pages that get a zero-count row seeded for today at startup.
    pub seed_pages: Vec<String>,

    /// Fail-open policy for the weekly read: on store failure return zeros
    /// instead of an error. Set false to fail closed like other endpoints.
    pub fail_open: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            dashboard_page: "self-media".to_string(),
            seed_pages: vec!["index".to_string(), "self-media".to_string()],
            fail_open: true,
        }
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
            paths.push(config_dir.join("mediaspace").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mediaspace").join("config.toml"));
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
        if self.storage.upload_root.trim().is_empty() {
            anyhow::bail!("Storage upload root cannot be empty");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("Minimum database connections cannot exceed the maximum");
        }

        if self.auth.argon2_memory_cost_kib == 0 || self.auth.argon2_time_cost == 0 {
            anyhow::bail!("Argon2 cost parameters must be greater than zero");
        }

        if self.stats.dashboard_page.trim().is_empty() {
            anyhow::bail!("Stats dashboard page cannot be empty");
        }

        Ok(())
    }
}
