use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub storefront: StorefrontConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Каталог с JSON-документами (products.json, collections.json, inventory.json)
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorefrontConfig {
    /// Базовый URL admin API витрины
    pub base_url: String,
    /// Токен доступа (заголовок X-Access-Token)
    pub access_token: String,
    /// ID локации склада, для которой выставляются остатки
    pub location_id: i64,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[storage]
data_dir = "target/data"

[storefront]
base_url = "https://storefront.example.com/admin/api"
access_token = ""
location_id = 0
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Инициализация глобальной конфигурации (вызывается один раз на старте)
pub fn initialize() -> anyhow::Result<()> {
    let config = load_config()?;
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Config already initialized"))?;
    Ok(())
}

/// Глобальная конфигурация приложения
pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}

/// Get the data directory path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_data_dir(config: &Config) -> anyhow::Result<PathBuf> {
    let dir_str = &config.storage.data_dir;
    let dir = Path::new(dir_str);

    // If absolute path, use as is
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }

    // If relative path, resolve it relative to the executable directory
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(dir));
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(dir_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.storage.data_dir, "target/data");
        assert_eq!(config.storefront.location_id, 0);
    }
}
