// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AppSettings, CoinGeckoSettings, PollerSettings, ServerSettings, Settings, StorageSettings,
};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let base = config_dir.join("base");
    let overlay = config_dir.join(&environment);

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name(&base.to_string_lossy()))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&overlay.to_string_lossy()).required(false))
        // 3. Load settings from environment variables (e.g., `APP__COINGECKO__API_KEY=...`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}
