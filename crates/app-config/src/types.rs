// In crates/app-config/src/types.rs

use serde::Deserialize;

use indicators::IndicatorSettings;
use signals::SignalSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    pub server: ServerSettings,
    /// Settings for the CoinGecko API.
    #[serde(default)]
    pub coingecko: CoinGeckoSettings,
    #[serde(default)]
    pub poller: PollerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    /// Thresholds for the composite signal.
    #[serde(default)]
    pub signals: SignalSettings,
    /// Windows for the per-asset indicator bundle.
    #[serde(default)]
    pub indicators: IndicatorSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served as static files for the dashboard.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CoinGeckoSettings {
    /// The REST API base URL.
    pub rest_base_url: String,
    /// Optional API key, sent as a header when non-empty.
    pub api_key: String,
    pub vs_currency: String,
    pub per_page: u32,
    pub page: u32,
    pub request_timeout_secs: u64,
}

impl Default for CoinGeckoSettings {
    fn default() -> Self {
        Self {
            rest_base_url: "https://api.coingecko.com/api/v3".to_string(),
            api_key: String::new(),
            vs_currency: "usd".to_string(),
            per_page: 20,
            page: 1,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PollerSettings {
    /// Seconds between two snapshot refreshes.
    pub interval_secs: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self { interval_secs: 20 }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the daily snapshot logs.
    pub log_dir: String,
    /// JSON file holding the persisted sort state and watchlist.
    pub preferences_path: String,
    /// Whether fetched snapshots are appended to the daily log.
    pub log_snapshots: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            preferences_path: "data/preferences.json".to_string(),
            log_snapshots: true,
        }
    }
}

/// Helper functions for serde defaults
fn default_static_dir() -> String {
    "public".to_string()
}
