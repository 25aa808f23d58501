// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::CoinGeckoSettings;
use async_trait::async_trait;
use chrono::Utc;
use core_types::Snapshot;
use serde_json::Value;

pub mod error;
pub mod replay;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use replay::LogReplaySource;
pub use types::CoinGeckoClient;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Anything that can hand out the latest market snapshot.
///
/// The rest of the system only ever asks for "the latest"; history, retries
/// and caching are the source's own business.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// The name of the source, used in logs.
    fn name(&self) -> &'static str;

    async fn latest_snapshot(&self) -> Result<Snapshot>;
}

impl CoinGeckoClient {
    /// Constructs a new client from `CoinGeckoSettings`.
    pub fn new(settings: &CoinGeckoSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(CoinGeckoClient {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
            vs_currency: settings.vs_currency.clone(),
            per_page: settings.per_page,
            page: settings.page,
        })
    }

    /// The fully qualified markets URL, sparkline and 24h change included.
    pub fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=true&price_change_percentage=24h",
            self.base_url, self.vs_currency, self.per_page, self.page
        )
    }

    /// Fetches the raw markets payload.
    ///
    /// This corresponds to the `GET /coins/markets` endpoint.
    pub async fn get_markets(&self) -> Result<Value> {
        let url = self.markets_url();
        tracing::debug!(%url, "Fetching markets.");
        let mut request = self.http_client.get(&url);
        if !self.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }

        let response = request.send().await.map_err(Error::RequestFailed)?;
        let status = response.status();
        let text = response.text().await.map_err(Error::RequestFailed)?;

        if !status.is_success() {
            let msg = error_message(&text);
            tracing::warn!(status = status.as_u16(), %msg, "CoinGecko returned an error.");
            return Err(Error::ApiError {
                status: status.as_u16(),
                msg,
            });
        }

        let value: Value = serde_json::from_str(&text).map_err(Error::DeserializationFailed)?;
        Ok(value)
    }
}

#[async_trait]
impl SnapshotSource for CoinGeckoClient {
    fn name(&self) -> &'static str {
        "CoinGecko"
    }

    async fn latest_snapshot(&self) -> Result<Snapshot> {
        let coins = self.get_markets().await?;
        Ok(Snapshot {
            timestamp: Some(Utc::now()),
            coins,
        })
    }
}

/// Pulls a readable message out of an error body.
///
/// CoinGecko answers either `{ "error": ".." }` or
/// `{ "status": { "error_message": ".." } }`; anything else is passed through.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    value
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("status")
                .and_then(|s| s.get("error_message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

// Free function to allow api_client::new usage
pub fn new(settings: &CoinGeckoSettings) -> Result<CoinGeckoClient> {
    CoinGeckoClient::new(settings)
}
