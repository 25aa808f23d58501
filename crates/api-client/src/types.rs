// In crates/api-client/src/types.rs

use reqwest::Client;

/// The client for the CoinGecko `/coins/markets` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// Optional API key; an empty key sends no auth header.
    pub api_key: String,
    /// The base URL for the CoinGecko REST API.
    pub base_url: String,
    pub vs_currency: String,
    pub per_page: u32,
    pub page: u32,
}
