// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// One discrete, timestamped capture of all tracked assets.
///
/// `coins` is kept as raw JSON: the upstream may deliver either an ordered
/// list or an object keyed by asset id, and individual records may be
/// malformed. Shape checks happen during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub coins: Value,
}

/// A single raw asset record as delivered by the snapshot source.
///
/// Field names follow the CoinGecko `/coins/markets` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_change_percentage_24h: Option<f64>,
    /// Trailing 7-day price history, oldest first.
    #[serde(default, rename = "sparkline_in_7d", deserialize_with = "lenient::sparkline")]
    pub sparkline_7d: Vec<f64>,
}

/// The composite trading signal, in classifier priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    StrongBuy,
    Buy,
    StrongSell,
    Sell,
    #[default]
    Neutral,
}

impl SignalCategory {
    /// The label shown in the signal column.
    pub fn label(&self) -> &'static str {
        match self {
            SignalCategory::StrongBuy => "⬆⬆ Strong Buy",
            SignalCategory::Buy => "⬆ Buy",
            SignalCategory::StrongSell => "⬇⬇ Strong Sell",
            SignalCategory::Sell => "⬇ Sell",
            SignalCategory::Neutral => "–",
        }
    }
}

/// Bollinger Bands over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
    pub sd: f64,
}

/// MACD line, its signal line and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macd {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Indicators derived from an asset's 7-day series.
///
/// Each value is `None` when the series is too short for its window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<Macd>,
    pub bollinger: Option<BollingerBands>,
}

/// The canonical, sort-ready projection of one `AssetRecord`.
///
/// Every numeric field is finite; missing or invalid input has already been
/// replaced by its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAsset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub market_cap: f64,
    pub volume: f64,
    pub pct24h: f64,
    pub trend_pct: f64,
    /// First sample of the 7-day series, when the series has at least two points.
    pub first_7d: Option<f64>,
    pub signal: SignalCategory,
    pub indicators: IndicatorSnapshot,
}
