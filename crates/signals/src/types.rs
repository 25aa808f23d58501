// In crates/signals/src/types.rs

use serde::{Deserialize, Serialize};

/// Thresholds for the composite signal. Percentages are in percent units
/// (`5.0` means +5%).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SignalSettings {
    /// Minimum 24h change for a strong buy.
    pub strong_buy_pct24h: f64,
    /// Minimum 24h change for a plain buy.
    pub buy_pct24h: f64,
    /// Maximum 24h change for a strong sell.
    pub strong_sell_pct24h: f64,
    /// Maximum 24h change for a plain sell.
    pub sell_pct24h: f64,
    /// 7-day trend at or above this counts as trending up.
    pub trend_up_pct: f64,
    /// 7-day trend at or below this counts as trending down.
    pub trend_down_pct: f64,
    pub bollinger_mult: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            strong_buy_pct24h: 5.0,
            buy_pct24h: 5.0,
            strong_sell_pct24h: -2.0,
            sell_pct24h: -1.0,
            trend_up_pct: 1.0,
            trend_down_pct: -1.0,
            bollinger_mult: 2.0,
        }
    }
}
