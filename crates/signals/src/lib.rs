// In crates/signals/src/lib.rs

use core_types::{BollingerBands, SignalCategory};

pub mod types;

pub use types::SignalSettings;

/// Everything the classifier looks at for one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs {
    pub price: f64,
    pub pct24h: f64,
    pub trend_pct: f64,
    /// Bands over the 7-day series, absent when the series is empty.
    pub bands: Option<BollingerBands>,
}

/// Turns market data into one of five signal categories.
#[derive(Debug, Clone, Default)]
pub struct SignalClassifier {
    settings: SignalSettings,
}

impl SignalClassifier {
    pub fn new(settings: SignalSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SignalSettings {
        &self.settings
    }

    /// Classifies from a 7-day series.
    ///
    /// The Bollinger window spans the whole series rather than a fixed 20
    /// samples, so band width follows whatever history the source provided.
    pub fn assess(&self, series: &[f64], price: f64, pct24h: f64, trend_pct: f64) -> SignalCategory {
        let bands = indicators::bollinger(series, series.len(), self.settings.bollinger_mult);
        self.classify(&SignalInputs {
            price,
            pct24h,
            trend_pct,
            bands,
        })
    }

    /// First match wins: strong buy, buy, strong sell, sell, neutral.
    pub fn classify(&self, inputs: &SignalInputs) -> SignalCategory {
        let s = &self.settings;
        let trend_up = inputs.trend_pct >= s.trend_up_pct;
        let trend_down = inputs.trend_pct <= s.trend_down_pct;

        if let Some(bands) = inputs.bands {
            if inputs.pct24h >= s.strong_buy_pct24h && trend_up && inputs.price > bands.upper {
                return SignalCategory::StrongBuy;
            }
        }
        if inputs.pct24h >= s.buy_pct24h {
            return SignalCategory::Buy;
        }
        if let Some(bands) = inputs.bands {
            if inputs.pct24h <= s.strong_sell_pct24h && trend_down && inputs.price < bands.lower {
                return SignalCategory::StrongSell;
            }
        }
        if inputs.pct24h <= s.sell_pct24h {
            return SignalCategory::Sell;
        }
        SignalCategory::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands(lower: f64, upper: f64) -> Option<BollingerBands> {
        let mid = (lower + upper) / 2.0;
        Some(BollingerBands {
            upper,
            mid,
            lower,
            sd: (upper - mid) / 2.0,
        })
    }

    fn inputs(price: f64, pct24h: f64, trend_pct: f64, bands: Option<BollingerBands>) -> SignalInputs {
        SignalInputs {
            price,
            pct24h,
            trend_pct,
            bands,
        }
    }

    #[test]
    fn test_strong_buy_is_checked_before_buy() {
        let classifier = SignalClassifier::default();
        let a = inputs(110.0, 6.0, 2.0, bands(90.0, 105.0));
        let b = inputs(100.0, 6.0, 2.0, bands(90.0, 105.0));
        assert_eq!(classifier.classify(&a), SignalCategory::StrongBuy);
        assert_eq!(classifier.classify(&b), SignalCategory::Buy);
    }

    #[test]
    fn test_strong_buy_needs_bands_and_uptrend() {
        let classifier = SignalClassifier::default();
        assert_eq!(
            classifier.classify(&inputs(110.0, 6.0, 2.0, None)),
            SignalCategory::Buy
        );
        assert_eq!(
            classifier.classify(&inputs(110.0, 6.0, 0.5, bands(90.0, 105.0))),
            SignalCategory::Buy
        );
    }

    #[test]
    fn test_strong_sell_is_checked_before_sell() {
        let classifier = SignalClassifier::default();
        let crash = inputs(80.0, -3.0, -4.0, bands(90.0, 105.0));
        let dip = inputs(95.0, -3.0, -4.0, bands(90.0, 105.0));
        assert_eq!(classifier.classify(&crash), SignalCategory::StrongSell);
        assert_eq!(classifier.classify(&dip), SignalCategory::Sell);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let classifier = SignalClassifier::default();
        assert_eq!(classifier.classify(&inputs(1.0, 5.0, 0.0, None)), SignalCategory::Buy);
        assert_eq!(classifier.classify(&inputs(1.0, -1.0, 0.0, None)), SignalCategory::Sell);
        assert_eq!(
            classifier.classify(&inputs(1.0, -0.99, 0.0, None)),
            SignalCategory::Neutral
        );
        assert_eq!(
            classifier.classify(&inputs(1.0, 4.99, 0.0, None)),
            SignalCategory::Neutral
        );
    }

    #[test]
    fn test_assess_uses_full_series_window() {
        let classifier = SignalClassifier::default();
        // Seven flat samples then a breakout price: bands collapse onto 100.
        let series = vec![100.0; 7];
        assert_eq!(
            classifier.assess(&series, 103.0, 6.0, 3.0),
            SignalCategory::StrongBuy
        );
        assert_eq!(
            classifier.assess(&series, 97.0, -2.5, -3.0),
            SignalCategory::StrongSell
        );
        // No history means no bands, so only the coarse buckets apply.
        assert_eq!(classifier.assess(&[], 103.0, 6.0, 3.0), SignalCategory::Buy);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: SignalSettings = toml::from_str("buy_pct24h = 3.0").unwrap();
        assert_eq!(settings.buy_pct24h, 3.0);
        assert_eq!(settings.strong_buy_pct24h, 5.0);
        let classifier = SignalClassifier::new(settings);
        assert_eq!(classifier.classify(&inputs(1.0, 3.5, 0.0, None)), SignalCategory::Buy);
    }
}
