// In crates/indicators/src/lib.rs

//! Stateless technical indicators over a price series (oldest first).
//!
//! Every windowed indicator returns `None` when the series is too short for
//! its window. `None` is never folded into a numeric sentinel, so callers
//! have to branch on it.

use core_types::{BollingerBands, IndicatorSnapshot, Macd};

pub mod types;

pub use types::IndicatorSettings;

/// Arithmetic mean. An empty series has a mean of 0.
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Population standard deviation.
pub fn stddev(series: &[f64]) -> f64 {
    let m = mean(series);
    let squared: Vec<f64> = series.iter().map(|x| (x - m).powi(2)).collect();
    mean(&squared).sqrt()
}

/// Simple moving average of the last `period` points.
pub fn sma(series: &[f64], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        return None;
    }
    Some(mean(&series[series.len() - period..]))
}

/// Exponential moving average, seeded with the mean of the first `period`
/// points and then smoothed with `k = 2 / (period + 1)`.
pub fn ema(series: &[f64], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = mean(&series[..period]);
    Some(
        series[period..]
            .iter()
            .fold(seed, |ema, price| price * k + ema * (1.0 - k)),
    )
}

/// Relative Strength Index over the trailing `period` price changes.
///
/// Gains and losses are plain averages over the window (no Wilder smoothing).
/// A window without losses reads 100.
pub fn rsi(series: &[f64], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period + 1 {
        return None;
    }
    let window = &series[series.len() - period - 1..];
    let (gains, losses) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gains, losses), change| {
            if change >= 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Moving Average Convergence Divergence.
///
/// The signal line is an EMA over a MACD sub-series rebuilt by recomputing
/// both EMAs over every prefix from index `slow` onward. That is quadratic in
/// the series length, which is fine for 7-day sparklines.
pub fn macd(series: &[f64], fast: usize, slow: usize, signal: usize) -> Option<Macd> {
    if fast == 0 || signal == 0 || series.len() < slow + signal {
        return None;
    }
    let macd_line = ema(series, fast)? - ema(series, slow)?;

    let macd_series: Vec<f64> = (slow..series.len())
        .filter_map(|i| {
            let prefix = &series[..=i];
            Some(ema(prefix, fast)? - ema(prefix, slow)?)
        })
        .collect();
    if macd_series.len() < signal {
        return None;
    }

    let signal_line = ema(&macd_series, signal)?;
    Some(Macd {
        macd_line,
        signal_line,
        histogram: macd_line - signal_line,
    })
}

/// Bollinger Bands over the trailing `period` points.
pub fn bollinger(series: &[f64], period: usize, mult: f64) -> Option<BollingerBands> {
    if period == 0 || series.len() < period {
        return None;
    }
    let window = &series[series.len() - period..];
    let mid = mean(window);
    let sd = stddev(window);
    Some(BollingerBands {
        upper: mid + mult * sd,
        mid,
        lower: mid - mult * sd,
        sd,
    })
}

/// Computes the full indicator bundle for one asset's series.
pub fn snapshot(series: &[f64], settings: &IndicatorSettings) -> IndicatorSnapshot {
    IndicatorSnapshot {
        sma: sma(series, settings.sma_period),
        ema: ema(series, settings.ema_period),
        rsi: rsi(series, settings.rsi_period),
        macd: macd(
            series,
            settings.macd_fast,
            settings.macd_slow,
            settings.macd_signal,
        ),
        bollinger: bollinger(series, settings.bollinger_period, settings.bollinger_mult),
    }
}
