// In crates/engine/src/normalizer.rs

use core_types::{AssetRecord, NormalizedAsset};
use indicators::IndicatorSettings;
use serde::Deserialize;
use serde_json::Value;
use signals::SignalClassifier;

use crate::{Error, Result};

/// The outcome of normalizing one snapshot's records.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// One entry per input record, in input order.
    pub assets: Vec<NormalizedAsset>,
    /// How many records were malformed and kept with default values.
    pub malformed: usize,
}

/// Maps raw asset records to their canonical, sort-ready projection.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    classifier: SignalClassifier,
    indicator_settings: IndicatorSettings,
}

impl Normalizer {
    pub fn new(classifier: SignalClassifier, indicator_settings: IndicatorSettings) -> Self {
        Self {
            classifier,
            indicator_settings,
        }
    }

    /// Normalizes one record. Missing or non-numeric fields become 0, missing
    /// text becomes an empty string.
    pub fn normalize(&self, record: &AssetRecord) -> NormalizedAsset {
        let series = record.sparkline_7d.as_slice();
        let price = record.current_price.unwrap_or(0.0);
        let pct24h = record.price_change_percentage_24h.unwrap_or(0.0);
        let trend_pct = trend_pct(series, record.current_price);

        NormalizedAsset {
            id: record.id.clone().unwrap_or_default(),
            name: record.name.clone().unwrap_or_default(),
            symbol: record
                .symbol
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_default(),
            price,
            market_cap: record.market_cap.unwrap_or(0.0),
            volume: record.total_volume.unwrap_or(0.0),
            pct24h,
            trend_pct,
            first_7d: series.first().copied().filter(|_| series.len() >= 2),
            signal: self.classifier.assess(series, price, pct24h, trend_pct),
            indicators: indicators::snapshot(series, &self.indicator_settings),
        }
    }

    /// Normalizes every record of a snapshot.
    ///
    /// A record that is not an object with a string `id` is logged and kept
    /// with default values, so the batch has one asset per input record. A
    /// non-empty collection without a single valid record is rejected as a
    /// whole: it is not market data (typically an upstream error body).
    pub fn normalize_batch(&self, records: &[&Value]) -> Result<NormalizedBatch> {
        let mut batch = NormalizedBatch {
            assets: Vec::with_capacity(records.len()),
            malformed: 0,
        };

        for (index, value) in records.iter().enumerate() {
            let record = match parse_record(value) {
                Ok(record) => record,
                Err(reason) => {
                    tracing::error!(index, %reason, "Malformed asset record. Keeping it with default values.");
                    batch.malformed += 1;
                    AssetRecord::default()
                }
            };
            batch.assets.push(self.normalize(&record));
        }

        if !records.is_empty() && batch.malformed == records.len() {
            return Err(Error::MalformedSnapshot(format!(
                "none of the {} records is a valid asset",
                records.len()
            )));
        }
        Ok(batch)
    }
}

/// Extracts the asset records from a snapshot's `coins` payload.
///
/// Accepts an ordered list or an object keyed by asset id (kept in document
/// order). Anything else is a malformed snapshot.
pub fn collect_records(coins: &Value) -> Result<Vec<&Value>> {
    match coins {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(map.values().collect()),
        Value::Null => Err(Error::MalformedSnapshot(
            "snapshot has no asset collection".to_string(),
        )),
        other => Err(Error::MalformedSnapshot(format!(
            "expected a list or map of assets, got {}",
            json_kind(other)
        ))),
    }
}

/// Percentage change from the first 7-day sample to the current price.
///
/// Zero when there are fewer than two samples, the first sample is zero, or
/// there is no valid current price to compare against.
pub fn trend_pct(series: &[f64], current_price: Option<f64>) -> f64 {
    match (series, current_price) {
        ([first, _, ..], Some(current)) if *first != 0.0 => {
            let pct = (current - first) / first * 100.0;
            if pct.is_finite() { pct } else { 0.0 }
        }
        _ => 0.0,
    }
}

fn parse_record(value: &Value) -> std::result::Result<AssetRecord, String> {
    if !value.is_object() {
        return Err(format!("expected an object, got {}", json_kind(value)));
    }
    let record = AssetRecord::deserialize(value).map_err(|e| e.to_string())?;
    match record.id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(record),
        _ => Err("record has no asset id".to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
