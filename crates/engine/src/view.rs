// In crates/engine/src/view.rs

use chrono::{DateTime, Utc};
use core_types::{Column, NormalizedAsset, SortState};
use serde::Serialize;

use crate::watchlist::WatchSet;

/// One row handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    #[serde(flatten)]
    pub asset: NormalizedAsset,
    pub is_watched: bool,
    /// Display text for `asset.signal`.
    pub signal_label: &'static str,
}

/// Header metadata for one table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeader {
    pub key: String,
    pub label: &'static str,
    pub sortable: bool,
    pub arrow: &'static str,
}

/// A ranked, immutable table for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedView {
    pub timestamp: Option<DateTime<Utc>>,
    pub sort: SortState,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<RankedRow>,
}

impl RankedView {
    /// An empty table, shown before the first snapshot arrives.
    pub fn empty(sort: SortState) -> Self {
        Self::build(None, sort, &[], &WatchSet::default())
    }

    pub fn build(
        timestamp: Option<DateTime<Utc>>,
        sort: SortState,
        ranked: &[NormalizedAsset],
        watchlist: &WatchSet,
    ) -> Self {
        let columns = Column::ALL
            .into_iter()
            .map(|column| ColumnHeader {
                key: column.to_string(),
                label: column.header(),
                sortable: column.is_sortable(),
                arrow: sort.arrow_for(column),
            })
            .collect();

        let rows = ranked
            .iter()
            .map(|asset| RankedRow {
                is_watched: watchlist.is_watched(&asset.id),
                signal_label: asset.signal.label(),
                asset: asset.clone(),
            })
            .collect();

        Self {
            timestamp,
            sort,
            columns,
            rows,
        }
    }

    /// Asset ids in ranked order.
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.asset.id.as_str()).collect()
    }
}

/// Abbreviates large amounts with a K/M/B/T suffix and two decimals.
pub fn format_compact(num: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    UNITS
        .iter()
        .find(|(scale, _)| num >= *scale)
        .map(|(scale, suffix)| format!("{:.2}{}", num / scale, suffix))
        .unwrap_or_else(|| format!("{:.2}", num))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{IndicatorSnapshot, SignalCategory};
    use serde_json::json;

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(1_234_567_890_123.0), "1.23T");
        assert_eq!(format_compact(2_500_000_000.0), "2.50B");
        assert_eq!(format_compact(1_000_000.0), "1.00M");
        assert_eq!(format_compact(64_321.5), "64.32K");
        assert_eq!(format_compact(0.5), "0.50");
        assert_eq!(format_compact(-5_000.0), "-5000.00");
    }

    #[test]
    fn test_empty_view_marks_active_column() {
        let view = RankedView::empty(SortState::default());
        assert!(view.rows.is_empty());
        let active: Vec<_> = view.columns.iter().filter(|c| !c.arrow.is_empty()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].key, "pct24h");
        assert_eq!(active[0].arrow, "▼");
        let watch = &view.columns[0];
        assert_eq!(watch.key, "watch");
        assert!(!watch.sortable);
    }

    #[test]
    fn test_rows_carry_watch_flag_and_signal_label() {
        let asset = NormalizedAsset {
            id: "solana".to_string(),
            name: "Solana".to_string(),
            symbol: "SOL".to_string(),
            price: 150.0,
            market_cap: 0.0,
            volume: 0.0,
            pct24h: 7.0,
            trend_pct: 0.0,
            first_7d: None,
            signal: SignalCategory::StrongBuy,
            indicators: IndicatorSnapshot::default(),
        };
        let watchlist: WatchSet = ["solana"].into_iter().collect();
        let view = RankedView::build(None, SortState::default(), &[asset], &watchlist);

        let row = serde_json::to_value(&view.rows[0]).unwrap();
        assert_eq!(row["id"], json!("solana"));
        assert_eq!(row["signal"], json!("strong_buy"));
        assert_eq!(row["signalLabel"], json!("⬆⬆ Strong Buy"));
        assert_eq!(row["isWatched"], json!(true));
    }
}
