// In crates/core-types/src/sort.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A column of the ranked asset table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Watch,
    Name,
    Id,
    Symbol,
    Price,
    MarketCap,
    Volume,
    Pct24h,
    Signal,
    TrendPct,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Watch,
        Column::Name,
        Column::Id,
        Column::Symbol,
        Column::Price,
        Column::MarketCap,
        Column::Volume,
        Column::Pct24h,
        Column::Signal,
        Column::TrendPct,
    ];

    /// The sort key behind this column, or `None` for the watch and signal columns.
    pub fn sort_key(&self) -> Option<SortKey> {
        match self {
            Column::Watch | Column::Signal => None,
            Column::Name => Some(SortKey::Name),
            Column::Id => Some(SortKey::Id),
            Column::Symbol => Some(SortKey::Symbol),
            Column::Price => Some(SortKey::Price),
            Column::MarketCap => Some(SortKey::MarketCap),
            Column::Volume => Some(SortKey::Volume),
            Column::Pct24h => Some(SortKey::Pct24h),
            Column::TrendPct => Some(SortKey::TrendPct),
        }
    }

    pub fn is_sortable(&self) -> bool {
        self.sort_key().is_some()
    }

    pub fn header(&self) -> &'static str {
        match self {
            Column::Watch => "Watch",
            Column::Name => "Name",
            Column::Id => "ID",
            Column::Symbol => "Symbol",
            Column::Price => "Price",
            Column::MarketCap => "Market Cap",
            Column::Volume => "Volume",
            Column::Pct24h => "24h %",
            Column::Signal => "Signal",
            Column::TrendPct => "7-Day Trend",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Column::Watch => "watch",
            Column::Signal => "signal",
            other => other.sort_key().map(|k| k.as_str()).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = Error;

    /// Accepts the camelCase wire names (`marketCap`) as well as snake_case
    /// (`market_cap`), case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        Column::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownColumn(s.to_string()))
    }
}

/// A sortable field of `NormalizedAsset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Id,
    Symbol,
    Price,
    MarketCap,
    Volume,
    Pct24h,
    TrendPct,
}

impl SortKey {
    /// Text keys compare case-insensitively; the rest compare numerically.
    pub fn is_textual(&self) -> bool {
        matches!(self, SortKey::Name | SortKey::Id | SortKey::Symbol)
    }

    pub fn column(&self) -> Column {
        match self {
            SortKey::Name => Column::Name,
            SortKey::Id => Column::Id,
            SortKey::Symbol => Column::Symbol,
            SortKey::Price => Column::Price,
            SortKey::MarketCap => Column::MarketCap,
            SortKey::Volume => Column::Volume,
            SortKey::Pct24h => Column::Pct24h,
            SortKey::TrendPct => Column::TrendPct,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Id => "id",
            SortKey::Symbol => "symbol",
            SortKey::Price => "price",
            SortKey::MarketCap => "marketCap",
            SortKey::Volume => "volume",
            SortKey::Pct24h => "pct24h",
            SortKey::TrendPct => "trendPct",
        }
    }
}

/// The active ordering of the asset table. Persisted across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortState {
    /// 24h change, biggest movers first.
    fn default() -> Self {
        Self {
            key: SortKey::Pct24h,
            ascending: false,
        }
    }
}

impl SortState {
    /// The arrow shown next to `column`'s header.
    pub fn arrow_for(&self, column: Column) -> &'static str {
        if self.key.column() != column {
            ""
        } else if self.ascending {
            "▲"
        } else {
            "▼"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_parsing_accepts_wire_and_snake_names() {
        assert_eq!("marketCap".parse::<Column>(), Ok(Column::MarketCap));
        assert_eq!("market_cap".parse::<Column>(), Ok(Column::MarketCap));
        assert_eq!("PCT24H".parse::<Column>(), Ok(Column::Pct24h));
        assert_eq!("trend_pct".parse::<Column>(), Ok(Column::TrendPct));
        assert_eq!("signal".parse::<Column>(), Ok(Column::Signal));
        assert_eq!(
            "rank".parse::<Column>(),
            Err(Error::UnknownColumn("rank".to_string()))
        );
    }

    #[test]
    fn test_watch_and_signal_columns_are_not_sortable() {
        let unsortable: Vec<_> = Column::ALL.into_iter().filter(|c| !c.is_sortable()).collect();
        assert_eq!(unsortable, vec![Column::Watch, Column::Signal]);
    }

    #[test]
    fn test_sort_state_serializes_compactly() {
        let state = SortState {
            key: SortKey::MarketCap,
            ascending: true,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"key":"marketCap","ascending":true}"#);
        assert_eq!(serde_json::from_str::<SortState>(&json).unwrap(), state);
    }

    #[test]
    fn test_default_sort_state_is_pct24h_descending() {
        let state = SortState::default();
        assert_eq!(state.key, SortKey::Pct24h);
        assert!(!state.ascending);
        assert_eq!(state.arrow_for(Column::Pct24h), "▼");
        assert_eq!(state.arrow_for(Column::Price), "");
    }
}
