// In crates/engine/src/ranking.rs

use std::cmp::Ordering;

use core_types::{Column, NormalizedAsset, SortKey, SortState};
use feruca::{Collator, Locale, Tailoring};
use store::KeyValueStore;

/// Store key for the persisted `SortState`.
pub const SORT_STATE_KEY: &str = "sort_state";

/// An event that may move the sort state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortRequest {
    /// The user activated a column header.
    Activate(Column),
    /// Re-apply a known state verbatim, e.g. after a refresh or a restart.
    Reapply(SortState),
}

/// Computes the next sort state.
///
/// Returns `None` when the request is a no-op (a non-sortable column); the
/// current state then stays as it is and is not persisted again.
pub fn transition(current: SortState, request: SortRequest) -> Option<SortState> {
    match request {
        SortRequest::Activate(column) => {
            let key = column.sort_key()?;
            if key == current.key {
                Some(SortState {
                    key,
                    ascending: !current.ascending,
                })
            } else {
                // A freshly chosen column starts high to low.
                Some(SortState {
                    key,
                    ascending: false,
                })
            }
        }
        SortRequest::Reapply(state) => Some(state),
    }
}

/// A collator for the text columns: CLDR root order, punctuation kept
/// significant.
pub fn text_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Compares two assets on one key, low to high.
///
/// Text keys compare case-insensitively in Unicode collation order, so
/// accented letters sit next to their base letter. Numeric keys compare by
/// value; every normalized number is finite, so the order is total.
pub fn compare(
    a: &NormalizedAsset,
    b: &NormalizedAsset,
    key: SortKey,
    collator: &mut Collator,
) -> Ordering {
    match key {
        SortKey::Name => compare_text(collator, &a.name, &b.name),
        SortKey::Id => compare_text(collator, &a.id, &b.id),
        SortKey::Symbol => compare_text(collator, &a.symbol, &b.symbol),
        SortKey::Price => compare_number(a.price, b.price),
        SortKey::MarketCap => compare_number(a.market_cap, b.market_cap),
        SortKey::Volume => compare_number(a.volume, b.volume),
        SortKey::Pct24h => compare_number(a.pct24h, b.pct24h),
        SortKey::TrendPct => compare_number(a.trend_pct, b.trend_pct),
    }
}

/// Orders the whole collection by `state`.
///
/// The sort is stable in both directions: assets that compare equal keep
/// their snapshot order, so the result is deterministic.
pub fn rank(assets: &mut [NormalizedAsset], state: SortState) {
    let mut collator = text_collator();
    if state.ascending {
        assets.sort_by(|a, b| compare(a, b, state.key, &mut collator));
    } else {
        assets.sort_by(|a, b| compare(b, a, state.key, &mut collator));
    }
}

/// Loads the persisted sort state, falling back to the default when it is
/// missing or unreadable.
pub fn load_sort_state(kv: &dyn KeyValueStore) -> SortState {
    match store::get_json::<SortState>(kv, SORT_STATE_KEY) {
        Ok(Some(state)) => state,
        Ok(None) => SortState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored sort state is unusable. Falling back to the default.");
            SortState::default()
        }
    }
}

pub fn save_sort_state(kv: &dyn KeyValueStore, state: SortState) {
    if let Err(e) = store::set_json(kv, SORT_STATE_KEY, &state) {
        tracing::error!(error = %e, "Failed to persist sort state.");
    }
}

fn compare_text(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    // Lowercasing first keeps "Bitcoin" and "bitcoin" equal, so ties stay stable.
    collator.collate(a.to_lowercase().as_str(), b.to_lowercase().as_str())
}

fn compare_number(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
