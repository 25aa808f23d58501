// In crates/engine/src/lib.rs

pub mod error;
pub mod normalizer;
pub mod ranking;
pub mod task;
pub mod view;
pub mod watchlist;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use core_types::{Column, NormalizedAsset, Snapshot, SortState};
use store::KeyValueStore;

pub use error::{Error, Result};
pub use normalizer::{NormalizedBatch, Normalizer};
pub use ranking::SortRequest;
pub use task::RefreshTask;
pub use view::{RankedRow, RankedView};
pub use watchlist::WatchSet;

/// A `Dashboard` shared between the refresh task and request handlers.
pub type SharedDashboard = Arc<Mutex<Dashboard>>;

/// Owns everything the presentation layer needs: the persisted sort state,
/// the watchlist and the ranked table of the latest good snapshot.
///
/// Every operation is synchronous. A refresh is computed in full before it
/// replaces the current table, and a failed refresh leaves the current table
/// untouched.
pub struct Dashboard {
    store: Arc<dyn KeyValueStore>,
    normalizer: Normalizer,
    sort: SortState,
    watchlist: WatchSet,
    timestamp: Option<DateTime<Utc>>,
    /// Assets of the latest good snapshot, already ranked by `sort`.
    ranked: Vec<NormalizedAsset>,
    view: Arc<RankedView>,
}

impl Dashboard {
    /// Creates a dashboard, restoring sort state and watchlist from `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, normalizer: Normalizer) -> Self {
        let sort = ranking::load_sort_state(store.as_ref());
        let watchlist = watchlist::load_watchlist(store.as_ref());
        tracing::info!(?sort, watched = watchlist.len(), "Restored dashboard preferences.");

        Self {
            store,
            normalizer,
            sort,
            watchlist,
            timestamp: None,
            ranked: Vec::new(),
            view: Arc::new(RankedView::empty(sort)),
        }
    }

    pub fn shared(self) -> SharedDashboard {
        Arc::new(Mutex::new(self))
    }

    /// The current ranked table. Cheap to clone and safe to hold across refreshes.
    pub fn view(&self) -> Arc<RankedView> {
        Arc::clone(&self.view)
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn watchlist(&self) -> &WatchSet {
        &self.watchlist
    }

    /// Normalizes, classifies and ranks a new snapshot, then swaps it in.
    ///
    /// The persisted sort state is re-applied verbatim so that order stays
    /// consistent with it as values change.
    pub fn refresh(&mut self, snapshot: &Snapshot) -> Result<Arc<RankedView>> {
        let records = normalizer::collect_records(&snapshot.coins)?;
        let NormalizedBatch { mut assets, malformed } = self.normalizer.normalize_batch(&records)?;
        if malformed > 0 {
            tracing::warn!(malformed, total = assets.len(), "Snapshot contained malformed records.");
        }

        let sort = self.apply(SortRequest::Reapply(self.sort));
        ranking::rank(&mut assets, sort);

        self.timestamp = snapshot.timestamp;
        self.ranked = assets;
        self.rebuild_view();
        tracing::info!(assets = self.ranked.len(), ?sort, "Dashboard refreshed.");
        Ok(self.view())
    }

    /// Handles a column header activation and returns the re-ranked table.
    pub fn column_activated(&mut self, column: Column) -> Arc<RankedView> {
        let before = self.sort;
        let after = self.apply(SortRequest::Activate(column));
        if after != before {
            ranking::rank(&mut self.ranked, after);
            self.rebuild_view();
        }
        self.view()
    }

    /// Flips watch membership of `id`; the ranking order is untouched.
    pub fn toggle_watch(&mut self, id: &str) -> (bool, Arc<RankedView>) {
        let watched = self.watchlist.toggle(id);
        watchlist::save_watchlist(self.store.as_ref(), &self.watchlist);
        tracing::info!(id, watched, "Watchlist updated.");
        self.rebuild_view();
        (watched, self.view())
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.watchlist.is_watched(id)
    }

    /// Runs a sort transition and persists the result. No-op requests leave
    /// both the state and the store alone.
    fn apply(&mut self, request: SortRequest) -> SortState {
        if let Some(next) = ranking::transition(self.sort, request) {
            self.sort = next;
            ranking::save_sort_state(self.store.as_ref(), next);
        }
        self.sort
    }

    fn rebuild_view(&mut self) {
        self.view = Arc::new(RankedView::build(
            self.timestamp,
            self.sort,
            &self.ranked,
            &self.watchlist,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{SignalCategory, SortKey};
    use serde_json::{Value, json};
    use store::MemoryStore;

    fn coin(id: &str, price: f64, volume: f64, pct24h: f64) -> Value {
        json!({
            "id": id,
            "name": id.to_uppercase(),
            "symbol": &id[..3],
            "current_price": price,
            "market_cap": price * 1_000.0,
            "total_volume": volume,
            "price_change_percentage_24h": pct24h,
            "sparkline_in_7d": { "price": [price * 0.9, price * 0.95, price] }
        })
    }

    fn snapshot(coins: Vec<Value>) -> Snapshot {
        Snapshot {
            timestamp: Some(Utc::now()),
            coins: Value::Array(coins),
        }
    }

    fn market() -> Snapshot {
        snapshot(vec![
            coin("bitcoin", 64_000.0, 30.0, 1.5),
            coin("ethereum", 3_000.0, 20.0, -3.0),
            coin("solana", 150.0, 10.0, 7.0),
        ])
    }

    fn dashboard(store: Arc<dyn KeyValueStore>) -> Dashboard {
        Dashboard::new(store, Normalizer::default())
    }

    #[test]
    fn test_refresh_ranks_by_default_sort() {
        let mut board = dashboard(Arc::new(MemoryStore::default()));
        assert!(board.view().rows.is_empty());

        let view = board.refresh(&market()).unwrap();
        assert_eq!(view.ids(), vec!["solana", "bitcoin", "ethereum"]);
        assert_eq!(view.sort, SortState::default());
        assert_eq!(view.rows[0].asset.signal, SignalCategory::Buy);
    }

    #[test]
    fn test_column_activation_toggles_and_resets() {
        let mut board = dashboard(Arc::new(MemoryStore::default()));
        board.refresh(&market()).unwrap();

        let view = board.column_activated(Column::Price);
        assert_eq!(view.ids(), vec!["bitcoin", "ethereum", "solana"]);
        assert!(!view.sort.ascending);

        let view = board.column_activated(Column::Price);
        assert!(view.sort.ascending);
        assert_eq!(view.ids(), vec!["solana", "ethereum", "bitcoin"]);

        let view = board.column_activated(Column::Price);
        assert!(!view.sort.ascending);

        let view = board.column_activated(Column::Name);
        assert_eq!(view.sort.key, SortKey::Name);
        assert!(!view.sort.ascending);
        assert_eq!(view.ids(), vec!["solana", "ethereum", "bitcoin"]);
    }

    #[test]
    fn test_unsortable_column_changes_nothing() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        let mut board = dashboard(store.clone());
        let before = board.refresh(&market()).unwrap();
        store.set(ranking::SORT_STATE_KEY, "sentinel").unwrap();

        let after = board.column_activated(Column::Signal);
        assert_eq!(after, before);
        assert_eq!(store.get(ranking::SORT_STATE_KEY).unwrap().as_deref(), Some("sentinel"));
    }

    #[test]
    fn test_sort_state_survives_restart_without_toggling() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        {
            let mut board = dashboard(store.clone());
            board.column_activated(Column::Volume);
            let view = board.column_activated(Column::Volume);
            assert_eq!(
                view.sort,
                SortState {
                    key: SortKey::Volume,
                    ascending: true
                }
            );
        }

        let mut restarted = dashboard(store.clone());
        let expected = SortState {
            key: SortKey::Volume,
            ascending: true,
        };
        assert_eq!(restarted.sort_state(), expected);

        let view = restarted.refresh(&market()).unwrap();
        assert_eq!(view.sort, expected);
        assert_eq!(view.ids(), vec!["solana", "ethereum", "bitcoin"]);
        let view = restarted.refresh(&market()).unwrap();
        assert_eq!(view.sort, expected);
    }

    #[test]
    fn test_toggle_watch_never_reorders() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        let mut board = dashboard(store.clone());
        let original = board.refresh(&market()).unwrap().ids().join(",");

        let (watched, view) = board.toggle_watch("ethereum");
        assert!(watched);
        assert_eq!(view.ids().join(","), original);
        let row = view.rows.iter().find(|r| r.asset.id == "ethereum").unwrap();
        assert!(row.is_watched);

        board.toggle_watch("bitcoin");
        let (watched, view) = board.toggle_watch("ethereum");
        assert!(!watched);
        assert_eq!(view.ids().join(","), original);
        assert!(board.is_watched("bitcoin"));
        assert!(!board.is_watched("ethereum"));

        let restarted = dashboard(store);
        assert!(restarted.is_watched("bitcoin"));
        assert_eq!(restarted.watchlist().len(), 1);
    }

    #[test]
    fn test_malformed_snapshot_keeps_previous_view() {
        let mut board = dashboard(Arc::new(MemoryStore::default()));
        let good = board.refresh(&market()).unwrap();

        let broken = Snapshot {
            timestamp: Some(Utc::now()),
            coins: json!("rate limited"),
        };
        assert!(matches!(board.refresh(&broken), Err(Error::MalformedSnapshot(_))));
        assert_eq!(board.view(), good);
    }

    #[test]
    fn test_logged_error_body_keeps_previous_view() {
        let mut board = dashboard(Arc::new(MemoryStore::default()));
        let good = board.refresh(&market()).unwrap();

        let rate_limited = Snapshot {
            timestamp: Some(Utc::now()),
            coins: json!({ "status": { "error_code": 429, "error_message": "rate limited" } }),
        };
        assert!(matches!(board.refresh(&rate_limited), Err(Error::MalformedSnapshot(_))));
        assert_eq!(board.view(), good);
        assert_eq!(board.view().ids(), vec!["solana", "bitcoin", "ethereum"]);
    }

    #[test]
    fn test_keyed_snapshot_is_accepted() {
        let mut board = dashboard(Arc::new(MemoryStore::default()));
        let keyed = Snapshot {
            timestamp: None,
            coins: json!({
                "bitcoin": coin("bitcoin", 64_000.0, 30.0, 1.5),
                "solana": coin("solana", 150.0, 10.0, 7.0),
            }),
        };
        let view = board.refresh(&keyed).unwrap();
        assert_eq!(view.ids(), vec!["solana", "bitcoin"]);
        assert!(view.timestamp.is_none());
    }

    #[test]
    fn test_corrupt_preferences_fall_back_to_defaults() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        store.set(ranking::SORT_STATE_KEY, "{").unwrap();
        store.set(watchlist::WATCHLIST_KEY, "[1,2").unwrap();

        let board = dashboard(store);
        assert_eq!(board.sort_state(), SortState::default());
        assert!(board.watchlist().is_empty());
    }
}
