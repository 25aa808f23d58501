// In crates/engine/src/watchlist.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use store::KeyValueStore;

/// Store key for the persisted `WatchSet`.
pub const WATCHLIST_KEY: &str = "watched_assets";

/// The set of asset ids the user is watching.
///
/// Membership only affects presentation, never ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchSet(BTreeSet<String>);

impl WatchSet {
    /// Flips membership of `id` and returns whether it is now watched.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WatchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        WatchSet(iter.into_iter().map(Into::into).collect())
    }
}

pub fn load_watchlist(kv: &dyn KeyValueStore) -> WatchSet {
    match store::get_json::<WatchSet>(kv, WATCHLIST_KEY) {
        Ok(Some(set)) => set,
        Ok(None) => WatchSet::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored watchlist is unusable. Starting with an empty one.");
            WatchSet::default()
        }
    }
}

pub fn save_watchlist(kv: &dyn KeyValueStore, set: &WatchSet) {
    if let Err(e) = store::set_json(kv, WATCHLIST_KEY, set) {
        tracing::error!(error = %e, "Failed to persist watchlist.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    #[test]
    fn test_toggle_is_an_involution() {
        let mut set = WatchSet::default();
        assert!(set.toggle("bitcoin"));
        assert!(set.is_watched("bitcoin"));
        assert!(!set.toggle("bitcoin"));
        assert!(!set.is_watched("bitcoin"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_watchlist_persists_as_json_array() {
        let store = MemoryStore::default();
        let set: WatchSet = ["solana", "bitcoin"].into_iter().collect();
        save_watchlist(&store, &set);
        assert_eq!(
            store.get(WATCHLIST_KEY).unwrap().as_deref(),
            Some(r#"["bitcoin","solana"]"#)
        );
        assert_eq!(load_watchlist(&store), set);
    }

    #[test]
    fn test_corrupt_watchlist_falls_back_to_empty() {
        let store = MemoryStore::default();
        store.set(WATCHLIST_KEY, r#"{"bitcoin":true}"#).unwrap();
        assert!(load_watchlist(&store).is_empty());
    }
}
