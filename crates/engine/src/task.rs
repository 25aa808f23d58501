// In crates/engine/src/task.rs

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use api_client::SnapshotSource;
use store::SnapshotLog;
use tokio::task;
use tokio::time::{self, MissedTickBehavior};

use crate::{Result, SharedDashboard};

/// A long-running task that periodically pulls a snapshot and refreshes the
/// dashboard.
pub struct RefreshTask {
    source: Arc<dyn SnapshotSource>,
    dashboard: SharedDashboard,
    // When set, every fetched snapshot is appended to the daily log.
    log: Option<SnapshotLog>,
    interval: Duration,
}

impl RefreshTask {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        dashboard: SharedDashboard,
        log: Option<SnapshotLog>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            dashboard,
            log,
            interval,
        }
    }

    /// The main, long-running loop. The first refresh happens immediately.
    ///
    /// A refresh always runs to completion before the next tick is taken, and
    /// ticks missed meanwhile are skipped rather than queued.
    pub async fn run(&self) {
        tracing::info!(source = self.source.name(), interval_secs = self.interval.as_secs(), "Starting refresh task.");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = self.refresh_once().await {
                tracing::warn!(error = %e, "Refresh failed. Keeping the previous ranked table.");
            }
        }
    }

    /// Fetches one snapshot, logs it and swaps it into the dashboard.
    ///
    /// Logging, ranking and persisting the sort state touch the disk and the
    /// shared lock, so they run on the blocking pool.
    pub async fn refresh_once(&self) -> Result<()> {
        let snapshot = self.source.latest_snapshot().await?;

        let log = self.log.clone();
        let dashboard = Arc::clone(&self.dashboard);
        task::spawn_blocking(move || {
            if let Some(log) = &log {
                if let Err(e) = log.append(&snapshot) {
                    tracing::error!(error = %e, "Failed to append snapshot to the log.");
                }
            }

            let mut dashboard = dashboard.lock().unwrap_or_else(PoisonError::into_inner);
            dashboard.refresh(&snapshot).map(|_| ())
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dashboard, Error, Normalizer};
    use async_trait::async_trait;
    use chrono::Utc;
    use core_types::Snapshot;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use store::MemoryStore;

    /// Hands out scripted responses in order.
    struct ScriptedSource {
        responses: Mutex<VecDeque<api_client::Result<Snapshot>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<api_client::Result<Snapshot>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "Scripted"
        }

        async fn latest_snapshot(&self) -> api_client::Result<Snapshot> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(api_client::Error::NoSnapshot))
        }
    }

    fn snapshot(price: f64) -> Snapshot {
        Snapshot {
            timestamp: Some(Utc::now()),
            coins: json!([{ "id": "bitcoin", "current_price": price }]),
        }
    }

    fn shared_dashboard() -> SharedDashboard {
        Dashboard::new(Arc::new(MemoryStore::default()), Normalizer::default()).shared()
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_view() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot(100.0)),
            Err(api_client::Error::ApiError {
                status: 503,
                msg: "maintenance".to_string(),
            }),
        ]);
        let dashboard = shared_dashboard();
        let task = RefreshTask::new(Arc::new(source), dashboard.clone(), None, Duration::from_secs(20));

        task.refresh_once().await.unwrap();
        let good = dashboard.lock().unwrap().view();
        assert_eq!(good.rows[0].asset.price, 100.0);

        let result = task.refresh_once().await;
        assert!(matches!(result, Err(Error::SourceUnavailable(_))));
        assert_eq!(dashboard.lock().unwrap().view(), good);
    }

    #[tokio::test]
    async fn test_fetched_snapshots_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = SnapshotLog::new(dir.path());
        let source = ScriptedSource::new(vec![Ok(snapshot(1.0)), Ok(snapshot(2.0))]);
        let task = RefreshTask::new(
            Arc::new(source),
            shared_dashboard(),
            Some(log.clone()),
            Duration::from_secs(20),
        );

        task.refresh_once().await.unwrap();
        task.refresh_once().await.unwrap();

        let latest = log.latest().unwrap().unwrap();
        assert_eq!(latest.coins[0]["current_price"], json!(2.0));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_refresh_waits_for_dashboard_off_the_runtime() {
        let dashboard = shared_dashboard();
        let source = ScriptedSource::new(vec![Ok(snapshot(5.0))]);
        let task = Arc::new(RefreshTask::new(
            Arc::new(source),
            dashboard.clone(),
            None,
            Duration::from_secs(20),
        ));

        // Another thread holds the dashboard for a while.
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let holder = {
            let dashboard = dashboard.clone();
            std::thread::spawn(move || {
                let _guard = dashboard.lock().unwrap();
                locked_tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(300));
            })
        };
        locked_rx.recv().unwrap();

        let refresh = tokio::spawn({
            let task = Arc::clone(&task);
            async move { task.refresh_once().await }
        });

        // The single runtime thread stays free while the refresh waits.
        time::sleep(Duration::from_millis(30)).await;
        assert!(!refresh.is_finished());

        refresh.await.unwrap().unwrap();
        holder.join().unwrap();
        assert_eq!(dashboard.lock().unwrap().view().rows[0].asset.price, 5.0);
    }
}
