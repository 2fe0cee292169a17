use std::sync::Arc;
use std::time::Duration;

use nw_core::{Result, WatchConfig};
use nw_storage::{persist_shared, SharedStore};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::dedupe::Deduplicator;
use crate::source::CandidateSource;

/// Drives fetch → dedupe → persist cycles: the ticker fires once immediately
/// on startup and then at the configured interval. All ticks are consumed by
/// the one task inside [`run`](Self::run), so two cycles can never overlap;
/// a failed cycle is logged and the ticker keeps going.
pub struct RefreshScheduler {
    store: SharedStore,
    source: Arc<dyn CandidateSource>,
    deduplicator: Deduplicator,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(config: &WatchConfig, store: SharedStore, source: Arc<dyn CandidateSource>) -> Self {
        Self {
            store,
            source,
            deduplicator: Deduplicator::new(config),
            interval: config.interval,
        }
    }

    /// Runs until `shutdown` flips to true. An in-flight cycle finishes
    /// before the task exits; no further ticks are taken afterwards.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "refresh scheduler started, interval {}s",
            self.interval.as_secs()
        );
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.run_cycle().await {
                        // one bad cycle must not halt future cycles
                        error!("refresh cycle failed: {err}");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("refresh scheduler stopping");
                        return;
                    }
                }
            }
        }
    }

    /// One full fetch → dedupe → persist pass. Public so the CLI can run a
    /// single cycle without entering periodic mode.
    pub async fn run_cycle(&self) -> Result<()> {
        let candidates = self.source.fetch_candidates().await?;

        let outcome = {
            let store = self.store.read().await;
            self.deduplicator.dedupe(&candidates, &store)
        };
        if outcome.new_records.is_empty() {
            info!("no new articles found");
            return Ok(());
        }

        let new_count = outcome.new_records.len();
        let total = {
            let mut store = self.store.write().await;
            for (key, record) in outcome.new_records {
                store.insert(key, record);
            }
            store.len()
        };
        persist_shared(&self.store).await?;

        info!(
            "scraped {new_count} new articles ({} already known), total articles: {total}",
            outcome.skipped
        );
        Ok(())
    }
}
