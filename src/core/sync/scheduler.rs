use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::SyncService;
use crate::core::clock::Clock;
use crate::core::feed::fetcher::FeedFetcher;
use crate::core::storage::Vault;

/// Runs a sync pass immediately and then once per `period` until `shutdown`
/// resolves. A pass always runs to completion before the next one can start;
/// ticks missed while a pass was running are dropped.
pub async fn run_every<F, V, C, S>(
    service: &SyncService<F, V, C>,
    period: Duration,
    shutdown: S,
) -> usize
where
    F: FeedFetcher,
    V: Vault,
    C: Clock,
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut passes = 0_usize;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                passes += 1;
                match service.sync_all().await {
                    Ok(report) => tracing::debug!(pass = passes, ?report, "scheduled pass done"),
                    Err(error) => tracing::error!(pass = passes, %error, "scheduled pass failed"),
                }
            }
        }
    }

    tracing::info!(passes, "scheduler stopped");
    passes
}
