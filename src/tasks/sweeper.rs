//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired cache items.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{remove_expired, ItemTable};

/// Spawns the task that sweeps expired items out of `items`.
///
/// The first sweep runs one full `interval` after spawning. Each tick takes
/// the table's write lock and removes every item whose expiry has passed.
/// The task exits as soon as `shutdown` fires or its sender is dropped;
/// a sweep already in progress completes first, and no final sweep runs.
pub(crate) fn spawn_sweeper(
    items: ItemTable,
    interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweeper with interval of {:?}", interval);

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Expiry sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = remove_expired(&items, Utc::now()).await;
                    if removed > 0 {
                        info!("Expiry sweep: removed {} expired items", removed);
                    } else {
                        debug!("Expiry sweep: no expired items found");
                    }
                }
            }
        }
    })
}
