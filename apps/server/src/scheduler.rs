//! Background sweeper that drops finished export tasks past their TTL.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::main_lib::AppState;

/// Evicts expired export tasks every `period`. The first sweep runs one
/// period after start.
pub fn start_export_sweeper(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    info!("Export sweeper running every {:?}", period);
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = state.export_service.evict_expired();
            if evicted > 0 {
                info!("Evicted {} expired export tasks", evicted);
            } else {
                debug!("No expired export tasks");
            }
        }
    })
}
