//! Periodic background reload
//!
//! Each tick calls [`Catalog::refresh`]; a failed tick is logged by the catalog
//! and the published snapshot keeps serving until a later tick succeeds.

use fundex_core::Catalog;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Start the reload loop. Returns `None` when `interval` is zero.
pub fn spawn_refresh_task(catalog: Arc<Catalog>, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        info!("Background catalog refresh disabled");
        return None;
    }

    info!(interval_seconds = interval.as_secs(), "Starting background catalog refresh");
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; startup already loaded once.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Ok(snapshot) = catalog.refresh().await {
                debug!(generation = snapshot.generation, "Scheduled refresh published");
            }
        }
    }))
}
