use std::time::Duration;
use storage::Db;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Periodically purges weekly view rows that belong to past weeks.
pub fn spawn_weekly_reset(db: Db, every: Duration) -> JoinHandle<()> {
    info!("Weekly view reset scheduled every {:?}", every);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = db.reset_weekly_views().await {
                error!("Weekly view reset failed: {}", e);
            }
        }
    })
}
