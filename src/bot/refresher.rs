//! Periodic admin cache refresh.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::fanout::{FanOutAction, FanOutExecutor};

/// Refresh the admin cache of every directory chat every `period`.
///
/// The first run happens immediately. A slow run delays the next tick
/// instead of stacking runs.
pub fn spawn(fanout: FanOutExecutor, period: Duration) -> JoinHandle<()> {
    info!("Admin cache refresh every {:?}", period);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match fanout.propagate(FanOutAction::RefreshAdmins).await {
                Ok(report) => info!(
                    "Scheduled {}: success={}, failed={}",
                    report.action,
                    report.success_count(),
                    report.failure_count()
                ),
                Err(e) => error!("Scheduled admin refresh could not read directory: {:#}", e),
            }
        }
    })
}
