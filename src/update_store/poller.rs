//! Periodic refresh task

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::UpdateStore;

/// Default tick period
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// What the refresh loop runs and how often
#[derive(Debug, Clone, Copy)]
pub struct RefreshSchedule {
    pub period: Duration,
    /// The billing balance is ungated, so every tick fetches it
    pub include_balance: bool,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            period: DEFAULT_REFRESH_PERIOD,
            include_balance: false,
        }
    }
}

/// Handle to a running refresh loop; dropping it stops the loop
#[derive(Debug)]
pub struct RefreshLoop {
    handle: JoinHandle<()>,
}

impl RefreshLoop {
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn a task that ticks the refresh operations without forcing
///
/// The first tick runs immediately. Must be called from within a tokio runtime.
pub fn spawn_refresh_loop(store: Arc<UpdateStore>, schedule: RefreshSchedule) -> RefreshLoop {
    log::trace!(
        "Starting refresh loop every {:?} (balance: {})",
        schedule.period,
        schedule.include_balance
    );

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(schedule.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            store.get_latest_version(false).await;
            store.update_usage(false).await;
            if schedule.include_balance {
                store.update_api2d_usage(false).await;
            }
        }
    });

    RefreshLoop { handle }
}
