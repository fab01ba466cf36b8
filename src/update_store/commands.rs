//! Refresh operations
//!
//! None of these return errors: failures are logged and the previously
//! known values stay in place.

use super::UpdateStore;
use crate::config::{USAGE_CHECK_INTERVAL_MS, VERSION_CHECK_INTERVAL_MS};
use crate::error::{Result, UpdateError};
use crate::version::VersionScheme;

impl UpdateStore {
    /// Refresh the local version and, at most every 2 minutes, the upstream one
    ///
    /// `force` bypasses the staleness gate.
    pub async fn get_latest_version(&self, force: bool) {
        let scheme = self.version_scheme();

        match self.read_local_version(scheme) {
            Ok(version) => self.update(|state| state.version = version),
            Err(e) => log::error!("Failed to read local version: {e}"),
        }

        if !self.claim_window(|state| &mut state.last_update, VERSION_CHECK_INTERVAL_MS, force) {
            log::trace!("Skipping upstream version check, last attempt is recent");
            return;
        }

        match self.resolver.resolve(scheme).await {
            Ok(Some(remote)) => {
                log::debug!("Got upstream version: {remote}");
                self.update(|state| state.remote_version = remote);
            }
            Ok(None) => log::debug!("Upstream has not published a version yet"),
            Err(e) => log::error!("Failed to fetch upstream version: {e}"),
        }
    }

    /// Refresh quota usage, at most once a minute unless `force` is set
    pub async fn update_usage(&self, force: bool) {
        if !self.claim_window(|state| &mut state.last_update_usage, USAGE_CHECK_INTERVAL_MS, force) {
            log::trace!("Skipping usage check, last attempt is recent");
            return;
        }

        match self.metering.usage().await {
            Ok(Some(usage)) => {
                log::debug!("Got usage: {} / {}", usage.used, usage.total);
                self.update(|state| {
                    state.used = Some(usage.used);
                    state.subscription = Some(usage.total);
                });
            }
            Ok(None) => log::debug!("Metering API reported no usage"),
            Err(e) => log::error!("Failed to fetch usage: {e}"),
        }
    }

    /// Refresh the secondary billing balance
    ///
    /// Not gated: every call fetches. `force` is accepted for symmetry with
    /// the other operations.
    pub async fn update_api2d_usage(&self, _force: bool) {
        match self.balance.fetch_balance().await {
            Ok(balance) => {
                log::debug!("Got billing balance: {balance}");
                self.update(|state| state.api2d_balance = Some(balance));
            }
            Err(e) => log::error!("Failed to fetch billing balance: {e}"),
        }
    }

    /// Run every refresh operation in turn
    pub async fn refresh_all(&self, force: bool) {
        self.get_latest_version(force).await;
        self.update_usage(force).await;
        self.update_api2d_usage(force).await;
    }

    fn read_local_version(&self, scheme: VersionScheme) -> Result<String> {
        let config = self.build_config.client_config().ok_or_else(|| {
            UpdateError::ConfigMissing("No build configuration available".to_string())
        })?;
        Ok(config.version_for(scheme).to_string())
    }
}
