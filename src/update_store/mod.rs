//! Update state container
//!
//! Tracks the local and upstream build versions, primary quota usage, and
//! the secondary billing balance. Each value is refreshed through its own
//! operation (see `commands`) and the whole record is persisted after
//! every change.

pub mod commands;
pub mod gate;
pub mod poller;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{default_data_dir, BuildConfigProvider, UpdateConfig, STORE_KEY};
use crate::error::{Result, UpdateError};
use crate::http::{BearerToken, HeaderSource, HttpTransport, ReqwestTransport};
use crate::storage::{FileStorage, StateStorage};
use crate::usage::{BalanceClient, MeteringApi, OpenAiMetering};
use crate::version::{format_version, BuildVersion, VersionResolver, VersionScheme};

pub use gate::{Clock, SystemClock};
pub use poller::{spawn_refresh_loop, RefreshLoop, RefreshSchedule};
pub use state::UpdateState;

/// External collaborators the store talks to
pub struct Collaborators {
    pub build_config: Arc<dyn BuildConfigProvider>,
    pub transport: Arc<dyn HttpTransport>,
    pub metering: Arc<dyn MeteringApi>,
    /// Headers for the secondary billing endpoint
    pub billing_headers: Arc<dyn HeaderSource>,
    pub storage: Arc<dyn StateStorage>,
    pub clock: Arc<dyn Clock>,
}

/// Long-lived update state, shared via `Arc`
pub struct UpdateStore {
    state: Mutex<UpdateState>,
    build_config: Arc<dyn BuildConfigProvider>,
    resolver: VersionResolver,
    metering: Arc<dyn MeteringApi>,
    balance: BalanceClient,
    storage: Arc<dyn StateStorage>,
    clock: Arc<dyn Clock>,
}

impl UpdateStore {
    /// Create the store, restoring persisted state when compatible
    pub fn new(config: UpdateConfig, deps: Collaborators) -> Self {
        let state = restore(deps.storage.as_ref(), config.version_scheme);

        Self {
            state: Mutex::new(state),
            build_config: deps.build_config,
            resolver: VersionResolver::new(deps.transport.clone(), &config.endpoints),
            metering: deps.metering,
            balance: BalanceClient::new(
                deps.transport,
                deps.billing_headers,
                config.endpoints.api2d_billing_url,
            ),
            storage: deps.storage,
            clock: deps.clock,
        }
    }

    /// Store wired to reqwest, the platform data dir, and bearer-token auth
    ///
    /// `api_key` authenticates both the metering API and the billing endpoint.
    pub fn with_defaults(
        config: UpdateConfig,
        build_config: Arc<dyn BuildConfigProvider>,
        api_key: &str,
    ) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        let headers: Arc<dyn HeaderSource> = Arc::new(BearerToken::new(api_key));
        let data_dir = default_data_dir().map_err(UpdateError::Storage)?;

        Ok(Self::new(
            config,
            Collaborators {
                build_config,
                metering: Arc::new(OpenAiMetering::new(transport.clone(), headers.clone())),
                transport,
                billing_headers: headers,
                storage: Arc::new(FileStorage::new(data_dir)),
                clock: Arc::new(SystemClock),
            },
        ))
    }

    /// Copy of the current record
    pub fn snapshot(&self) -> UpdateState {
        self.lock_state().clone()
    }

    pub fn version_scheme(&self) -> VersionScheme {
        self.lock_state().version_type
    }

    /// Display form of `raw` under the active scheme
    pub fn format_version(&self, raw: &str) -> String {
        format_version(self.version_scheme(), raw)
    }

    pub fn local_version(&self) -> BuildVersion {
        let state = self.lock_state();
        BuildVersion::new(state.version_type, state.version.as_str())
    }

    /// `None` until an upstream version has been resolved
    pub fn remote_version(&self) -> Option<BuildVersion> {
        let state = self.lock_state();
        if state.remote_version.is_empty() {
            return None;
        }
        Some(BuildVersion::new(state.version_type, state.remote_version.as_str()))
    }

    /// Whether upstream has a build other than the running one
    pub fn has_new_version(&self) -> bool {
        self.remote_version()
            .is_some_and(|remote| remote.display() != self.local_version().display())
    }

    fn lock_state(&self) -> MutexGuard<'_, UpdateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `f` and persist if anything changed
    fn update(&self, f: impl FnOnce(&mut UpdateState)) {
        let mut state = self.lock_state();
        let before = state.clone();
        f(&mut *state);
        if *state != before {
            self.persist(&state);
        }
    }

    /// Atomically check a staleness gate and stamp the attempt
    fn claim_window(
        &self,
        last_attempt: impl FnOnce(&mut UpdateState) -> &mut i64,
        min_interval_ms: i64,
        force: bool,
    ) -> bool {
        let mut state = self.lock_state();
        let now = self.clock.now_ms();
        let claimed = gate::claim(last_attempt(&mut *state), min_interval_ms, now, force);
        if claimed {
            self.persist(&state);
        }
        claimed
    }

    fn persist(&self, current: &UpdateState) {
        let result =
            state::encode(current).and_then(|contents| self.storage.save(STORE_KEY, &contents));
        if let Err(e) = result {
            log::error!("Failed to persist update state: {e}");
        }
    }
}

/// Load persisted state, falling back to defaults
fn restore(storage: &dyn StateStorage, scheme: VersionScheme) -> UpdateState {
    let restored = match storage.load(STORE_KEY) {
        Ok(Some(contents)) => state::decode(&contents),
        Ok(None) => None,
        Err(e) => {
            log::error!("Failed to load update state: {e}");
            None
        }
    };

    let mut state = restored.unwrap_or_default();
    if state.version_type != scheme {
        log::debug!(
            "Version scheme changed from {:?} to {scheme:?}, discarding upstream version",
            state.version_type
        );
        state.version_type = scheme;
        state.remote_version.clear();
        state.last_update = 0;
    }
    state
}
