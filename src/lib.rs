//! Staleness-gated tracking of application updates and account usage
//!
//! [`UpdateStore`] keeps four remotely sourced values up to date:
//! - the latest upstream build (checked at most every 2 minutes)
//! - quota used / total from the primary metering API (at most once a minute)
//! - the prepaid balance from a secondary billing endpoint (every call)
//!
//! All collaborators (HTTP, metering, persistence, clock) are injected, so
//! the store can be driven entirely by test doubles.

pub mod config;
pub mod error;
pub mod http;
pub mod storage;
pub mod update_store;
pub mod usage;
pub mod version;

#[cfg(test)]
mod test_support;

pub use config::{BuildConfigProvider, ClientConfig, StaticBuildConfig, UpdateConfig};
pub use error::{Result, UpdateError};
pub use update_store::{
    spawn_refresh_loop, Collaborators, RefreshLoop, RefreshSchedule, UpdateState, UpdateStore,
};
pub use version::{format_version, BuildVersion, VersionScheme};
