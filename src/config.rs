//! Configuration for update state tracking
//!
//! Fixed upstream endpoints, storage key, gate intervals, and the local
//! build configuration provider.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::version::VersionScheme;

/// Upstream repository checked for new builds
pub const UPSTREAM_REPO: &str = "Yidadaa/ChatGPT-Next-Web";

/// Latest commit on the default branch (date scheme)
pub const FETCH_COMMIT_URL: &str =
    "https://api.github.com/repos/Yidadaa/ChatGPT-Next-Web/commits?per_page=1";

/// Latest release tag (tag scheme)
pub const FETCH_TAG_URL: &str =
    "https://api.github.com/repos/Yidadaa/ChatGPT-Next-Web/tags?per_page=1";

/// Secondary billing endpoint reporting the prepaid balance
pub const API2D_BILLING_URL: &str = "https://stream.api2d.net/dashboard/billing/credit_grants";

/// Base URL of the primary metering API
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Key the update state is persisted under
pub const STORE_KEY: &str = "chat-update";

/// Schema version of the persisted envelope
pub const STORE_VERSION: u32 = 1;

/// Minimum interval between version checks
pub const VERSION_CHECK_INTERVAL_MS: i64 = 2 * 60 * 1000;

/// Minimum interval between usage checks
pub const USAGE_CHECK_INTERVAL_MS: i64 = 60 * 1000;

/// Directory name under the platform data dir
const DATA_DIR_NAME: &str = "update-state";

/// Remote endpoints used by the refresh operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub commit_url: String,
    pub tag_url: String,
    pub api2d_billing_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            commit_url: FETCH_COMMIT_URL.to_string(),
            tag_url: FETCH_TAG_URL.to_string(),
            api2d_billing_url: API2D_BILLING_URL.to_string(),
        }
    }
}

/// Settings fixed at store construction
#[derive(Debug, Clone, Default)]
pub struct UpdateConfig {
    /// Versioning scheme of the running build
    pub version_scheme: VersionScheme,
    pub endpoints: Endpoints,
}

/// Build-time identity of the running application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Semantic version, e.g. `v2.9.13`
    pub version: String,
    /// Commit time as an epoch-millisecond string
    pub commit_date: String,
}

impl ClientConfig {
    /// The local identifier in the raw form of `scheme`
    pub fn version_for(&self, scheme: VersionScheme) -> &str {
        match scheme {
            VersionScheme::Date => &self.commit_date,
            VersionScheme::Tag => &self.version,
        }
    }
}

/// Supplies the local build configuration
pub trait BuildConfigProvider: Send + Sync {
    /// `None` when no build configuration is available
    fn client_config(&self) -> Option<ClientConfig>;
}

/// Build configuration known up front
#[derive(Debug, Clone, Default)]
pub struct StaticBuildConfig(Option<ClientConfig>);

impl StaticBuildConfig {
    pub fn new(version: impl Into<String>, commit_date: impl Into<String>) -> Self {
        Self(Some(ClientConfig {
            version: version.into(),
            commit_date: commit_date.into(),
        }))
    }

    /// A provider with no configuration at all
    pub fn missing() -> Self {
        Self(None)
    }
}

impl BuildConfigProvider for StaticBuildConfig {
    fn client_config(&self) -> Option<ClientConfig> {
        self.0.clone()
    }
}

/// Get the directory persisted state is stored in
///
/// Returns: `~/Library/Application Support/update-state/` (macOS)
///          `~/.local/share/update-state/` (Linux)
///          `%APPDATA%/update-state/` (Windows)
pub fn default_data_dir() -> Result<PathBuf, String> {
    let data_dir = dirs::data_dir().ok_or("Could not determine data directory")?;
    Ok(data_dir.join(DATA_DIR_NAME))
}
