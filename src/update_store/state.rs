//! Tracked fields and their persisted envelope

use serde::{Deserialize, Serialize};

use crate::config::STORE_VERSION;
use crate::error::Result;
use crate::version::VersionScheme;

/// Everything the update store tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateState {
    /// Active versioning scheme
    pub version_type: VersionScheme,
    /// Epoch ms of the last version check attempt
    pub last_update: i64,
    /// Local build identifier (raw form)
    pub version: String,
    /// Latest upstream identifier (raw form), empty until first resolved
    pub remote_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<f64>,
    /// Epoch ms of the last usage check attempt
    pub last_update_usage: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api2d_balance: Option<f64>,
}

impl Default for UpdateState {
    fn default() -> Self {
        Self {
            version_type: VersionScheme::Tag,
            last_update: 0,
            version: "unknown".to_string(),
            remote_version: String::new(),
            used: None,
            subscription: None,
            last_update_usage: 0,
            api2d_balance: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    state: &'a UpdateState,
    version: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    state: serde_json::Value,
    version: u32,
}

/// Serialize `state` with the current schema version
pub fn encode(state: &UpdateState) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        state,
        version: STORE_VERSION,
    })?)
}

/// Restore a persisted document, `None` if it is unusable
pub fn decode(contents: &str) -> Option<UpdateState> {
    let envelope: Envelope = match serde_json::from_str(contents) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::warn!("Discarding unreadable update state: {e}");
            return None;
        }
    };

    if envelope.version != STORE_VERSION {
        log::warn!(
            "Discarding update state with schema version {} (expected {STORE_VERSION})",
            envelope.version
        );
        return None;
    }

    match serde_json::from_value(envelope.state) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("Discarding malformed update state: {e}");
            None
        }
    }
}
