//! On-disk record of the chart history

extern crate alloc;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::config::DisplaySettings;
use crate::ui::components::graph::Reading;

/// Current snapshot layout version
pub const SNAPSHOT_VERSION: u8 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Failed to decode snapshot: {0}")]
    Decode(postcard::Error),
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u8),
}

/// Chart readings plus the settings in effect when they were saved
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersistedSnapshot {
    pub version: u8,
    /// Save time, ms since the Unix epoch
    pub saved_at_ms: u64,
    /// Oldest first
    pub readings: Vec<Reading>,
    pub settings: DisplaySettings,
}

impl PersistedSnapshot {
    pub fn new(readings: Vec<Reading>, settings: DisplaySettings, saved_at_ms: u64) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at_ms,
            readings,
            settings,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = postcard::from_bytes(bytes).map_err(SnapshotError::Decode)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    /// Age at `now_ms`; a save time in the future counts as age zero
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.saved_at_ms)
    }
}
