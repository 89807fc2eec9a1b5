//! Save/restore policy for the chart history
//!
//! History is written once on shutdown and read once on startup. Loading never
//! fails: every problem resolves to an empty chart, but the [`LoadOutcome`]
//! still says why so it can be logged and tested.

extern crate alloc;
use alloc::vec::Vec;

use log::{debug, info, warn};

use super::snapshot::PersistedSnapshot;
use super::{SnapshotStore, StorageError};
use crate::config::DisplaySettings;
use crate::ui::components::graph::{Reading, SeriesBuffer};

/// Result of reading the persisted history
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing has been saved yet
    Missing,
    /// The backend failed to read the record
    Unreadable,
    /// The record exists but could not be decoded
    Corrupt,
    /// Too old to plot; only the settings are kept
    Stale {
        settings: DisplaySettings,
        age_ms: u64,
    },
    Restored {
        readings: Vec<Reading>,
        settings: DisplaySettings,
        age_ms: u64,
    },
}

impl LoadOutcome {
    /// Readings to plot, empty unless restored
    pub fn readings(&self) -> &[Reading] {
        match self {
            Self::Restored { readings, .. } => readings,
            _ => &[],
        }
    }

    /// Persisted settings, when the record was decodable
    pub fn settings(&self) -> Option<DisplaySettings> {
        match self {
            Self::Stale { settings, .. } | Self::Restored { settings, .. } => Some(*settings),
            _ => None,
        }
    }

    pub fn is_restored(&self) -> bool {
        matches!(self, Self::Restored { .. })
    }
}

/// Persists the chart under a fixed key of a [`SnapshotStore`]
pub struct PersistenceGateway<S: SnapshotStore> {
    store: S,
    key: &'static str,
}

impl<S: SnapshotStore> PersistenceGateway<S> {
    pub fn new(store: S, key: &'static str) -> Self {
        Self { store, key }
    }

    /// Write the buffer contents and settings, stamped with `now_ms`
    pub fn save<const N: usize>(
        &mut self,
        buffer: &SeriesBuffer<N>,
        settings: DisplaySettings,
        now_ms: u64,
    ) -> Result<(), StorageError> {
        let snapshot = PersistedSnapshot::new(buffer.to_vec(), settings, now_ms);
        let bytes = snapshot.encode().map_err(StorageError::Encode)?;

        self.store
            .write(self.key, &bytes)
            .map_err(|e| StorageError::backend(&e))?;

        info!(
            "Saved {} readings ({} bytes) to {}",
            snapshot.readings.len(),
            bytes.len(),
            self.key
        );
        Ok(())
    }

    /// Read the saved history
    ///
    /// Readings saved `max_age_ms` or longer before `now_ms` are discarded.
    pub fn load(&mut self, now_ms: u64, max_age_ms: u64) -> LoadOutcome {
        let bytes = match self.store.read(self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No saved history under {}", self.key);
                return LoadOutcome::Missing;
            }
            Err(e) => {
                warn!("Failed to read {}: {:?}", self.key, e);
                return LoadOutcome::Unreadable;
            }
        };

        let snapshot = match PersistedSnapshot::decode(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Discarding corrupt history in {}: {}", self.key, e);
                return LoadOutcome::Corrupt;
            }
        };

        let age_ms = snapshot.age_ms(now_ms);
        if age_ms >= max_age_ms {
            info!(
                "Discarding {} stale readings ({} ms old)",
                snapshot.readings.len(),
                age_ms
            );
            return LoadOutcome::Stale {
                settings: snapshot.settings,
                age_ms,
            };
        }

        info!(
            "Restored {} readings ({} ms old)",
            snapshot.readings.len(),
            age_ms
        );
        LoadOutcome::Restored {
            readings: snapshot.readings,
            settings: snapshot.settings,
            age_ms,
        }
    }
}
