//! Durable storage for the chart history
//!
//! The chart is saved as a single postcard-encoded [`PersistedSnapshot`] under
//! a fixed key. [`PersistenceGateway`] owns the save/load policy (staleness,
//! corruption handling) and talks to any backend implementing
//! [`SnapshotStore`]:
//!
//! - [`MemoryStore`] keeps records in RAM
//! - [`SdCardStore`] writes FAT files through `embedded-sdmmc`

extern crate alloc;
use alloc::vec::Vec;
use core::fmt::{Debug, Write};

use heapless::String;
use thiserror_no_std::Error;

pub mod gateway;
pub mod memory;
pub mod sd_card;
pub mod snapshot;

pub use gateway::{LoadOutcome, PersistenceGateway};
pub use memory::MemoryStore;
pub use sd_card::SdCardStore;
pub use snapshot::{PersistedSnapshot, SNAPSHOT_VERSION, SnapshotError};

/// Keyed byte-record storage backend
pub trait SnapshotStore {
    type Error: Debug;

    /// Read a whole record, `Ok(None)` if it does not exist
    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Create or replace a record
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Errors returned when saving a snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(postcard::Error),
    #[error("Storage backend error: {0}")]
    Backend(String<64>),
}

impl StorageError {
    /// Wrap a backend error, keeping as much of its debug text as fits
    pub fn backend<E: Debug>(error: &E) -> Self {
        let mut text = String::new();
        let _ = write!(text, "{:?}", error);
        Self::Backend(text)
    }
}
