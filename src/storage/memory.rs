//! In-RAM record store

extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::convert::Infallible;

use super::SnapshotStore;

/// Keeps records in a map; contents are lost on reset
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a record directly
    pub fn insert(&mut self, key: &str, bytes: Vec<u8>) {
        self.records.insert(key.to_string(), bytes);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    type Error = Infallible;

    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        self.insert(key, bytes.to_vec());
        Ok(())
    }
}
