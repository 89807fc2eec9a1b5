use embedded_sdmmc::{
    BlockDevice, Error, Mode, SdCard, SdCardError, TimeSource, VolumeIdx, VolumeManager,
};

extern crate alloc;
use alloc::vec::Vec;

use super::SnapshotStore;

/// Read chunk size; matches the card's block size
const READ_CHUNK_BYTES: usize = 512;

/// Snapshot records stored as files in the root directory of the first FAT
/// volume. Keys must be valid 8.3 file names.
///
/// These operations are blocking. They only run at startup and shutdown, so
/// they never compete with drawing for the bus.
pub struct SdCardStore<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    volume_mgr: VolumeManager<D, T, 4, 4, 1>,
}

impl<S, Dl, T> SdCardStore<SdCard<S, Dl>, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    Dl: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    /// Create a store on an SPI-attached card
    pub fn from_spi(spi: S, delay: Dl, ts: T) -> Self {
        Self::new(SdCard::new(spi, delay), ts)
    }
}

impl<D, T> SdCardStore<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    pub fn new(block_device: D, ts: T) -> Self {
        let volume_mgr = VolumeManager::new(block_device, ts);

        Self { volume_mgr }
    }
}

impl<D, T> SnapshotStore for SdCardStore<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    type Error = Error<D::Error>;

    fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let volume0 = self.volume_mgr.open_volume(VolumeIdx(0))?;
        let root_dir = volume0.open_root_dir()?;

        let file = match root_dir.open_file_in_dir(key, Mode::ReadOnly) {
            Ok(file) => file,
            Err(Error::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut bytes = Vec::with_capacity(file.length() as usize);
        let mut chunk = [0u8; READ_CHUNK_BYTES];
        loop {
            let read = file.read(&mut chunk)?;
            if read == 0 {
                break; // EOF
            }
            bytes.extend_from_slice(&chunk[..read]);
        }

        // Resources are closed on drop too; close explicitly to surface errors
        file.close()?;
        root_dir.close()?;
        volume0.close()?;

        Ok(Some(bytes))
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        let volume0 = self.volume_mgr.open_volume(VolumeIdx(0))?;
        let root_dir = volume0.open_root_dir()?;

        // Each save replaces the previous snapshot
        let file = root_dir.open_file_in_dir(key, Mode::ReadWriteCreateOrTruncate)?;
        file.write(bytes)?;

        file.close()?;
        root_dir.close()?;
        volume0.close()?;

        Ok(())
    }
}

/// Error type of a store backed by an SPI card
pub type SdCardStoreError = Error<SdCardError>;
