//! Reading buffer for the history chart
//!
//! Provides the reading type and the fixed-capacity ring buffer that keeps the
//! most recent readings in arrival order while tracking the axis range.

extern crate alloc;
use alloc::vec::Vec;

use heapless::Deque;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::axis::AxisRange;
use super::{GraphError, GraphResult};

/// Render category attached to a reading
///
/// Selects the colour of the plotted point. A reading without a tag is drawn
/// in the default colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingTag {
    /// Below the fat-burn threshold
    OutOfZone,
    /// Fat-burn zone
    FatBurn,
    /// Cardio zone
    Cardio,
    /// Peak zone
    Peak,
}

/// A single sample ingested by the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sampled value (e.g. beats per minute)
    pub value: f32,
    /// Optional render category
    pub tag: Option<ReadingTag>,
    /// Milliseconds since the Unix epoch, when known
    pub timestamp_ms: Option<u64>,
}

impl Reading {
    /// Create an untagged reading without a timestamp
    pub const fn new(value: f32) -> Self {
        Self {
            value,
            tag: None,
            timestamp_ms: None,
        }
    }

    /// Attach a render category
    pub const fn with_tag(mut self, tag: ReadingTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Attach a timestamp
    pub const fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }
}

/// Whether an append widened the axis range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeUpdate {
    /// Reading fell inside the current range
    Unchanged,
    /// Range grew to include the reading
    Expanded,
}

/// Fixed-capacity buffer of readings, oldest first
///
/// `N` is the number of display slots. Once full, every append evicts the
/// oldest reading so the buffer always holds the `N` most recent readings.
pub struct SeriesBuffer<const N: usize> {
    items: Deque<Reading, N>,
    range: AxisRange,
}

impl<const N: usize> SeriesBuffer<N> {
    /// Create an empty buffer with an initial axis range
    pub fn new(min: f32, max: f32) -> Self {
        const { assert!(N > 0, "SeriesBuffer capacity must be non-zero") };

        Self {
            items: Deque::new(),
            range: AxisRange::new(min, max),
        }
    }

    /// Set the axis bounds explicitly
    ///
    /// Readings already in the buffer are not re-clipped.
    pub fn set_range(&mut self, min: f32, max: f32) {
        self.range = AxisRange::new(min, max);
    }

    /// Current axis range
    pub fn range(&self) -> AxisRange {
        self.range
    }

    /// Append a reading, expanding the range and evicting the oldest reading
    /// when full
    ///
    /// Non-finite values are rejected and leave the buffer untouched.
    pub fn append(&mut self, reading: Reading) -> GraphResult<RangeUpdate> {
        if !reading.value.is_finite() {
            return Err(GraphError::NonFiniteValue);
        }

        let mut update = RangeUpdate::Unchanged;
        if reading.value < self.range.min {
            self.set_range(reading.value, self.range.max);
            update = RangeUpdate::Expanded;
        } else if reading.value > self.range.max {
            self.set_range(self.range.min, reading.value);
            update = RangeUpdate::Expanded;
        }

        if self.items.is_full()
            && let Some(evicted) = self.items.pop_front()
        {
            debug!("Evicted reading {} from full series", evicted.value);
        }

        // A slot was freed above when the buffer was full
        let _ = self.items.push_back(reading);

        Ok(update)
    }

    /// Bulk-load readings, replacing the current contents
    ///
    /// Only the most recent `N` readings are kept and the range is recomputed
    /// from them, overriding the previous range. An empty input (or one with
    /// no finite values) is ignored and returns `false`.
    pub fn replace(&mut self, readings: &[Reading]) -> bool {
        let finite = readings.iter().filter(|r| r.value.is_finite());
        let count = finite.clone().count();
        if count == 0 {
            return false;
        }

        if count != readings.len() {
            warn!(
                "Dropped {} non-finite readings while loading series",
                readings.len() - count
            );
        }

        let skip = count.saturating_sub(N);
        if skip > 0 {
            debug!("Loaded series exceeds capacity {}, keeping newest", N);
        }

        self.items.clear();
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for reading in finite.skip(skip) {
            min = min.min(reading.value);
            max = max.max(reading.value);
            let _ = self.items.push_back(*reading);
        }

        self.set_range(min, max);
        true
    }

    /// Remove every reading; the axis range is kept
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over the readings, oldest first
    pub fn readings(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.items.iter()
    }

    /// Copy the readings out, oldest first
    pub fn to_vec(&self) -> Vec<Reading> {
        self.items.iter().copied().collect()
    }

    /// Most recently appended reading
    pub fn latest(&self) -> Option<&Reading> {
        self.items.back()
    }

    /// Number of readings held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the buffer holds no readings
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the next append will evict
    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    /// Maximum number of readings (the number of display slots)
    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn values<const N: usize>(buffer: &SeriesBuffer<N>) -> Vec<f32> {
        buffer.readings().map(|r| r.value).collect()
    }

    #[test]
    fn test_append_within_range_keeps_range() {
        let mut buffer = SeriesBuffer::<4>::new(60.0, 180.0);
        let update = buffer.append(Reading::new(90.0)).unwrap();

        assert_eq!(update, RangeUpdate::Unchanged);
        assert_eq!(buffer.range(), AxisRange::new(60.0, 180.0));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_append_expands_range_both_ways() {
        let mut buffer = SeriesBuffer::<4>::new(60.0, 180.0);

        assert_eq!(
            buffer.append(Reading::new(45.0)).unwrap(),
            RangeUpdate::Expanded
        );
        assert_eq!(buffer.range(), AxisRange::new(45.0, 180.0));

        assert_eq!(
            buffer.append(Reading::new(200.0)).unwrap(),
            RangeUpdate::Expanded
        );
        assert_eq!(buffer.range(), AxisRange::new(45.0, 200.0));
    }

    #[test]
    fn test_range_never_shrinks() {
        let mut buffer = SeriesBuffer::<2>::new(60.0, 180.0);
        buffer.append(Reading::new(30.0)).unwrap();
        buffer.append(Reading::new(70.0)).unwrap();
        buffer.append(Reading::new(80.0)).unwrap();

        // 30 has been evicted but the range still covers it
        assert_eq!(values(&buffer), vec![70.0, 80.0]);
        assert_eq!(buffer.range().min, 30.0);
    }

    #[test]
    fn test_eviction_is_fifo() {
        let mut buffer = SeriesBuffer::<3>::new(0.0, 10.0);
        for v in 0..4 {
            buffer.append(Reading::new(v as f32)).unwrap();
        }

        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
        assert_eq!(values(&buffer), vec![1.0, 2.0, 3.0]);
        assert_eq!(buffer.latest().map(|r| r.value), Some(3.0));
    }

    #[test]
    fn test_non_finite_reading_rejected() {
        let mut buffer = SeriesBuffer::<3>::new(0.0, 10.0);
        buffer.append(Reading::new(5.0)).unwrap();

        assert_eq!(
            buffer.append(Reading::new(f32::NAN)),
            Err(GraphError::NonFiniteValue)
        );
        assert_eq!(
            buffer.append(Reading::new(f32::INFINITY)),
            Err(GraphError::NonFiniteValue)
        );
        assert_eq!(values(&buffer), vec![5.0]);
        assert_eq!(buffer.range(), AxisRange::new(0.0, 10.0));
    }

    #[test]
    fn test_replace_recomputes_range_from_loaded_readings() {
        let mut buffer = SeriesBuffer::<8>::new(60.0, 180.0);
        let loaded = [Reading::new(5.0), Reading::new(9.0), Reading::new(2.0)];

        assert!(buffer.replace(&loaded));
        assert_eq!(buffer.range(), AxisRange::new(2.0, 9.0));
        assert_eq!(buffer.to_vec(), loaded.to_vec());
    }

    #[test]
    fn test_replace_empty_is_noop() {
        let mut buffer = SeriesBuffer::<4>::new(60.0, 180.0);
        buffer.append(Reading::new(100.0)).unwrap();

        assert!(!buffer.replace(&[]));
        assert!(!buffer.replace(&[Reading::new(f32::NAN)]));
        assert_eq!(values(&buffer), vec![100.0]);
        assert_eq!(buffer.range(), AxisRange::new(60.0, 180.0));
    }

    #[test]
    fn test_replace_keeps_most_recent_when_over_capacity() {
        let mut buffer = SeriesBuffer::<3>::new(0.0, 1.0);
        let loaded: Vec<Reading> = (1..=5).map(|v| Reading::new(v as f32 * 10.0)).collect();

        assert!(buffer.replace(&loaded));
        assert_eq!(values(&buffer), vec![30.0, 40.0, 50.0]);
        assert_eq!(buffer.range(), AxisRange::new(30.0, 50.0));
    }

    #[test]
    fn test_clear_preserves_range() {
        let mut buffer = SeriesBuffer::<4>::new(60.0, 180.0);
        buffer.append(Reading::new(40.0)).unwrap();
        buffer.append(Reading::new(190.0)).unwrap();
        let before = buffer.range();

        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.readings().count(), 0);
        assert_eq!(buffer.range(), before);
    }

    #[test]
    fn test_tags_and_timestamps_are_kept() {
        let mut buffer = SeriesBuffer::<2>::new(60.0, 180.0);
        let reading = Reading::new(150.0)
            .with_tag(ReadingTag::Cardio)
            .with_timestamp(1_700_000_000_000);
        buffer.append(reading).unwrap();

        assert_eq!(buffer.latest(), Some(&reading));
        assert_eq!(buffer.capacity(), 2);
    }
}
