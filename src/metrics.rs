//! Heart-rate zone classification
//!
//! Zones are derived from the wearer's maximum heart rate and select the
//! colour each plotted reading is drawn with.

use crate::ui::components::graph::{Reading, ReadingTag};

/// Fraction of max heart rate where the fat-burn zone starts
pub const FAT_BURN_FRACTION: f32 = 0.50;
/// Fraction of max heart rate where the cardio zone starts
pub const CARDIO_FRACTION: f32 = 0.70;
/// Fraction of max heart rate where the peak zone starts
pub const PEAK_FRACTION: f32 = 0.85;

/// Lower bounds (bpm) of each zone above out-of-zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateZones {
    pub fat_burn: f32,
    pub cardio: f32,
    pub peak: f32,
}

impl HeartRateZones {
    pub fn from_max(max_bpm: f32) -> Self {
        Self {
            fat_burn: max_bpm * FAT_BURN_FRACTION,
            cardio: max_bpm * CARDIO_FRACTION,
            peak: max_bpm * PEAK_FRACTION,
        }
    }

    /// Zone a heart rate falls into; each lower bound belongs to its zone
    pub fn classify(&self, bpm: f32) -> ReadingTag {
        if bpm >= self.peak {
            ReadingTag::Peak
        } else if bpm >= self.cardio {
            ReadingTag::Cardio
        } else if bpm >= self.fat_burn {
            ReadingTag::FatBurn
        } else {
            ReadingTag::OutOfZone
        }
    }

    /// Build a chart reading tagged with its zone
    pub fn reading(&self, bpm: f32, timestamp_ms: u64) -> Reading {
        Reading::new(bpm)
            .with_tag(self.classify(bpm))
            .with_timestamp(timestamp_ms)
    }
}
