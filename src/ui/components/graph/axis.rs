//! Axis range and label computation
//!
//! Maps values to the vertical display span and derives the three axis labels
//! (high, mid, low) shown next to the chart.

use heapless::String;
#[allow(unused_imports)]
use micromath::F32Ext;

use super::constants::MAX_AXIS_LABEL_LENGTH;
use super::{GraphError, GraphResult};

/// Vertical display range in value units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    /// Value mapped to the bottom of the chart
    pub min: f32,
    /// Value mapped to the top of the chart
    pub max: f32,
}

impl AxisRange {
    /// Create a range without validation
    ///
    /// Degenerate ranges are allowed; [`AxisRange::scale`] reports them.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Create a range, rejecting `max <= min` and non-finite bounds
    pub fn try_new(min: f32, max: f32) -> GraphResult<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(GraphError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Distance between the bounds
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Value units per display unit
    ///
    /// Returns `None` when either the range or the display span is zero or
    /// negative, so callers never divide by zero.
    pub fn scale(&self, display_span: f32) -> Option<f32> {
        let span = self.span();
        if !span.is_finite() || span <= 0.0 || display_span <= 0.0 {
            return None;
        }
        Some(span / display_span)
    }

    /// Map a value to a display offset measured down from the top
    ///
    /// The result is clamped to `[0, display_span]`. A degenerate range puts
    /// every value on the vertical midpoint.
    pub fn value_to_offset(&self, value: f32, display_span: f32) -> f32 {
        match self.scale(display_span) {
            Some(scale) => (display_span - (value - self.min) / scale).clamp(0.0, display_span),
            None => display_span.max(0.0) / 2.0,
        }
    }

    /// Midpoint of the range (the average of the bounds), rounded
    pub fn midpoint(&self) -> f32 {
        ((self.max + self.min) / 2.0).round()
    }
}

/// Text shown next to the chart for the current range
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    /// Upper bound
    pub high: f32,
    /// Rounded average of the bounds
    pub mid: f32,
    /// Lower bound
    pub low: f32,
}

impl AxisLabels {
    /// Derive the labels for a range
    pub fn from_range(range: AxisRange) -> Self {
        Self {
            high: range.max,
            mid: range.midpoint(),
            low: range.min,
        }
    }

    /// Formatted upper label
    pub fn high_text(&self) -> String<MAX_AXIS_LABEL_LENGTH> {
        format_label(self.high)
    }

    /// Formatted middle label
    pub fn mid_text(&self) -> String<MAX_AXIS_LABEL_LENGTH> {
        format_label(self.mid)
    }

    /// Formatted lower label
    pub fn low_text(&self) -> String<MAX_AXIS_LABEL_LENGTH> {
        format_label(self.low)
    }
}

/// Format an axis value, dropping the fraction for whole numbers
///
/// Uses a fixed-capacity heapless String to avoid heap allocations during
/// rendering. Values too wide for the label are truncated.
pub fn format_label(value: f32) -> String<MAX_AXIS_LABEL_LENGTH> {
    let mut s = String::new();
    if value.fract() == 0.0 {
        let _ = core::fmt::write(&mut s, format_args!("{:.0}", value));
    } else {
        let _ = core::fmt::write(&mut s, format_args!("{:.1}", value));
    }
    s
}
