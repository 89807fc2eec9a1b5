//! Scrolling history chart for embedded displays
//!
//! The chart is split into three layers:
//!
//! - [`SeriesBuffer`]: a fixed-capacity, oldest-first buffer of [`Reading`]s
//!   that tracks the vertical axis range. The range only ever expands while
//!   appending.
//! - [`GraphWidget`]: binds a buffer to `N` display slots and recomputes every
//!   slot's position and colour (plus the high/mid/low axis labels) each time
//!   the buffer changes.
//! - [`PlotThrottle`]: limits how often readings are plotted, so a fast sensor
//!   does not scroll the chart faster than its time scale.
//!
//! # Memory Characteristics
//!
//! The capacity is a const generic, so a `GraphWidget<N>` never allocates:
//! the buffer is a `heapless::Deque` and the slots are a plain array.
//!
//! # Examples
//!
//! ```ignore
//! use pulse_rs::ui::components::graph::*;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::Rectangle;
//!
//! let bounds = Rectangle::new(Point::new(40, 120), Size::new(240, 100));
//! let mut graph = GraphWidget::<24>::new(bounds, 60.0, 180.0);
//!
//! graph.push(Reading::new(72.0).with_timestamp(now_ms));
//! graph.draw(&mut display)?;
//! ```

use thiserror_no_std::Error;

mod axis;
mod component;
pub mod constants;
pub mod series;
mod throttle;

pub use axis::{AxisLabels, AxisRange, format_label};
pub use component::{GraphWidget, NewestEdge, Slot, TagPalette, layout_slots};
pub use series::{RangeUpdate, Reading, ReadingTag, SeriesBuffer};
pub use throttle::PlotThrottle;

/// Error types for graph operations
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// Reading value was NaN or infinite
    #[error("Reading value is not finite")]
    NonFiniteValue,

    /// Invalid axis bounds
    #[error("Invalid axis range (min: {min}, max: {max})")]
    InvalidRange {
        /// Requested lower bound
        min: f32,
        /// Requested upper bound
        max: f32,
    },
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
