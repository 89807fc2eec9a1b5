//! Constants for chart rendering
//!
//! All magic numbers are defined here with descriptive names and units.

use embedded_graphics::pixelcolor::Rgb565;

use crate::ui::styling::{LIGHT_GRAY, WHITE};

/// Colour of a plotted point whose reading carries no tag
pub const DEFAULT_POINT_COLOR: Rgb565 = WHITE;

/// Colour of the high/mid/low axis labels
pub const DEFAULT_LABEL_COLOR: Rgb565 = LIGHT_GRAY;

/// Diameter of a plotted point in pixels
pub const POINT_DIAMETER_PX: u32 = 5;

/// Gap between the right edge of the axis labels and the plot area in pixels
pub const LABEL_GAP_PX: i32 = 4;

/// Vertical offset that centres a FONT_6X10 label on its baseline
pub const LABEL_BASELINE_OFFSET_PX: i32 = 4;

/// Maximum length of a formatted axis label (characters)
pub const MAX_AXIS_LABEL_LENGTH: usize = 8;
