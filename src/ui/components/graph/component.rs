//! Chart widget binding a series buffer to fixed display slots
//!
//! Every mutation re-lays out all slots from the buffer and the current axis
//! range, so the widget never holds stale positions.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};
use log::warn;

use crate::ui::core::Drawable;
use crate::ui::styling::{
    COLOR_BACKGROUND, COLOR_CARDIO, COLOR_FAT_BURN, COLOR_OUT_OF_ZONE, COLOR_PEAK,
};

use super::axis::{AxisLabels, AxisRange};
use super::constants::{
    DEFAULT_LABEL_COLOR, DEFAULT_POINT_COLOR, LABEL_BASELINE_OFFSET_PX, LABEL_GAP_PX,
    MAX_AXIS_LABEL_LENGTH, POINT_DIAMETER_PX,
};
use super::series::{RangeUpdate, Reading, ReadingTag, SeriesBuffer};

/// Which edge of the chart holds the most recent reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewestEdge {
    /// Newest reading in slot 0 (left), older readings to the right
    Start,
    /// Newest reading in slot `N - 1` (right), older readings to the left
    #[default]
    End,
}

impl NewestEdge {
    /// Slot index for the reading `recency` places back from the newest
    ///
    /// `recency` must be below `slot_count`.
    pub const fn slot_index(self, recency: usize, slot_count: usize) -> usize {
        match self {
            Self::Start => recency,
            Self::End => slot_count - 1 - recency,
        }
    }
}

/// Colours used for each reading tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagPalette {
    /// Colour for untagged readings
    pub default: Rgb565,
    /// Out-of-zone colour
    pub out_of_zone: Rgb565,
    /// Fat-burn colour
    pub fat_burn: Rgb565,
    /// Cardio colour
    pub cardio: Rgb565,
    /// Peak colour
    pub peak: Rgb565,
}

impl Default for TagPalette {
    fn default() -> Self {
        Self {
            default: DEFAULT_POINT_COLOR,
            out_of_zone: COLOR_OUT_OF_ZONE,
            fat_burn: COLOR_FAT_BURN,
            cardio: COLOR_CARDIO,
            peak: COLOR_PEAK,
        }
    }
}

impl TagPalette {
    /// Resolve the colour for an optional tag
    pub const fn color_for(&self, tag: Option<ReadingTag>) -> Rgb565 {
        match tag {
            None => self.default,
            Some(ReadingTag::OutOfZone) => self.out_of_zone,
            Some(ReadingTag::FatBurn) => self.fat_burn,
            Some(ReadingTag::Cardio) => self.cardio,
            Some(ReadingTag::Peak) => self.peak,
        }
    }
}

/// Render state of one display slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Whether a reading occupies this slot
    pub visible: bool,
    /// Vertical offset from the top of the chart, within `[0, height]`
    pub y: f32,
    /// Point colour
    pub color: Rgb565,
}

impl Slot {
    /// An empty, hidden slot
    pub const HIDDEN: Self = Self {
        visible: false,
        y: 0.0,
        color: DEFAULT_POINT_COLOR,
    };
}

/// Lay out every slot from the buffer
///
/// The reading `k` places back from the newest goes to
/// `newest_edge.slot_index(k, N)`. Slots without a reading are hidden.
pub fn layout_slots<const N: usize>(
    buffer: &SeriesBuffer<N>,
    display_height: f32,
    newest_edge: NewestEdge,
    palette: &TagPalette,
) -> [Slot; N] {
    let mut slots = [Slot::HIDDEN; N];
    let range = buffer.range();
    let len = buffer.len();

    for (age_index, reading) in buffer.readings().enumerate() {
        let recency = len - 1 - age_index;
        slots[newest_edge.slot_index(recency, N)] = Slot {
            visible: true,
            y: range.value_to_offset(reading.value, display_height),
            color: palette.color_for(reading.tag),
        };
    }

    slots
}

/// Area covered by a chart plotted in `plot`
///
/// Grows the plot by the label column on the left, a text row above and below
/// for the high/low labels, and a point's width on the right.
fn widget_area(plot: Rectangle) -> Rectangle {
    let glyph = FONT_6X10.character_size;
    let label_width = MAX_AXIS_LABEL_LENGTH as u32 * glyph.width + LABEL_GAP_PX as u32;

    Rectangle::new(
        plot.top_left - Point::new(label_width as i32, glyph.height as i32),
        plot.size + Size::new(label_width + POINT_DIAMETER_PX, 2 * glyph.height),
    )
}

/// Scrolling point chart with `N` slots
pub struct GraphWidget<const N: usize> {
    /// Plot area; labels are drawn just left of it
    plot: Rectangle,
    /// Everything the widget paints, labels included
    area: Rectangle,
    /// Readings and axis range
    buffer: SeriesBuffer<N>,
    /// Laid-out slots, refreshed on every mutation
    slots: [Slot; N],
    /// High/mid/low labels for the current range
    labels: AxisLabels,
    newest_edge: NewestEdge,
    palette: TagPalette,
    background_color: Rgb565,
    label_style: MonoTextStyle<'static, Rgb565>,
    /// Dirty flag for rendering optimization
    dirty: bool,
}

impl<const N: usize> GraphWidget<N> {
    /// Create an empty chart with an initial axis range
    pub fn new(bounds: Rectangle, min: f32, max: f32) -> Self {
        let buffer = SeriesBuffer::new(min, max);
        let labels = AxisLabels::from_range(buffer.range());

        Self {
            plot: bounds,
            area: widget_area(bounds),
            buffer,
            slots: [Slot::HIDDEN; N],
            labels,
            newest_edge: NewestEdge::default(),
            palette: TagPalette::default(),
            background_color: COLOR_BACKGROUND,
            label_style: MonoTextStyle::new(&FONT_6X10, DEFAULT_LABEL_COLOR),
            dirty: true,
        }
    }

    /// Set which edge holds the newest reading
    pub fn with_newest_edge(mut self, newest_edge: NewestEdge) -> Self {
        self.newest_edge = newest_edge;
        self.render();
        self
    }

    /// Set the tag colours
    pub fn with_palette(mut self, palette: TagPalette) -> Self {
        self.palette = palette;
        self.render();
        self
    }

    /// Set background color
    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background_color = color;
        self
    }

    /// Plot a reading
    ///
    /// Non-finite readings are dropped with a warning.
    pub fn push(&mut self, reading: Reading) {
        match self.buffer.append(reading) {
            Ok(RangeUpdate::Expanded) => {
                self.refresh_labels();
                self.render();
            }
            Ok(RangeUpdate::Unchanged) => self.render(),
            Err(e) => warn!("Dropping reading: {}", e),
        }
    }

    /// Replace the plotted readings (e.g. history restored at startup)
    ///
    /// Returns `false` and leaves the chart untouched for an empty input.
    pub fn set_readings(&mut self, readings: &[Reading]) -> bool {
        if !self.buffer.replace(readings) {
            return false;
        }
        self.refresh_labels();
        self.render();
        true
    }

    /// Remove every plotted reading, keeping the axis range
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.render();
    }

    /// Set the axis range explicitly
    pub fn set_range(&mut self, min: f32, max: f32) {
        self.buffer.set_range(min, max);
        self.refresh_labels();
        self.render();
    }

    /// Read-only access to the plotted readings
    pub fn series(&self) -> &SeriesBuffer<N> {
        &self.buffer
    }

    /// Current axis range
    pub fn range(&self) -> AxisRange {
        self.buffer.range()
    }

    /// Current axis labels
    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    /// Current slot layout
    pub fn slots(&self) -> &[Slot; N] {
        &self.slots
    }

    /// Area the points are plotted in, excluding labels
    pub fn plot_area(&self) -> Rectangle {
        self.plot
    }

    /// Edge holding the newest reading
    pub fn newest_edge(&self) -> NewestEdge {
        self.newest_edge
    }

    /// Screen position of a slot's point, if the slot is visible
    pub fn slot_center(&self, index: usize) -> Option<Point> {
        let slot = self.slots.get(index).filter(|slot| slot.visible)?;
        let width = self.plot.size.width as usize;
        let x = self.plot.top_left.x + (((2 * index + 1) * width) / (2 * N)) as i32;
        let y = self.plot.top_left.y + slot.y as i32;
        Some(Point::new(x, y))
    }

    /// Recompute every slot from the buffer
    fn render(&mut self) {
        self.slots = layout_slots(
            &self.buffer,
            self.plot.size.height as f32,
            self.newest_edge,
            &self.palette,
        );
        self.dirty = true;
    }

    fn refresh_labels(&mut self) {
        self.labels = AxisLabels::from_range(self.buffer.range());
    }

    fn draw_points<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        for index in 0..N {
            if let Some(center) = self.slot_center(index) {
                Circle::with_center(center, POINT_DIAMETER_PX)
                    .into_styled(PrimitiveStyle::with_fill(self.slots[index].color))
                    .draw(display)?;
            }
        }
        Ok(())
    }

    fn draw_labels<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let x = self.plot.top_left.x - LABEL_GAP_PX;
        let top = self.plot.top_left.y + LABEL_BASELINE_OFFSET_PX;
        let height = self.plot.size.height as i32;

        let rows = [
            (self.labels.high_text(), top),
            (self.labels.mid_text(), top + height / 2),
            (self.labels.low_text(), top + height),
        ];

        for (text, y) in rows.iter() {
            Text::with_alignment(
                text.as_str(),
                Point::new(x, *y),
                self.label_style,
                Alignment::Right,
            )
            .draw(display)?;
        }
        Ok(())
    }
}

impl<const N: usize> Drawable for GraphWidget<N> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        // Covers the labels too, so shrinking text leaves no old glyphs behind
        display.fill_solid(&self.area, self.background_color)?;
        self.draw_points(display)?;
        self.draw_labels(display)
    }

    fn bounds(&self) -> Rectangle {
        self.area
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
