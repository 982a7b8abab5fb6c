//! Pane layout: one main price pane stacked over the subsidiary indicator panes.

use crate::coords::{PixelPos, PixelRect};

/// Width of the label column left of every pane.
pub const LEFT_LABEL_WIDTH: i32 = 10;
/// Width of the price label column right of every pane.
pub const RIGHT_LABEL_WIDTH: i32 = 55;
/// Vertical gap above each subsidiary pane.
pub const CHART_GAP: i32 = 2;
pub const BORDER_THICKNESS: i32 = 1;
pub const DEFAULT_SUBSIDIARY_HEIGHT_PERCENT: u32 = 20;

/// Computed pane rectangles for a chart.
///
/// Frames include the pane border; chart areas are the frames inset by the
/// border and are what every coordinate mapping uses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartLayout {
    frames: Vec<PixelRect>,
    price_labels: Vec<PixelRect>,
    full_frame: PixelRect,
}

impl ChartLayout {
    /// Split `bounds` into the main pane and `subsidiary_count` panes of
    /// `subsidiary_height_percent` of the height each, taken from the bottom.
    pub fn compute(bounds: PixelRect, subsidiary_count: usize, subsidiary_height_percent: u32) -> Self {
        let percent = i64::from(subsidiary_height_percent.min(100));
        let pane_height = (i64::from(bounds.height.max(0)) * percent / 100) as i32;

        let mut remaining = bounds;
        let mut frames = Vec::with_capacity(subsidiary_count + 1);
        let mut price_labels = Vec::with_capacity(subsidiary_count + 1);

        for _ in 0..subsidiary_count {
            let height = pane_height.min(remaining.height.max(0));
            let slice = PixelRect::new(remaining.x, remaining.bottom() - height, remaining.width, height);
            remaining.height -= height;

            let slice = PixelRect::new(slice.x, slice.y + CHART_GAP, slice.width, (slice.height - CHART_GAP).max(0));
            let (frame, label) = split_labels(slice);
            frames.push(frame);
            price_labels.push(label);
        }

        let (main_frame, main_label) = split_labels(remaining);
        frames.push(main_frame);
        price_labels.push(main_label);

        // Built bottom-up
        frames.reverse();
        price_labels.reverse();

        let (full_frame, _) = split_labels(bounds);
        Self {
            frames,
            price_labels,
            full_frame,
        }
    }

    pub fn pane_count(&self) -> usize {
        self.frames.len()
    }

    /// Pane frame including its border.
    pub fn frame(&self, chart_index: usize) -> Option<PixelRect> {
        self.frames.get(chart_index).copied()
    }

    /// Plotting area of pane `chart_index`.
    pub fn area(&self, chart_index: usize) -> Option<PixelRect> {
        self.frame(chart_index).map(|frame| frame.reduced(BORDER_THICKNESS))
    }

    pub fn price_label(&self, chart_index: usize) -> Option<PixelRect> {
        self.price_labels.get(chart_index).copied()
    }

    /// Pane under `pos`: 0 for the main pane, `None` outside every pane.
    pub fn chart_index_at(&self, pos: PixelPos) -> Option<usize> {
        self.frames.iter().position(|frame| frame.contains(pos))
    }

    /// Area covering every pane, for annotations that cross panes.
    pub fn union_area(&self) -> PixelRect {
        self.full_frame.reduced(BORDER_THICKNESS)
    }

    /// Width available to bars.
    pub fn plot_width(&self) -> i32 {
        self.area(0).map_or(0, |area| area.width)
    }
}

fn split_labels(slice: PixelRect) -> (PixelRect, PixelRect) {
    let x = slice.x + LEFT_LABEL_WIDTH;
    let width = (slice.width - LEFT_LABEL_WIDTH - RIGHT_LABEL_WIDTH).max(0);
    let frame = PixelRect::new(x, slice.y, width, slice.height);
    let label = PixelRect::new(x + width, slice.y, RIGHT_LABEL_WIDTH.min(slice.width), slice.height);
    (frame, label)
}
