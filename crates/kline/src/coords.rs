//! Centralized coordinate mapping for kline.
//!
//! This module is the single source of truth for converting between the three
//! spaces a chart pane deals with:
//!
//! - **Pixel positions** ([`PixelPos`]): integer pointer positions in local pixels
//! - **Screen positions** ([`ScreenPos`]): unrounded pixel geometry produced for rendering
//! - **Domain coordinates**: bar index or timestamp horizontally, price vertically
//!
//! Bars are laid out left to right as `gap, bar, gap, bar, ...` starting at the
//! pane's left edge, so bar `i` of the visible range is centered at
//! `area.x + BAR_GAP + (i - start) * (bar_width + BAR_GAP) + bar_width / 2`.
//!
//! Every mapping is a pure function of its inputs. Degenerate inputs (empty
//! range, zero-height area, `min == max` value range) return a defined zero
//! value instead of dividing by zero.
//!
//! # Example
//!
//! ```
//! use kline::coords::{price_at, pixel_y_at, PixelRect};
//! use kline_core::ValueRange;
//!
//! let area = PixelRect::new(0, 0, 200, 100);
//! let range = ValueRange::new(10.0, 20.0);
//! let y = pixel_y_at(15.0, area, range);
//! assert_eq!(y, 50);
//! assert_eq!(price_at(y, area, range), 15.0);
//! ```

use kline_core::{OhlcvSeries, ValueRange, VisibleRange};

/// Horizontal gap between adjacent bars, in pixels.
pub const BAR_GAP: i32 = 2;
/// Bar width restored by a zoom reset.
pub const DEFAULT_BAR_WIDTH: i32 = 11;
/// Narrowest bar the viewport allows.
pub const MIN_BAR_WIDTH: i32 = 3;

/// Integer pixel position, as delivered by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Unrounded pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another screen position.
    #[must_use]
    pub fn distance_to(self, other: ScreenPos) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<PixelPos> for ScreenPos {
    fn from(pos: PixelPos) -> Self {
        Self::new(f64::from(pos.x), f64::from(pos.y))
    }
}

/// A straight line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub start: ScreenPos,
    pub end: ScreenPos,
}

impl Segment {
    #[must_use]
    pub const fn new(start: ScreenPos, end: ScreenPos) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            start: ScreenPos::new(self.start.x + dx, self.start.y + dy),
            end: ScreenPos::new(self.end.x + dx, self.end.y + dy),
        }
    }
}

/// Integer pixel rectangle, e.g. the plotting area of one pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the rightmost pixel column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottom pixel row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Half-open hit test: the right and bottom edges are outside.
    pub fn contains(&self, pos: PixelPos) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    /// Closed hit test: points on any edge are inside.
    pub fn contains_inclusive(&self, pos: ScreenPos) -> bool {
        pos.x >= f64::from(self.x)
            && pos.x <= f64::from(self.right())
            && pos.y >= f64::from(self.y)
            && pos.y <= f64::from(self.bottom())
    }

    /// Nearest pixel inside the rectangle.
    pub fn clamp_point(&self, pos: PixelPos) -> PixelPos {
        PixelPos {
            x: pos.x.clamp(self.x, (self.right() - 1).max(self.x)),
            y: pos.y.clamp(self.y, (self.bottom() - 1).max(self.y)),
        }
    }

    /// Shrink every side by `amount` pixels.
    #[must_use]
    pub fn reduced(&self, amount: i32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2 * amount).max(0),
            height: (self.height - 2 * amount).max(0),
        }
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &PixelRect) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Left, top, right and bottom borders, in that order.
    pub fn border_segments(&self) -> [Segment; 4] {
        let (l, t) = (f64::from(self.x), f64::from(self.y));
        let (r, b) = (f64::from(self.right()), f64::from(self.bottom()));
        [
            Segment::new(ScreenPos::new(l, t), ScreenPos::new(l, b)),
            Segment::new(ScreenPos::new(l, t), ScreenPos::new(r, t)),
            Segment::new(ScreenPos::new(r, t), ScreenPos::new(r, b)),
            Segment::new(ScreenPos::new(l, b), ScreenPos::new(r, b)),
        ]
    }

    /// True if the segment has an endpoint inside or crosses any border.
    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        if self.is_empty() {
            return false;
        }
        self.contains_inclusive(segment.start)
            || self.contains_inclusive(segment.end)
            || self
                .border_segments()
                .iter()
                .any(|border| segment_intersection(segment, border).is_some())
    }
}

/// Intersection point of two segments, if they cross or touch.
///
/// Parallel segments never intersect, even when collinear.
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<ScreenPos> {
    let (dx1, dy1) = (a.end.x - a.start.x, a.end.y - a.start.y);
    let (dx2, dy2) = (b.end.x - b.start.x, b.end.y - b.start.y);
    let denom = dx1 * dy2 - dy1 * dx2;
    if denom == 0.0 {
        return None;
    }

    let ox = b.start.x - a.start.x;
    let oy = b.start.y - a.start.y;
    let t = (ox * dy2 - oy * dx2) / denom;
    let u = (ox * dy1 - oy * dx1) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(ScreenPos::new(a.start.x + t * dx1, a.start.y + t * dy1))
    } else {
        None
    }
}

// =========================================================================
// Pixel <-> bar index
// =========================================================================

/// Bar index under `pixel_x`, clamped into the visible range.
///
/// Returns `range.start` for an empty range.
pub fn time_index_at(pixel_x: i32, range: VisibleRange, area: PixelRect, bar_width: i32) -> usize {
    let slot = f64::from(bar_width + BAR_GAP);
    if range.is_empty() || slot <= 0.0 {
        return range.start;
    }
    let offset = ((f64::from(pixel_x - area.x) - f64::from(BAR_GAP) / 2.0) / slot).floor();
    let index = range.start as f64 + offset;
    index.clamp(range.start as f64, (range.end - 1) as f64) as usize
}

/// Timestamp of the bar under `pixel_x`, or `0.0` when there is no such bar.
pub fn timestamp_at(pixel_x: i32, series: &OhlcvSeries, range: VisibleRange, area: PixelRect, bar_width: i32) -> f64 {
    if range.is_empty() {
        return 0.0;
    }
    series
        .timestamp(time_index_at(pixel_x, range, area, bar_width))
        .unwrap_or(0.0)
}

/// Center x of the bar at `timestamp`, shifted by `index_offset` bars.
///
/// The bar is located by lower bound, so a timestamp between two bars maps to
/// the later one. The result is not rounded; bar centers of even-width slots
/// fall on half pixels exactly as the candle renderer draws them.
pub fn pixel_x_at(
    timestamp: f64,
    index_offset: isize,
    series: &OhlcvSeries,
    range: VisibleRange,
    area: PixelRect,
    bar_width: i32,
) -> f64 {
    if range.is_empty() {
        return 0.0;
    }
    let index = series.lower_bound(timestamp) as f64 + index_offset as f64;
    bar_center_x(index - range.start as f64, area, bar_width)
}

/// Center x of the bar `slot` places right of the first visible bar.
pub fn bar_center_x(slot: f64, area: PixelRect, bar_width: i32) -> f64 {
    f64::from(area.x + BAR_GAP) + slot * f64::from(bar_width + BAR_GAP) + f64::from(bar_width) / 2.0
}

// =========================================================================
// Pixel <-> price
// =========================================================================

/// Price at `pixel_y`, interpolated linearly from top (`max`) to bottom (`min`).
///
/// Returns `0.0` for a zero-height area.
pub fn price_at(pixel_y: i32, area: PixelRect, value_range: ValueRange) -> f64 {
    if area.height <= 0 {
        return 0.0;
    }
    value_range.max - value_range.span() / f64::from(area.height) * f64::from(pixel_y - area.y)
}

/// Pixel row of `price`, rounded to the nearest pixel.
///
/// Returns `0` for a degenerate value range.
pub fn pixel_y_at(price: f64, area: PixelRect, value_range: ValueRange) -> i32 {
    if value_range.is_degenerate() {
        return 0;
    }
    (f64::from(area.y) + (value_range.max - price) * f64::from(area.height) / value_range.span()).round() as i32
}

/// Viewport parameters of one pane, as cached by annotation tools.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub area: PixelRect,
    pub value_range: ValueRange,
    pub visible: VisibleRange,
    pub bar_width: i32,
}

impl Projection {
    #[must_use]
    pub const fn new(area: PixelRect, value_range: ValueRange, visible: VisibleRange, bar_width: i32) -> Self {
        Self {
            area,
            value_range,
            visible,
            bar_width,
        }
    }

    pub fn time_index_at(&self, pixel_x: i32) -> usize {
        time_index_at(pixel_x, self.visible, self.area, self.bar_width)
    }

    pub fn timestamp_at(&self, pixel_x: i32, series: &OhlcvSeries) -> f64 {
        timestamp_at(pixel_x, series, self.visible, self.area, self.bar_width)
    }

    pub fn price_at(&self, pixel_y: i32) -> f64 {
        price_at(pixel_y, self.area, self.value_range)
    }

    pub fn pixel_x_at(&self, timestamp: f64, index_offset: isize, series: &OhlcvSeries) -> f64 {
        pixel_x_at(timestamp, index_offset, series, self.visible, self.area, self.bar_width)
    }

    pub fn pixel_y_at(&self, price: f64) -> i32 {
        pixel_y_at(price, self.area, self.value_range)
    }

    /// True when nothing can be placed: no bars in view or no vertical scale.
    pub fn is_degenerate(&self) -> bool {
        self.visible.is_empty() || self.value_range.is_degenerate() || self.area.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kline_core::Candle;

    fn make_series(len: usize) -> OhlcvSeries {
        (0..len)
            .map(|i| Candle::new(1_000.0 + i as f64 * 60.0, 10.0, 11.0, 9.0, 10.0, 1.0))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_rect_edges() {
        let rect = PixelRect::new(10, 20, 100, 50);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
        assert!(rect.contains(PixelPos::new(10, 20)));
        assert!(!rect.contains(PixelPos::new(110, 30)));
        assert!(rect.contains_inclusive(ScreenPos::new(110.0, 70.0)));
        assert!(!rect.contains_inclusive(ScreenPos::new(111.0, 70.0)));
    }

    #[test]
    fn test_clamp_point() {
        let rect = PixelRect::new(10, 20, 100, 50);
        assert_eq!(rect.clamp_point(PixelPos::new(500, -4)), PixelPos::new(109, 20));
        assert_eq!(rect.clamp_point(PixelPos::new(50, 40)), PixelPos::new(50, 40));
    }

    #[test]
    fn test_union_and_reduced() {
        let a = PixelRect::new(0, 0, 100, 50);
        let b = PixelRect::new(0, 60, 100, 20);
        assert_eq!(a.union(&b), PixelRect::new(0, 0, 100, 80));
        assert_eq!(a.union(&PixelRect::default()), a);
        assert_eq!(a.reduced(1), PixelRect::new(1, 1, 98, 48));
        assert!(PixelRect::new(0, 0, 1, 1).reduced(1).is_empty());
    }

    #[test]
    fn test_segment_intersection() {
        let a = Segment::new(ScreenPos::new(0.0, 0.0), ScreenPos::new(10.0, 10.0));
        let b = Segment::new(ScreenPos::new(0.0, 10.0), ScreenPos::new(10.0, 0.0));
        assert_eq!(segment_intersection(&a, &b), Some(ScreenPos::new(5.0, 5.0)));

        let c = Segment::new(ScreenPos::new(20.0, 0.0), ScreenPos::new(30.0, 10.0));
        assert_eq!(segment_intersection(&a, &c), None);

        let far = Segment::new(ScreenPos::new(11.0, 0.0), ScreenPos::new(11.0, 20.0));
        assert_eq!(segment_intersection(&a, &far), None);
    }

    #[test]
    fn test_intersects_segment() {
        let rect = PixelRect::new(0, 0, 100, 100);
        let crossing = Segment::new(ScreenPos::new(-10.0, 50.0), ScreenPos::new(110.0, 50.0));
        let outside = Segment::new(ScreenPos::new(-10.0, 150.0), ScreenPos::new(110.0, 150.0));
        let inside = Segment::new(ScreenPos::new(10.0, 10.0), ScreenPos::new(20.0, 20.0));
        assert!(rect.intersects_segment(&crossing));
        assert!(!rect.intersects_segment(&outside));
        assert!(rect.intersects_segment(&inside));
    }

    #[test]
    fn test_time_index_at() {
        let area = PixelRect::new(0, 0, 200, 100);
        let range = VisibleRange::new(10, 25);
        // Slot width 13, first bar spans x = 2..13
        assert_eq!(time_index_at(0, range, area, 11), 10);
        assert_eq!(time_index_at(7, range, area, 11), 10);
        assert_eq!(time_index_at(14, range, area, 11), 11);
        assert_eq!(time_index_at(199, range, area, 11), 24);
        assert_eq!(time_index_at(-500, range, area, 11), 10);
    }

    #[test]
    fn test_pixel_x_at() {
        let series = make_series(30);
        let area = PixelRect::new(5, 0, 200, 100);
        let range = VisibleRange::new(10, 25);
        let ts = series.timestamp(12).unwrap();
        assert_eq!(pixel_x_at(ts, 0, &series, range, area, 11), 5.0 + 2.0 + 2.0 * 13.0 + 5.5);
        assert_eq!(pixel_x_at(ts, 3, &series, range, area, 11), 5.0 + 2.0 + 5.0 * 13.0 + 5.5);
        // Between bars: lower bound picks the later bar
        assert_eq!(
            pixel_x_at(ts + 1.0, 0, &series, range, area, 11),
            pixel_x_at(series.timestamp(13).unwrap(), 0, &series, range, area, 11)
        );
    }

    #[test]
    fn test_pixel_x_time_index_roundtrip() {
        let series = make_series(100);
        let area = PixelRect::new(12, 0, 200, 100);
        let bar_width = 11;
        let count = ((area.width - BAR_GAP) / (bar_width + BAR_GAP)) as usize;
        let range = VisibleRange::with_length(40, count);

        for x in area.x..area.right() {
            let index = time_index_at(x, range, area, bar_width);
            let ts = series.timestamp(index).unwrap();
            let back = pixel_x_at(ts, 0, &series, range, area, bar_width);
            assert!(
                (back - f64::from(x)).abs() <= f64::from(bar_width),
                "x {x} mapped to {back}"
            );
        }
    }

    #[test]
    fn test_price_pixel_roundtrip() {
        let area = PixelRect::new(0, 30, 300, 400);
        let range = ValueRange::new(120.0, 220.0);
        for step in 0..=100 {
            let price = 120.0 + f64::from(step);
            let y = pixel_y_at(price, area, range);
            // Each price step is exactly four pixels tall here
            assert!((price_at(y, area, range) - price).abs() < 1e-9);
        }
        assert_eq!(pixel_y_at(220.0, area, range), 30);
        assert_eq!(pixel_y_at(120.0, area, range), 430);
    }

    #[test]
    fn test_degenerate_inputs() {
        let series = make_series(10);
        let area = PixelRect::new(0, 0, 100, 100);
        let empty = VisibleRange::new(3, 3);
        assert_eq!(time_index_at(50, empty, area, 11), 3);
        assert_eq!(timestamp_at(50, &series, empty, area, 11), 0.0);
        assert_eq!(pixel_x_at(1_000.0, 0, &series, empty, area, 11), 0.0);
        assert_eq!(pixel_y_at(5.0, area, ValueRange::new(5.0, 5.0)), 0);
        assert_eq!(price_at(10, PixelRect::new(0, 0, 100, 0), ValueRange::new(0.0, 1.0)), 0.0);
        assert_eq!(timestamp_at(50, &OhlcvSeries::empty(), VisibleRange::new(0, 4), area, 11), 0.0);
    }

    #[test]
    fn test_projection_degenerate() {
        let p = Projection::new(
            PixelRect::new(0, 0, 100, 100),
            ValueRange::new(1.0, 2.0),
            VisibleRange::new(0, 5),
            11,
        );
        assert!(!p.is_degenerate());
        assert!(Projection { visible: VisibleRange::new(2, 2), ..p }.is_degenerate());
        assert!(Projection { value_range: ValueRange::EMPTY, ..p }.is_degenerate());
    }
}
