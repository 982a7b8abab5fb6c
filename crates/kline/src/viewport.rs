//! Visible window over the loaded series.
//!
//! The viewport owns the scroll position and bar width. Every operation clamps
//! its inputs, so a zero-width plot or an empty series simply produces an empty
//! range.

use kline_core::VisibleRange;

use crate::coords::{BAR_GAP, DEFAULT_BAR_WIDTH, MIN_BAR_WIDTH};

/// Scroll and zoom state of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    range: VisibleRange,
    total: usize,
    bar_width: i32,
    default_bar_width: i32,
    plot_width: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_WIDTH)
    }
}

impl Viewport {
    /// Create an empty viewport. An even `default_bar_width` is rounded up to odd.
    pub fn new(default_bar_width: i32) -> Self {
        let default_bar_width = force_odd(default_bar_width.max(MIN_BAR_WIDTH));
        Self {
            range: VisibleRange::default(),
            total: 0,
            bar_width: default_bar_width,
            default_bar_width,
            plot_width: 0,
        }
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn bar_width(&self) -> i32 {
        self.bar_width
    }

    pub fn plot_width(&self) -> i32 {
        self.plot_width
    }

    /// Number of bars that fit in the plot: `(plot_width - gap) / (bar_width + gap)`.
    pub fn compute_visible_bar_count(plot_width: i32, bar_width: i32, bar_gap: i32) -> usize {
        let slot = bar_width + bar_gap;
        if slot <= 0 || plot_width <= bar_gap {
            return 0;
        }
        ((plot_width - bar_gap) / slot) as usize
    }

    /// Bars that fit at the current width, before clamping to the series length.
    pub fn visible_bar_count(&self) -> usize {
        Self::compute_visible_bar_count(self.plot_width, self.bar_width, BAR_GAP)
    }

    /// Widest odd bar that still fits in the plot.
    fn max_bar_width(&self) -> i32 {
        let max = self.plot_width - 2 * BAR_GAP;
        let max = if max % 2 == 0 { max - 1 } else { max };
        max.max(MIN_BAR_WIDTH)
    }

    /// Clamp the range into `[0, total]` for a new series length.
    pub fn set_range_limits(&mut self, total: usize) {
        self.total = total;
        self.place(self.range.end.min(total));
    }

    /// End the range at `end`, keeping its width.
    pub fn scroll_to(&mut self, end: usize) {
        self.place(end);
    }

    /// Scroll by whole bars; positive moves toward newer bars.
    pub fn scroll_by(&mut self, delta_bars: isize) {
        let end = self.range.end.saturating_add_signed(delta_bars);
        self.place(end);
    }

    pub fn scroll_to_end(&mut self) {
        self.place(self.total);
    }

    /// Set the plot width and re-range with the end anchored.
    pub fn resize(&mut self, plot_width: i32) {
        self.plot_width = plot_width.max(0);
        self.place(self.range.end);
    }

    /// Change the bar width by `delta_px`, rounded toward zero to an even step.
    ///
    /// Returns true if the bar width changed.
    pub fn zoom(&mut self, delta_px: i32) -> bool {
        let delta = delta_px - delta_px % 2;
        let width = (self.bar_width + delta).min(self.max_bar_width()).max(MIN_BAR_WIDTH);
        self.set_bar_width(width)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom(2)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom(-2)
    }

    /// Restore the default bar width.
    pub fn zoom_reset(&mut self) -> bool {
        self.set_bar_width(self.default_bar_width)
    }

    fn set_bar_width(&mut self, width: i32) -> bool {
        if width == self.bar_width {
            return false;
        }
        log::debug!("Bar width {} -> {}", self.bar_width, width);
        self.bar_width = width;
        self.place(self.range.end);
        true
    }

    /// Lay out as many bars as fit, ending at `end`, inside `[0, total]`.
    fn place(&mut self, end: usize) {
        let len = self.visible_bar_count().min(self.total);
        let end = end.clamp(len, self.total);
        self.range = VisibleRange::new(end - len, end);
    }
}

fn force_odd(width: i32) -> i32 {
    if width % 2 == 0 {
        width + 1
    } else {
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 15 bars of width 11 fit in 200 px.
    fn make_viewport(total: usize) -> Viewport {
        let mut viewport = Viewport::default();
        viewport.resize(200);
        viewport.set_range_limits(total);
        viewport.scroll_to_end();
        viewport
    }

    #[test]
    fn test_compute_visible_bar_count() {
        assert_eq!(Viewport::compute_visible_bar_count(200, 11, 2), 15);
        assert_eq!(Viewport::compute_visible_bar_count(15, 11, 2), 1);
        assert_eq!(Viewport::compute_visible_bar_count(14, 11, 2), 0);
        assert_eq!(Viewport::compute_visible_bar_count(0, 11, 2), 0);
        assert_eq!(Viewport::compute_visible_bar_count(-40, 11, 2), 0);
    }

    #[test]
    fn test_scroll_to_end() {
        let viewport = make_viewport(100);
        assert_eq!(viewport.range(), VisibleRange::new(85, 100));
    }

    #[test]
    fn test_scroll_clamps() {
        let mut viewport = make_viewport(100);
        viewport.scroll_to(3);
        assert_eq!(viewport.range(), VisibleRange::new(0, 15));
        viewport.scroll_to(500);
        assert_eq!(viewport.range(), VisibleRange::new(85, 100));
        viewport.scroll_by(-10);
        assert_eq!(viewport.range(), VisibleRange::new(75, 90));
        viewport.scroll_by(-1_000);
        assert_eq!(viewport.range(), VisibleRange::new(0, 15));
    }

    #[test]
    fn test_short_series() {
        let viewport = make_viewport(6);
        assert_eq!(viewport.range(), VisibleRange::new(0, 6));
    }

    #[test]
    fn test_range_limits_shrink() {
        let mut viewport = make_viewport(100);
        viewport.set_range_limits(40);
        assert_eq!(viewport.range(), VisibleRange::new(25, 40));
        viewport.set_range_limits(0);
        assert!(viewport.range().is_empty());
    }

    #[test]
    fn test_zoom_keeps_width_odd() {
        let mut viewport = make_viewport(100);
        assert!(viewport.zoom(3));
        assert_eq!(viewport.bar_width(), 13);
        assert!(viewport.zoom(-5));
        assert_eq!(viewport.bar_width(), 9);
        assert!(viewport.zoom_out());
        assert_eq!(viewport.bar_width(), 7);
        assert!(!viewport.zoom(1));
    }

    #[test]
    fn test_zoom_anchors_end() {
        let mut viewport = make_viewport(100);
        viewport.scroll_to(60);
        viewport.zoom(-8);
        // Width 3: (200 - 2) / 5 = 39 bars
        assert_eq!(viewport.range(), VisibleRange::new(21, 60));
        assert!(viewport.zoom_reset());
        assert_eq!(viewport.range(), VisibleRange::new(45, 60));
        assert!(!viewport.zoom_reset());
    }

    #[test]
    fn test_zoom_clamps() {
        let mut viewport = make_viewport(100);
        viewport.zoom(-100);
        assert_eq!(viewport.bar_width(), MIN_BAR_WIDTH);
        viewport.zoom(1_000);
        // 200 - 4 = 196, rounded down to odd
        assert_eq!(viewport.bar_width(), 195);
        assert_eq!(viewport.range().len(), 1);
    }

    #[test]
    fn test_zoom_narrow_plot() {
        let mut viewport = make_viewport(100);
        viewport.resize(5);
        viewport.zoom(10);
        assert_eq!(viewport.bar_width(), MIN_BAR_WIDTH);
    }

    #[test]
    fn test_zero_plot_width() {
        let mut viewport = make_viewport(100);
        viewport.resize(0);
        assert!(viewport.range().is_empty());
        assert_eq!(viewport.range().end, 100);
        viewport.resize(200);
        assert_eq!(viewport.range(), VisibleRange::new(85, 100));
    }

    #[test]
    fn test_even_default_width() {
        let viewport = Viewport::new(10);
        assert_eq!(viewport.bar_width(), 11);
        assert_eq!(Viewport::new(0).bar_width(), MIN_BAR_WIDTH);
    }
}
