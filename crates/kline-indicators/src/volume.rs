//! Volume bars and their envelope.

use kline_core::{BarDirection, OhlcvSeries, ValueRange, VisibleRange};

use crate::indicator::ReadoutEntry;

/// Volume pane: scales to the visible volume extrema.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    value_range: ValueRange,
}

impl Volume {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_series_changed(&mut self) {
        self.value_range = ValueRange::EMPTY;
    }

    pub fn recalculate(&mut self, series: &OhlcvSeries, visible: VisibleRange) {
        let bars = &series.candles()[visible.clipped(0, series.len())];
        self.value_range = ValueRange::from_values(bars.iter().map(|c| c.volume));
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Close of bar `index` against the previous close. The first bar compares with itself.
    pub fn bar_direction(series: &OhlcvSeries, index: usize) -> Option<BarDirection> {
        let current = series.get(index)?;
        let previous = series.get(index.saturating_sub(1))?;
        Some(BarDirection::compare(current.close, previous.close))
    }

    pub fn readout(&self, series: &OhlcvSeries, index: usize) -> Vec<ReadoutEntry> {
        vec![ReadoutEntry::new("VOL", series.get(index).map(|c| c.volume))]
    }
}
