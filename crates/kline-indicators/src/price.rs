//! Candlestick (K) price range.

use kline_core::{BarDirection, OhlcvSeries, ValueRange, VisibleRange};

use crate::indicator::ReadoutEntry;

/// The candlestick series itself; it has no derived values, only a range.
#[derive(Debug, Clone, Default)]
pub struct Price {
    value_range: ValueRange,
}

impl Price {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_series_changed(&mut self) {
        self.value_range = ValueRange::EMPTY;
    }

    /// (min low, max high) over the visible bars.
    pub fn recalculate(&mut self, series: &OhlcvSeries, visible: VisibleRange) {
        let bars = &series.candles()[visible.clipped(0, series.len())];
        self.value_range = match bars.first() {
            Some(first) => bars.iter().fold(ValueRange::new(first.low, first.high), |acc, c| {
                ValueRange::new(acc.min.min(c.low), acc.max.max(c.high))
            }),
            None => ValueRange::EMPTY,
        };
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Body direction of bar `index`: close against open.
    pub fn bar_direction(series: &OhlcvSeries, index: usize) -> Option<BarDirection> {
        series.get(index).map(|c| BarDirection::compare(c.close, c.open))
    }

    pub fn readout(&self, series: &OhlcvSeries, index: usize) -> Vec<ReadoutEntry> {
        let bar = series.get(index);
        vec![
            ReadoutEntry::new("O", bar.map(|c| c.open)),
            ReadoutEntry::new("H", bar.map(|c| c.high)),
            ReadoutEntry::new("L", bar.map(|c| c.low)),
            ReadoutEntry::new("C", bar.map(|c| c.close)),
        ]
    }
}
