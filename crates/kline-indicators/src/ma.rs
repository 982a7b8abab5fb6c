//! Simple moving average of close prices.

use kline_core::{OhlcvSeries, ValueRange, VisibleRange};

use crate::error::{require_len, IndicatorError};
use crate::indicator::{CacheState, ReadoutEntry};

/// Simple moving average over `period` closes.
///
/// Indices below `period - 1` hold a `0.0` placeholder and are excluded from
/// ranging, drawing and readouts.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    period: usize,
    values: Vec<f64>,
    value_range: ValueRange,
    cache: CacheState,
}

impl MovingAverage {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            values: Vec::new(),
            value_range: ValueRange::EMPTY,
            cache: CacheState::Dirty,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Derived series, aligned with bar indices.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    pub fn first_defined_index(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn on_series_changed(&mut self) {
        self.values.clear();
        self.value_range = ValueRange::EMPTY;
        self.cache = CacheState::Dirty;
    }

    pub fn recalculate(&mut self, series: &OhlcvSeries, visible: VisibleRange) -> Result<(), IndicatorError> {
        if self.cache.is_dirty() {
            self.cache = CacheState::Clean;
            match moving_average(&series.closes(), self.period) {
                Ok(values) => self.values = values,
                Err(e) => {
                    self.values.clear();
                    self.value_range = ValueRange::EMPTY;
                    return Err(e);
                }
            }
        }
        self.value_range = self.range_over(visible);
        Ok(())
    }

    /// Bar where the window averaged at the last visible bar begins.
    ///
    /// Renderers mark it so the user sees which bar drops out of the average next.
    pub fn marker_index(&self, visible: VisibleRange) -> Option<usize> {
        let end = visible.end.min(self.values.len());
        let index = end.checked_sub(self.period)?;
        (index >= visible.start && index >= self.first_defined_index()).then_some(index)
    }

    pub fn readout(&self, index: usize) -> Vec<ReadoutEntry> {
        let value = (index >= self.first_defined_index())
            .then(|| self.values.get(index).copied())
            .flatten();
        vec![ReadoutEntry::new(format!("MA{}", self.period), value)]
    }

    fn range_over(&self, visible: VisibleRange) -> ValueRange {
        let window = visible.clipped(self.first_defined_index(), self.values.len());
        ValueRange::from_values(self.values[window].iter().copied())
    }
}

/// Moving average of `closes`: `period - 1` zero placeholders followed by the window means.
pub fn moving_average(closes: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter("moving average period must be at least 1"));
    }
    require_len(period, closes.len())?;

    let mut values = Vec::with_capacity(closes.len());
    values.resize(period - 1, 0.0);
    values.extend(
        closes
            .windows(period)
            .map(|window| window.iter().sum::<f64>() / period as f64),
    );
    Ok(values)
}
