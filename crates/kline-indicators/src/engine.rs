//! Indicator engine: the main price pane plus one indicator per subsidiary pane.

use kline_core::{OhlcvSeries, ValueRange, VisibleRange};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, IndicatorKind, ReadoutEntry};

/// Owns every indicator instance of a chart.
///
/// Chart index 0 is the main pane, whose value range is the union of all of its
/// overlays. Chart index `i >= 1` is subsidiary pane `i`.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    main: Vec<Indicator>,
    subsidiary: Vec<Indicator>,
    main_range: ValueRange,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(Self::default_main(), Self::default_subsidiary())
    }
}

impl IndicatorEngine {
    pub fn new(main: Vec<IndicatorKind>, subsidiary: Vec<IndicatorKind>) -> Self {
        Self {
            main: main.into_iter().map(Indicator::new).collect(),
            subsidiary: subsidiary.into_iter().map(Indicator::new).collect(),
            main_range: ValueRange::EMPTY,
        }
    }

    /// Candles with MA5 and MA22.
    pub fn default_main() -> Vec<IndicatorKind> {
        vec![
            IndicatorKind::Price,
            IndicatorKind::MovingAverage { period: 5 },
            IndicatorKind::MovingAverage { period: 22 },
        ]
    }

    /// Volume, KD(9, 3, 3) and MACD(12, 26, 9).
    pub fn default_subsidiary() -> Vec<IndicatorKind> {
        vec![
            IndicatorKind::Volume,
            IndicatorKind::Stochastic {
                period: 9,
                rsv_weight: 3,
                k_weight: 3,
            },
            IndicatorKind::Macd {
                short_period: 12,
                long_period: 26,
                signal_period: 9,
            },
        ]
    }

    pub fn main(&self) -> &[Indicator] {
        &self.main
    }

    pub fn subsidiary(&self) -> &[Indicator] {
        &self.subsidiary
    }

    /// Main pane plus subsidiary panes.
    pub fn pane_count(&self) -> usize {
        1 + self.subsidiary.len()
    }

    /// Indicators drawn in pane `chart_index`.
    pub fn pane(&self, chart_index: usize) -> &[Indicator] {
        match chart_index {
            0 => &self.main,
            i => self.subsidiary.get(i - 1..i).unwrap_or(&[]),
        }
    }

    /// Mark every indicator dirty after the series was swapped.
    pub fn on_series_changed(&mut self) {
        for indicator in self.main.iter_mut().chain(self.subsidiary.iter_mut()) {
            indicator.on_series_changed();
        }
        self.main_range = ValueRange::EMPTY;
    }

    /// Recalculate every indicator for `visible` and merge the main pane range.
    ///
    /// Indicators that cannot be computed are left inert; the errors are returned
    /// for callers that want to surface them.
    pub fn recalculate(&mut self, series: &OhlcvSeries, visible: VisibleRange) -> Vec<IndicatorError> {
        let mut errors = Vec::new();
        for indicator in self.main.iter_mut().chain(self.subsidiary.iter_mut()) {
            if let Err(e) = indicator.recalculate(series, visible) {
                log::debug!("{} left empty: {}", indicator.name(), e);
                errors.push(e);
            }
        }

        self.main_range = self
            .main
            .iter()
            .map(Indicator::value_range)
            .filter(|r| !r.is_degenerate())
            .reduce(ValueRange::union)
            .unwrap_or(ValueRange::EMPTY);

        errors
    }

    /// Vertical scale of pane `chart_index`; degenerate for unknown panes.
    pub fn value_range(&self, chart_index: usize) -> ValueRange {
        match chart_index {
            0 => self.main_range,
            i => self
                .subsidiary
                .get(i - 1)
                .map(Indicator::value_range)
                .unwrap_or(ValueRange::EMPTY),
        }
    }

    /// Crosshair readout for each pane at bar `index`.
    pub fn readouts(&self, series: &OhlcvSeries, index: usize) -> Vec<Vec<ReadoutEntry>> {
        (0..self.pane_count())
            .map(|pane| {
                self.pane(pane)
                    .iter()
                    .flat_map(|indicator| indicator.readout(series, index))
                    .collect()
            })
            .collect()
    }
}
