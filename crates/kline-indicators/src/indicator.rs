//! Indicator variants and the operations they share.

use std::fmt;

use kline_core::{OhlcvSeries, ValueRange, VisibleRange};

use crate::error::IndicatorError;
use crate::ma::MovingAverage;
use crate::macd::Macd;
use crate::price::Price;
use crate::stochastic::Stochastic;
use crate::volume::Volume;

/// Whether an indicator's derived series matches the series it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheState {
    Clean,
    /// Needs a full recomputation before the next re-range.
    #[default]
    Dirty,
}

impl CacheState {
    pub fn is_dirty(&self) -> bool {
        matches!(self, CacheState::Dirty)
    }
}

/// Indicator kind together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Price,
    MovingAverage {
        period: usize,
    },
    Stochastic {
        period: usize,
        rsv_weight: usize,
        k_weight: usize,
    },
    Macd {
        short_period: usize,
        long_period: usize,
        signal_period: usize,
    },
    Volume,
}

/// One labelled value of a crosshair readout. `None` renders as "--".
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutEntry {
    pub label: String,
    pub value: Option<f64>,
}

impl ReadoutEntry {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl fmt::Display for ReadoutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} {:.2}", self.label, v),
            None => write!(f, "{} --", self.label),
        }
    }
}

/// A single indicator instance with its cached state.
#[derive(Debug, Clone)]
pub enum Indicator {
    Price(Price),
    MovingAverage(MovingAverage),
    Stochastic(Stochastic),
    Macd(Macd),
    Volume(Volume),
}

impl Indicator {
    pub fn new(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Price => Indicator::Price(Price::new()),
            IndicatorKind::MovingAverage { period } => Indicator::MovingAverage(MovingAverage::new(period)),
            IndicatorKind::Stochastic {
                period,
                rsv_weight,
                k_weight,
            } => Indicator::Stochastic(Stochastic::new(period, rsv_weight, k_weight)),
            IndicatorKind::Macd {
                short_period,
                long_period,
                signal_period,
            } => Indicator::Macd(Macd::new(short_period, long_period, signal_period)),
            IndicatorKind::Volume => Indicator::Volume(Volume::new()),
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            Indicator::Price(_) => IndicatorKind::Price,
            Indicator::MovingAverage(ma) => IndicatorKind::MovingAverage { period: ma.period() },
            Indicator::Stochastic(kd) => IndicatorKind::Stochastic {
                period: kd.period(),
                rsv_weight: kd.rsv_weight(),
                k_weight: kd.k_weight(),
            },
            Indicator::Macd(macd) => IndicatorKind::Macd {
                short_period: macd.short_period(),
                long_period: macd.long_period(),
                signal_period: macd.signal_period(),
            },
            Indicator::Volume(_) => IndicatorKind::Volume,
        }
    }

    /// Human-readable name of the indicator.
    pub fn name(&self) -> String {
        match self {
            Indicator::Price(_) => "K".to_string(),
            Indicator::MovingAverage(ma) => format!("MA{}", ma.period()),
            Indicator::Stochastic(kd) => format!("KD({}, {}, {})", kd.period(), kd.rsv_weight(), kd.k_weight()),
            Indicator::Macd(macd) => format!(
                "MACD({}, {}, {})",
                macd.short_period(),
                macd.long_period(),
                macd.signal_period()
            ),
            Indicator::Volume(_) => "Volume".to_string(),
        }
    }

    /// Whether this indicator is drawn over the price pane rather than in its own pane.
    pub fn is_overlay(&self) -> bool {
        matches!(self, Indicator::Price(_) | Indicator::MovingAverage(_))
    }

    /// Invalidate the derived series after the underlying series was swapped.
    pub fn on_series_changed(&mut self) {
        match self {
            Indicator::Price(p) => p.on_series_changed(),
            Indicator::MovingAverage(ma) => ma.on_series_changed(),
            Indicator::Stochastic(kd) => kd.on_series_changed(),
            Indicator::Macd(macd) => macd.on_series_changed(),
            Indicator::Volume(v) => v.on_series_changed(),
        }
    }

    /// Recompute if dirty, then update the value range for `visible`.
    pub fn recalculate(&mut self, series: &OhlcvSeries, visible: VisibleRange) -> Result<(), IndicatorError> {
        match self {
            Indicator::Price(p) => {
                p.recalculate(series, visible);
                Ok(())
            }
            Indicator::MovingAverage(ma) => ma.recalculate(series, visible),
            Indicator::Stochastic(kd) => kd.recalculate(series, visible),
            Indicator::Macd(macd) => macd.recalculate(series, visible),
            Indicator::Volume(v) => {
                v.recalculate(series, visible);
                Ok(())
            }
        }
    }

    /// Last computed value range.
    pub fn value_range(&self) -> ValueRange {
        match self {
            Indicator::Price(p) => p.value_range(),
            Indicator::MovingAverage(ma) => ma.value_range(),
            Indicator::Stochastic(kd) => kd.value_range(),
            Indicator::Macd(macd) => macd.value_range(),
            Indicator::Volume(v) => v.value_range(),
        }
    }

    /// Price and volume read straight from the series and are never dirty.
    pub fn cache_state(&self) -> CacheState {
        match self {
            Indicator::Price(_) | Indicator::Volume(_) => CacheState::Clean,
            Indicator::MovingAverage(ma) => ma.cache_state(),
            Indicator::Stochastic(kd) => kd.cache_state(),
            Indicator::Macd(macd) => macd.cache_state(),
        }
    }

    /// First bar index holding a real (non-placeholder) value.
    pub fn first_defined_index(&self) -> usize {
        match self {
            Indicator::Price(_) | Indicator::Volume(_) => 0,
            Indicator::MovingAverage(ma) => ma.first_defined_index(),
            Indicator::Stochastic(kd) => kd.first_defined_index(),
            Indicator::Macd(macd) => macd.first_defined_index(),
        }
    }

    /// Values under the crosshair at bar `index`.
    pub fn readout(&self, series: &OhlcvSeries, index: usize) -> Vec<ReadoutEntry> {
        match self {
            Indicator::Price(p) => p.readout(series, index),
            Indicator::MovingAverage(ma) => ma.readout(index),
            Indicator::Stochastic(kd) => kd.readout(index),
            Indicator::Macd(macd) => macd.readout(index),
            Indicator::Volume(v) => v.readout(series, index),
        }
    }
}

impl From<IndicatorKind> for Indicator {
    fn from(kind: IndicatorKind) -> Self {
        Indicator::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kline_core::Candle;

    fn make_series(closes: &[f64]) -> OhlcvSeries {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle::new(i as f64 * 60.0, close, close + 1.0, close - 1.0, close, 100.0))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_kind_roundtrip() {
        let kinds = [
            IndicatorKind::Price,
            IndicatorKind::MovingAverage { period: 5 },
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
            IndicatorKind::Volume,
        ];
        for kind in kinds {
            assert_eq!(Indicator::new(kind).kind(), kind);
        }
    }

    #[test]
    fn test_names_and_overlay() {
        assert_eq!(Indicator::new(IndicatorKind::MovingAverage { period: 22 }).name(), "MA22");
        assert!(Indicator::new(IndicatorKind::Price).is_overlay());
        assert!(!Indicator::new(IndicatorKind::Volume).is_overlay());
    }

    #[test]
    fn test_dispatch_recalculate_clears_dirty() {
        let series = make_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut ma = Indicator::new(IndicatorKind::MovingAverage { period: 3 });
        assert_eq!(ma.cache_state(), CacheState::Dirty);
        ma.recalculate(&series, VisibleRange::new(0, 6)).unwrap();
        assert_eq!(ma.cache_state(), CacheState::Clean);
        ma.on_series_changed();
        assert_eq!(ma.cache_state(), CacheState::Dirty);
    }

    #[test]
    fn test_readout_entry_display() {
        assert_eq!(ReadoutEntry::new("MA5", Some(12.346)).to_string(), "MA5 12.35");
        assert_eq!(ReadoutEntry::new("MA5", None).to_string(), "MA5 --");
    }
}
