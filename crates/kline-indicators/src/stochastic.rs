//! Stochastic oscillator (KD).

use kline_core::{Candle, OhlcvSeries, ValueRange, VisibleRange};

use crate::error::{require_len, IndicatorError};
use crate::indicator::{CacheState, ReadoutEntry};

/// Seed for RSV, K and D before the first full window.
pub const STOCHASTIC_SEED: f64 = 50.0;

/// The oscillator is always scaled to this range.
pub const STOCHASTIC_RANGE: ValueRange = ValueRange::new(0.0, 100.0);

/// Stochastic oscillator output, aligned with bar indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StochasticOutput {
    pub rsv: Vec<f64>,
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochasticOutput {
    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }
}

/// KD indicator with smoothing weights for K (`rsv_weight`) and D (`k_weight`).
#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    rsv_weight: usize,
    k_weight: usize,
    output: StochasticOutput,
    cache: CacheState,
}

impl Stochastic {
    pub fn new(period: usize, rsv_weight: usize, k_weight: usize) -> Self {
        Self {
            period,
            rsv_weight,
            k_weight,
            output: StochasticOutput::default(),
            cache: CacheState::Dirty,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn rsv_weight(&self) -> usize {
        self.rsv_weight
    }

    pub fn k_weight(&self) -> usize {
        self.k_weight
    }

    pub fn output(&self) -> &StochasticOutput {
        &self.output
    }

    pub fn value_range(&self) -> ValueRange {
        STOCHASTIC_RANGE
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    /// Seeds are drawn too; the line starts one bar before the first full window.
    pub fn first_defined_index(&self) -> usize {
        self.period.saturating_sub(2)
    }

    pub fn on_series_changed(&mut self) {
        self.output = StochasticOutput::default();
        self.cache = CacheState::Dirty;
    }

    /// The range is fixed, so a clean cache needs no work at all.
    pub fn recalculate(&mut self, series: &OhlcvSeries, _visible: VisibleRange) -> Result<(), IndicatorError> {
        if !self.cache.is_dirty() {
            return Ok(());
        }
        self.cache = CacheState::Clean;
        match stochastic(series.candles(), self.period, self.rsv_weight, self.k_weight) {
            Ok(output) => {
                self.output = output;
                Ok(())
            }
            Err(e) => {
                self.output = StochasticOutput::default();
                Err(e)
            }
        }
    }

    pub fn readout(&self, index: usize) -> Vec<ReadoutEntry> {
        let defined = index >= self.first_defined_index();
        let at = |values: &[f64]| defined.then(|| values.get(index).copied()).flatten();
        vec![
            ReadoutEntry::new(format!("K({}, {})", self.period, self.rsv_weight), at(&self.output.k)),
            ReadoutEntry::new(format!("D({}, {})", self.period, self.k_weight), at(&self.output.d)),
        ]
    }
}

/// Compute RSV, K and D over `candles`.
///
/// The first `period - 1` entries of every output are seeded with 50.
pub fn stochastic(
    candles: &[Candle],
    period: usize,
    rsv_weight: usize,
    k_weight: usize,
) -> Result<StochasticOutput, IndicatorError> {
    if period < 2 {
        return Err(IndicatorError::InvalidParameter("stochastic period must be at least 2"));
    }
    if rsv_weight < 2 || k_weight < 2 {
        return Err(IndicatorError::InvalidParameter("stochastic weights must be at least 2"));
    }
    require_len(period, candles.len())?;

    let len = candles.len();
    let mut output = StochasticOutput {
        rsv: vec![STOCHASTIC_SEED; period - 1],
        k: vec![STOCHASTIC_SEED; period - 1],
        d: vec![STOCHASTIC_SEED; period - 1],
    };
    output.rsv.reserve(len);
    output.k.reserve(len);
    output.d.reserve(len);

    let rsv_w = rsv_weight as f64;
    let k_w = k_weight as f64;

    for (i, window) in candles.windows(period).enumerate() {
        let i = i + period - 1;
        let min = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let rsv = if min != max {
            (candles[i].close - min) / (max - min) * 100.0
        } else {
            STOCHASTIC_SEED
        };
        let k = output.k[i - 1] * (rsv_w - 1.0) / rsv_w + rsv / rsv_w;
        let d = output.d[i - 1] * (k_w - 1.0) / k_w + k / k_w;
        output.rsv.push(rsv);
        output.k.push(k);
        output.d.push(d);
    }

    Ok(output)
}
