//! MACD (Moving Average Convergence Divergence) indicator.

use kline_core::{OhlcvSeries, ValueRange, VisibleRange};

use crate::error::{require_len, IndicatorError};
use crate::indicator::{CacheState, ReadoutEntry};

/// MACD indicator output, aligned with bar indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdOutput {
    /// Short EMA - long EMA; zero below `long_period`.
    pub dif: Vec<f64>,
    /// EMA of DIF over `signal_period`.
    pub signal: Vec<f64>,
    /// DIF - signal; zero below `max(long_period, signal_period)`.
    pub osc: Vec<f64>,
}

/// MACD indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    short_period: usize,
    long_period: usize,
    signal_period: usize,
    output: MacdOutput,
    value_range: ValueRange,
    cache: CacheState,
}

impl Macd {
    pub fn new(short_period: usize, long_period: usize, signal_period: usize) -> Self {
        Self {
            short_period,
            long_period,
            signal_period,
            output: MacdOutput::default(),
            value_range: ValueRange::EMPTY,
            cache: CacheState::Dirty,
        }
    }

    pub fn short_period(&self) -> usize {
        self.short_period
    }

    pub fn long_period(&self) -> usize {
        self.long_period
    }

    pub fn signal_period(&self) -> usize {
        self.signal_period
    }

    pub fn output(&self) -> &MacdOutput {
        &self.output
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    pub fn first_defined_index(&self) -> usize {
        self.long_period.max(self.signal_period)
    }

    pub fn on_series_changed(&mut self) {
        self.output = MacdOutput::default();
        self.value_range = ValueRange::EMPTY;
        self.cache = CacheState::Dirty;
    }

    pub fn recalculate(&mut self, series: &OhlcvSeries, visible: VisibleRange) -> Result<(), IndicatorError> {
        if self.cache.is_dirty() {
            self.cache = CacheState::Clean;
            match macd(&series.closes(), self.short_period, self.long_period, self.signal_period) {
                Ok(output) => self.output = output,
                Err(e) => {
                    self.output = MacdOutput::default();
                    self.value_range = ValueRange::EMPTY;
                    return Err(e);
                }
            }
        }
        self.value_range = self.range_over(visible);
        Ok(())
    }

    pub fn readout(&self, index: usize) -> Vec<ReadoutEntry> {
        let defined = index >= self.first_defined_index();
        let at = |values: &[f64]| defined.then(|| values.get(index).copied()).flatten();
        vec![
            ReadoutEntry::new(
                format!("DIF{}-{}", self.short_period, self.long_period),
                at(&self.output.dif),
            ),
            ReadoutEntry::new(format!("MACD{}", self.signal_period), at(&self.output.signal)),
            ReadoutEntry::new("OSC", at(&self.output.osc)),
        ]
    }

    /// Union of DIF, signal and OSC extrema in the window, symmetrized around zero.
    fn range_over(&self, visible: VisibleRange) -> ValueRange {
        let window = visible.clipped(self.first_defined_index(), self.output.dif.len());
        if window.is_empty() {
            return ValueRange::EMPTY;
        }
        let extrema = ValueRange::from_values(
            self.output.dif[window.clone()]
                .iter()
                .chain(&self.output.signal[window.clone()])
                .chain(&self.output.osc[window])
                .copied(),
        );
        symmetric_range(extrema)
    }
}

/// `(-tweak, tweak)` with `tweak = max(|floor(min)|, |ceil(max)|)`.
///
/// Zero stays centered even when every value in the window has the same sign.
pub fn symmetric_range(range: ValueRange) -> ValueRange {
    let tweak = range.min.floor().abs().max(range.max.ceil().abs());
    ValueRange::new(-tweak, tweak)
}

/// Exponential moving average with `period - 1` zero placeholders and an SMA seed.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter("EMA period must be at least 1"));
    }
    require_len(period, values.len())?;

    let alpha = 2.0 / (period as f64 + 1.0);
    let beta = 1.0 - alpha;

    let mut ema = Vec::with_capacity(values.len());
    ema.resize(period - 1, 0.0);
    ema.push(values[..period].iter().sum::<f64>() / period as f64);

    for &value in &values[period..] {
        let prev = ema[ema.len() - 1];
        ema.push(prev * beta + value * alpha);
    }

    Ok(ema)
}

/// Compute DIF, signal and OSC over `closes`.
pub fn macd(
    closes: &[f64],
    short_period: usize,
    long_period: usize,
    signal_period: usize,
) -> Result<MacdOutput, IndicatorError> {
    if short_period == 0 || signal_period == 0 {
        return Err(IndicatorError::InvalidParameter("MACD periods must be at least 1"));
    }
    if short_period >= long_period {
        return Err(IndicatorError::InvalidParameter("MACD short period must be below the long period"));
    }

    let short = ema(closes, short_period)?;
    let long = ema(closes, long_period)?;

    let dif: Vec<f64> = short
        .iter()
        .zip(&long)
        .enumerate()
        .map(|(i, (s, l))| if i >= long_period { s - l } else { 0.0 })
        .collect();

    let signal = ema(&dif, signal_period)?;

    let max_period = long_period.max(signal_period);
    let osc = dif
        .iter()
        .zip(&signal)
        .enumerate()
        .map(|(i, (d, s))| if i >= max_period { d - s } else { 0.0 })
        .collect();

    Ok(MacdOutput { dif, signal, osc })
}
