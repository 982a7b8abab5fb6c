//! Immutable bar series shared between the store, indicators and tools.

use std::fmt;
use std::sync::Arc;

use crate::candle::Candle;
use crate::timeframe::Timeframe;

/// Lookup key for a series: one instrument at one timeframe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub instrument: String,
    pub timeframe: Timeframe,
}

impl SeriesKey {
    pub fn new(instrument: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            instrument: instrument.into(),
            timeframe,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.instrument, self.timeframe.label())
    }
}

/// An ordered, immutable sequence of bars with strictly increasing timestamps.
///
/// Cloning is cheap: the bars live behind an `Arc` and are never copied once loaded.
#[derive(Debug, Clone, Default)]
pub struct OhlcvSeries {
    candles: Arc<[Candle]>,
}

impl OhlcvSeries {
    /// Creates an empty series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from bars in any order.
    ///
    /// Bars are sorted by timestamp; for duplicate timestamps the first bar wins.
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        candles.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
        Self {
            candles: candles.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Timestamp of the bar at `index`.
    pub fn timestamp(&self, index: usize) -> Option<f64> {
        self.candles.get(index).map(|c| c.timestamp)
    }

    /// Index of the first bar whose timestamp is not less than `timestamp`.
    ///
    /// Returns `len()` when every bar is earlier.
    pub fn lower_bound(&self, timestamp: f64) -> usize {
        self.candles.partition_point(|c| c.timestamp < timestamp)
    }

    /// Close prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// True if both handles point at the same loaded data.
    pub fn ptr_eq(&self, other: &OhlcvSeries) -> bool {
        Arc::ptr_eq(&self.candles, &other.candles)
    }
}

impl From<Vec<Candle>> for OhlcvSeries {
    fn from(candles: Vec<Candle>) -> Self {
        Self::from_candles(candles)
    }
}
