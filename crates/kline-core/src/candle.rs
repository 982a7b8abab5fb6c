//! Candle data structures for OHLCV data.

/// One OHLCV bar. `timestamp` is unix seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub timestamp: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: f64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Direction of a bar relative to some reference price, used to pick bar colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarDirection {
    Up,
    Down,
    Flat,
}

impl BarDirection {
    /// Compare `value` against `reference`.
    pub fn compare(value: f64, reference: f64) -> Self {
        if value > reference {
            BarDirection::Up
        } else if value < reference {
            BarDirection::Down
        } else {
            BarDirection::Flat
        }
    }
}
