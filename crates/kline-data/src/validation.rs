//! Sanity checks for loaded bars.

use kline_core::Candle;

/// Validate a candle has reasonable values.
pub fn validate_candle(candle: &Candle) -> bool {
    candle.timestamp.is_finite()
        && candle.open.is_finite()
        && candle.high.is_finite()
        && candle.low.is_finite()
        && candle.close.is_finite()
        && candle.volume.is_finite()
        && candle.high >= candle.low
        && candle.volume >= 0.0
}

/// Drop invalid candles, returning how many were removed.
pub fn retain_valid(candles: &mut Vec<Candle>) -> usize {
    let before = candles.len();
    candles.retain(validate_candle);
    before - candles.len()
}
