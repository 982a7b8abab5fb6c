//! Core types for the kline chart workspace.
//!
//! This crate provides the data structures shared by every other crate:
//! - `Candle` - OHLCV bar data
//! - `OhlcvSeries` / `SeriesKey` - Immutable, shared bar series and its lookup key
//! - `Timeframe` - Bar period enumeration and calendar-aligned aggregation
//! - `VisibleRange` / `ValueRange` - Horizontal window and vertical scale of a pane

pub mod calendar;
pub mod candle;
pub mod range;
pub mod series;
pub mod timeframe;

pub use candle::{BarDirection, Candle};
pub use range::{ValueRange, VisibleRange};
pub use series::{OhlcvSeries, SeriesKey};
pub use timeframe::{aggregate_candles, ParseTimeframeError, Timeframe};
