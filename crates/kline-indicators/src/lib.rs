//! Indicator framework for the kline chart.
//!
//! Every indicator is a variant of [`Indicator`] with an explicit
//! [`CacheState`]: a dirty indicator recomputes its derived series from the
//! whole series once, a clean one only re-ranges for the visible window.

pub mod engine;
pub mod error;
pub mod indicator;
pub mod ma;
pub mod macd;
pub mod price;
pub mod stochastic;
pub mod volume;

pub use engine::IndicatorEngine;
pub use error::IndicatorError;
pub use indicator::{CacheState, Indicator, IndicatorKind, ReadoutEntry};
pub use ma::{moving_average, MovingAverage};
pub use macd::{ema, macd, symmetric_range, Macd, MacdOutput};
pub use price::Price;
pub use stochastic::{stochastic, Stochastic, StochasticOutput};
pub use volume::Volume;
