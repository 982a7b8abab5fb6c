//! Series loading for the kline chart.
//!
//! A [`SeriesStore`] memoizes one [`OhlcvSeries`](kline_core::OhlcvSeries) per
//! (instrument, timeframe) on top of any [`SeriesSource`].

pub mod csv;
pub mod memory;
pub mod source;
pub mod store;
pub mod validation;

pub use self::csv::CsvDirectorySource;
pub use memory::MemorySource;
pub use source::SeriesSource;
pub use store::SeriesStore;
