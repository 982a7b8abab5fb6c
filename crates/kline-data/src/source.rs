//! Data source trait definition.

use kline_core::{Candle, SeriesKey};

/// Trait for types that can load the bars of one series.
///
/// `Ok(None)` means the source has no data for the key; errors are reserved
/// for data that exists but cannot be read.
pub trait SeriesSource {
    fn load(&self, key: &SeriesKey) -> anyhow::Result<Option<Vec<Candle>>>;
}

impl<S: SeriesSource + ?Sized> SeriesSource for Box<S> {
    fn load(&self, key: &SeriesKey) -> anyhow::Result<Option<Vec<Candle>>> {
        (**self).load(key)
    }
}
