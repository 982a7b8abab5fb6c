//! Memoizing series store.

use std::collections::HashMap;

use kline_core::{OhlcvSeries, SeriesKey, Timeframe};

use crate::SeriesSource;

/// Hands out one shared series per (instrument, timeframe), loading each key at most once.
///
/// Missing or unreadable data becomes an empty series; the empty result is
/// memoized too, so a broken file is not re-read on every request.
pub struct SeriesStore<S> {
    source: S,
    cache: HashMap<SeriesKey, OhlcvSeries>,
}

impl<S: SeriesSource> SeriesStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    pub fn get_series(&mut self, instrument: &str, timeframe: Timeframe) -> OhlcvSeries {
        self.get(&SeriesKey::new(instrument, timeframe))
    }

    pub fn get(&mut self, key: &SeriesKey) -> OhlcvSeries {
        if let Some(series) = self.cache.get(key) {
            return series.clone();
        }

        let series = match self.source.load(key) {
            Ok(Some(candles)) => {
                let series = OhlcvSeries::from_candles(candles);
                log::info!("Loaded {} bars for {}", series.len(), key);
                series
            }
            Ok(None) => {
                log::warn!("No data for {}", key);
                OhlcvSeries::empty()
            }
            Err(e) => {
                log::warn!("Failed to load {}: {:#}", key, e);
                OhlcvSeries::empty()
            }
        };

        self.cache.insert(key.clone(), series.clone());
        series
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
