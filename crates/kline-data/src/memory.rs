//! In-memory series source.

use std::collections::HashMap;

use kline_core::{Candle, SeriesKey};

use crate::SeriesSource;

/// Serves series registered up front; unknown keys have no data.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    series: HashMap<SeriesKey, Vec<Candle>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SeriesKey, candles: Vec<Candle>) {
        self.series.insert(key, candles);
    }

    pub fn with_series(mut self, key: SeriesKey, candles: Vec<Candle>) -> Self {
        self.insert(key, candles);
        self
    }
}

impl SeriesSource for MemorySource {
    fn load(&self, key: &SeriesKey) -> anyhow::Result<Option<Vec<Candle>>> {
        Ok(self.series.get(key).cloned())
    }
}
