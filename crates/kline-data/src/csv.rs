//! CSV data loading implementation.
//!
//! Files are laid out per market and bar period:
//!
//! ```text
//! <root>/<market>/day_k/<code>.csv   Date,Open,High,Low,Close,Volume
//! <root>/<market>/min_k/<code>.csv   Date,Time,Open,High,Low,Close,Volume
//! ```
//!
//! An instrument id is `<code>.<market>`, e.g. `2330.tw`.

use std::path::{Path, PathBuf};

use anyhow::Context;

use kline_core::calendar::{days_from_civil, SECONDS_PER_DAY};
use kline_core::{aggregate_candles, Candle, SeriesKey, Timeframe};

use crate::validation::retain_valid;
use crate::SeriesSource;

/// Loads series from a directory tree of CSV files.
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `instrument` at a stored timeframe (`Min1` or `Day1`).
    ///
    /// Returns `None` if the id has no market suffix.
    pub fn path_for(&self, instrument: &str, stored: Timeframe) -> Option<PathBuf> {
        let (code, market) = instrument.rsplit_once('.')?;
        if code.is_empty() || market.is_empty() {
            return None;
        }
        let folder = if stored.is_intraday() { "min_k" } else { "day_k" };
        Some(self.root.join(market).join(folder).join(format!("{code}.csv")))
    }
}

impl SeriesSource for CsvDirectorySource {
    fn load(&self, key: &SeriesKey) -> anyhow::Result<Option<Vec<Candle>>> {
        let base = key.timeframe.base();
        let Some(path) = self.path_for(&key.instrument, base) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let mut candles =
            load_candles_from_csv(&path).with_context(|| format!("Failed to load {}", path.display()))?;
        candles.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        if base != key.timeframe {
            candles = aggregate_candles(&candles, key.timeframe);
        }
        Ok(Some(candles))
    }
}

/// Parse a date ("YYYY/MM/DD" or "YYYY-MM-DD") and optional time ("HH:MM:SS") to unix seconds.
pub fn parse_date_time(date: &str, time: Option<&str>) -> Option<f64> {
    let mut parts = date.trim().split(['/', '-']);
    let year: i64 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut seconds = 0i64;
    if let Some(time) = time.map(str::trim).filter(|t| !t.is_empty()) {
        let mut parts = time.split(':');
        let hour: i64 = parts.next()?.trim().parse().ok()?;
        let min: i64 = parts.next().map_or(Ok(0), |p| p.trim().parse()).ok()?;
        let sec: i64 = parts.next().map_or(Ok(0), |p| p.trim().parse()).ok()?;
        seconds = hour * 3600 + min * 60 + sec;
    }

    Some((days_from_civil(year, month, day) * SECONDS_PER_DAY + seconds) as f64)
}

/// Load candles from a CSV file with `Date[,Time],Open,High,Low,Close,Volume` columns.
///
/// A unix `Timestamp` column is accepted in place of `Date`. Invalid bars are dropped.
pub fn load_candles_from_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Candle>> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b',').trim(csv::Trim::All).from_path(path)?;

    let headers = reader.headers()?.clone();
    let headers_lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let column = |name: &str| headers_lower.iter().position(|h| h == name);

    let date_col = column("date");
    let time_col = column("time");
    let ts_col = headers_lower.iter().position(|h| h.contains("timestamp"));
    anyhow::ensure!(
        date_col.is_some() || ts_col.is_some(),
        "missing Date or Timestamp column"
    );

    let open_col = column("open").context("missing Open column")?;
    let high_col = column("high").context("missing High column")?;
    let low_col = column("low").context("missing Low column")?;
    let close_col = column("close").context("missing Close column")?;
    let volume_col = column("volume").context("missing Volume column")?;

    let mut candles = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |col: usize| record.get(col).unwrap_or("");

        let timestamp = match (date_col, ts_col) {
            (Some(date), _) => parse_date_time(field(date), time_col.map(field)),
            (None, Some(ts)) => field(ts).parse::<f64>().ok(),
            (None, None) => None,
        }
        .with_context(|| format!("row {}: unreadable date", row + 1))?;

        let number = |col: usize| -> anyhow::Result<f64> {
            field(col)
                .parse()
                .with_context(|| format!("row {}: bad number {:?}", row + 1, field(col)))
        };

        candles.push(Candle::new(
            timestamp,
            number(open_col)?,
            number(high_col)?,
            number(low_col)?,
            number(close_col)?,
            number(volume_col)?,
        ));
    }

    let dropped = retain_valid(&mut candles);
    if dropped > 0 {
        log::warn!("Dropped {} invalid bars", dropped);
    }

    Ok(candles)
}
