//! Timeframe types and candle aggregation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{civil_from_days, days_from_civil, days_since_monday, SECONDS_PER_DAY};
use crate::candle::Candle;

/// Bar period of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Min1,
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

/// Returned when a timeframe label is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown timeframe label: {0}")]
pub struct ParseTimeframeError(pub String);

impl Timeframe {
    /// Returns the nominal duration of this timeframe in seconds.
    ///
    /// Months are taken as 30 days; bucketing uses [`Timeframe::bucket_start`].
    pub fn seconds(&self) -> f64 {
        match self {
            Timeframe::Min1 => 60.0,
            Timeframe::Min15 => 60.0 * 15.0,
            Timeframe::Hour1 => 60.0 * 60.0,
            Timeframe::Day1 => 60.0 * 60.0 * 24.0,
            Timeframe::Week1 => 60.0 * 60.0 * 24.0 * 7.0,
            Timeframe::Month1 => 60.0 * 60.0 * 24.0 * 30.0,
        }
    }

    /// Returns a short label for this timeframe.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Min1 => "1m",
            Timeframe::Min15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "1w",
            Timeframe::Month1 => "1M",
        }
    }

    /// True for periods shorter than a trading day.
    pub fn is_intraday(&self) -> bool {
        matches!(self, Timeframe::Min1 | Timeframe::Min15 | Timeframe::Hour1)
    }

    /// The stored timeframe this one is aggregated from, or itself if it is stored directly.
    pub fn base(&self) -> Timeframe {
        match self {
            Timeframe::Min1 | Timeframe::Min15 | Timeframe::Hour1 => Timeframe::Min1,
            Timeframe::Day1 | Timeframe::Week1 | Timeframe::Month1 => Timeframe::Day1,
        }
    }

    /// Start of the bar containing `timestamp` (unix seconds, UTC).
    ///
    /// Weeks start on Monday and months on the first day of the calendar month;
    /// shorter periods are aligned to multiples of their length.
    pub fn bucket_start(&self, timestamp: f64) -> f64 {
        let day = SECONDS_PER_DAY as f64;
        match self {
            Timeframe::Week1 => {
                let days = (timestamp / day).floor() as i64;
                (days - days_since_monday(days)) as f64 * day
            }
            Timeframe::Month1 => {
                let (year, month, _) = civil_from_days((timestamp / day).floor() as i64);
                days_from_civil(year, month, 1) as f64 * day
            }
            _ => {
                let interval = self.seconds();
                (timestamp / interval).floor() * interval
            }
        }
    }

    /// Returns all available timeframes in order.
    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Min1,
            Timeframe::Min15,
            Timeframe::Hour1,
            Timeframe::Day1,
            Timeframe::Week1,
            Timeframe::Month1,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .iter()
            .copied()
            .find(|tf| tf.label() == s)
            .ok_or_else(|| ParseTimeframeError(s.to_string()))
    }
}

/// Aggregate candles into a larger timeframe.
///
/// Input must be sorted by timestamp. Each output bar is stamped with the start of its bucket.
pub fn aggregate_candles(candles: &[Candle], timeframe: Timeframe) -> Vec<Candle> {
    let mut aggregated: Vec<Candle> = Vec::new();

    for candle in candles {
        let bucket_start = timeframe.bucket_start(candle.timestamp);

        match aggregated.last_mut() {
            Some(agg) if agg.timestamp == bucket_start => {
                agg.high = agg.high.max(candle.high);
                agg.low = agg.low.min(candle.low);
                agg.close = candle.close;
                agg.volume += candle.volume;
            }
            _ => aggregated.push(Candle { timestamp: bucket_start, ..*candle }),
        }
    }

    aggregated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for tf in Timeframe::all() {
            assert_eq!(tf.label().parse::<Timeframe>(), Ok(*tf));
        }
        assert!("2h".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_base_timeframe() {
        assert_eq!(Timeframe::Hour1.base(), Timeframe::Min1);
        assert_eq!(Timeframe::Month1.base(), Timeframe::Day1);
        assert!(Timeframe::Min15.is_intraday());
        assert!(!Timeframe::Week1.is_intraday());
    }

    #[test]
    fn test_aggregate_candles() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let p = 100.0 + i as f64;
                Candle::new(i as f64 * 60.0, p, p + 2.0, p - 2.0, p + 1.0, 1.0)
            })
            .collect();

        let agg = aggregate_candles(&candles, Timeframe::Min15);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].timestamp, 0.0);
        assert_eq!(agg[0].open, 100.0);
        assert_eq!(agg[0].high, 116.0);
        assert_eq!(agg[0].low, 98.0);
        assert_eq!(agg[0].close, 115.0);
        assert_eq!(agg[0].volume, 15.0);
        assert_eq!(agg[1].timestamp, 900.0);
        assert_eq!(agg[1].open, 115.0);
    }

    fn daily_from(first_day: i64, count: i64) -> Vec<Candle> {
        (first_day..first_day + count)
            .map(|d| Candle::new((d * SECONDS_PER_DAY) as f64, 10.0, 11.0, 9.0, 10.0, 1.0))
            .collect()
    }

    #[test]
    fn test_month_buckets_follow_calendar() {
        // 2024-01-01 through 2024-03-31
        let candles = daily_from(19_723, 91);
        let agg = aggregate_candles(&candles, Timeframe::Month1);
        let starts: Vec<f64> = agg.iter().map(|c| c.timestamp / 86_400.0).collect();
        assert_eq!(starts, vec![19_723.0, 19_754.0, 19_783.0]);
        assert_eq!(agg[0].volume, 31.0);
        assert_eq!(agg[1].volume, 29.0);
    }

    #[test]
    fn test_week_buckets_start_on_monday() {
        // Monday 2024-01-01 to Friday 2024-01-05 is one bar
        let agg = aggregate_candles(&daily_from(19_723, 5), Timeframe::Week1);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].timestamp, 19_723.0 * 86_400.0);

        // Sunday 2024-01-07 and Monday 2024-01-08 are not
        let agg = aggregate_candles(&daily_from(19_729, 2), Timeframe::Week1);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[1].timestamp, 19_730.0 * 86_400.0);
    }

    #[test]
    fn test_bucket_start_intraday() {
        assert_eq!(Timeframe::Hour1.bucket_start(7_250.0), 7_200.0);
        assert_eq!(Timeframe::Day1.bucket_start(86_399.0), 0.0);
        // Thursday 1970-01-01 belongs to the week of Monday 1969-12-29
        assert_eq!(Timeframe::Week1.bucket_start(0.0), -3.0 * 86_400.0);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_candles(&[], Timeframe::Hour1).is_empty());
    }
}
