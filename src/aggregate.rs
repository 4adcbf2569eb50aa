use crate::models::Candle;
use anyhow::anyhow;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed set of bucket widths the workbench can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Timeframe {
    #[value(name = "5m")]
    M5,
    #[value(name = "15m")]
    M15,
    #[value(name = "30m")]
    M30,
    #[value(name = "1h")]
    H1,
    #[value(name = "2h")]
    H2,
    #[value(name = "4h")]
    H4,
    #[value(name = "1d")]
    D1,
}

impl Timeframe {
    pub fn seconds(self) -> i64 {
        match self {
            Timeframe::M5 => 5 * 60,
            Timeframe::M15 => 15 * 60,
            Timeframe::M30 => 30 * 60,
            Timeframe::H1 => 60 * 60,
            Timeframe::H2 => 2 * 60 * 60,
            Timeframe::H4 => 4 * 60 * 60,
            Timeframe::D1 => 24 * 60 * 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H2 => "2h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::M5,
            Timeframe::M15,
            Timeframe::M30,
            Timeframe::H1,
            Timeframe::H2,
            Timeframe::H4,
            Timeframe::D1,
        ]
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .iter()
            .copied()
            .find(|tf| tf.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown timeframe '{}'", s))
    }
}

/// Rebuckets an ascending candle series onto the target grid. Returns the
/// input unchanged when the target width equals the base resolution.
///
/// Single forward pass: a candle whose bucket start differs from the open
/// bucket flushes it and seeds the next one; same-bucket candles fold in with
/// standard OHLCV roll-up rules. Empty buckets are absent from the output,
/// never synthesized.
pub fn aggregate(candles: &[Candle], timeframe: Timeframe, base_seconds: i64) -> Vec<Candle> {
    let width = timeframe.seconds();
    if width == base_seconds {
        return candles.to_vec();
    }

    let mut aggregated = Vec::new();
    let mut open_bucket: Option<Candle> = None;

    for candle in candles {
        let bucket_start = candle.time.div_euclid(width) * width;
        match open_bucket.as_mut() {
            Some(bucket) if bucket.time == bucket_start => {
                bucket.high = bucket.high.max(candle.high);
                bucket.low = bucket.low.min(candle.low);
                bucket.close = candle.close;
                bucket.volume += candle.volume;
            }
            Some(bucket) => {
                aggregated.push(*bucket);
                *bucket = seed_bucket(bucket_start, candle);
            }
            None => {
                open_bucket = Some(seed_bucket(bucket_start, candle));
            }
        }
    }

    if let Some(bucket) = open_bucket {
        aggregated.push(bucket);
    }

    aggregated
}

fn seed_bucket(bucket_start: i64, candle: &Candle) -> Candle {
    Candle {
        time: bucket_start,
        open: candle.open,
        high: candle.high,
        low: candle.low,
        close: candle.close,
        volume: candle.volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn five_minute_series(count: i64) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(i * 300, base, base + 2.0, base - 2.0, base + 1.0, 10.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn base_resolution_is_identity() {
        let series = five_minute_series(7);
        let out = aggregate(&series, Timeframe::M5, Timeframe::M5.seconds());
        assert_eq!(out, series);
    }

    #[test]
    fn folds_two_candles_into_one_bucket() {
        let series = vec![
            candle(0, 100.0, 105.0, 95.0, 102.0, 5000.0),
            candle(300, 102.0, 110.0, 101.0, 108.0, 4000.0),
        ];
        let out = aggregate(&series, Timeframe::M15, 300);
        assert_eq!(out.len(), 1);
        let bucket = out[0];
        assert_eq!(bucket.time, 0);
        assert_eq!(bucket.open, 100.0);
        assert_eq!(bucket.high, 110.0);
        assert_eq!(bucket.low, 95.0);
        assert_eq!(bucket.close, 108.0);
        assert_eq!(bucket.volume, 9000.0);
    }

    #[test]
    fn bucket_open_never_changes_after_seeding() {
        let series = vec![
            candle(0, 50.0, 51.0, 49.0, 50.5, 1.0),
            candle(300, 99.0, 99.0, 99.0, 99.0, 1.0),
            candle(600, 10.0, 10.0, 10.0, 10.0, 1.0),
        ];
        let out = aggregate(&series, Timeframe::H1, 300);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].open, 50.0);
        assert_eq!(out[0].close, 10.0);
    }

    #[test]
    fn gaps_are_not_filled() {
        let series = vec![
            candle(0, 1.0, 1.0, 1.0, 1.0, 1.0),
            // Skips the 900..1800 bucket entirely.
            candle(1800, 2.0, 2.0, 2.0, 2.0, 1.0),
        ];
        let out = aggregate(&series, Timeframe::M15, 300);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].time, 0);
        assert_eq!(out[1].time, 1800);
    }

    #[test]
    fn reaggregation_composes_on_aligned_boundaries() {
        let series = five_minute_series(48);
        let direct = aggregate(&series, Timeframe::H1, 300);
        let via_30m = aggregate(
            &aggregate(&series, Timeframe::M30, 300),
            Timeframe::H1,
            Timeframe::M30.seconds(),
        );
        assert_eq!(direct, via_30m);
    }

    #[test]
    fn timeframe_labels_round_trip() {
        for tf in Timeframe::all() {
            assert_eq!(tf.label().parse::<Timeframe>().unwrap(), *tf);
        }
        assert!("3m".parse::<Timeframe>().is_err());
    }
}
