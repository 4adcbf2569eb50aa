use crate::models::Candle;
use futures::future::try_join_all;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of leading columns consumed from each row: open_time, open, high,
/// low, close, volume. Anything after that is ignored.
const REQUIRED_COLUMNS: usize = 6;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no historical data sources supplied")]
    NoData,
    #[error("failed to read {path}: {source}")]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no valid rows found across {file_count} source file(s)")]
    NoValidRows { file_count: usize },
}

/// Reads every source file concurrently, parses the accepted rows and merges
/// them into one ascending candle series. A failure reading any single file
/// aborts the whole load; partial datasets are never accepted.
pub async fn load_candles(paths: &[PathBuf]) -> Result<Vec<Candle>, IngestError> {
    if paths.is_empty() {
        return Err(IngestError::NoData);
    }

    let reads = paths.iter().map(|path| async move {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| IngestError::Fetch {
                path: path.clone(),
                source,
            })
    });
    let blobs = try_join_all(reads).await?;

    let mut candles = Vec::new();
    for (path, blob) in paths.iter().zip(blobs.iter()) {
        let parsed = parse_blob(blob);
        debug!("{}: accepted {} row(s)", path.display(), parsed.len());
        candles.extend(parsed);
    }

    if candles.is_empty() {
        return Err(IngestError::NoValidRows {
            file_count: paths.len(),
        });
    }

    Ok(normalize_series(candles))
}

/// Parses one header-plus-rows CSV blob. Malformed rows are dropped, never
/// fatal.
pub fn parse_blob(blob: &str) -> Vec<Candle> {
    let mut candles = Vec::new();
    let mut lines = blob.lines();
    // Header row carries column names, not data.
    let _ = lines.next();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(candle) => candles.push(candle),
            None => debug!("rejected row: {}", line),
        }
    }

    candles
}

fn parse_row(line: &str) -> Option<Candle> {
    let mut fields = line.split(',');
    let mut required = [""; REQUIRED_COLUMNS];
    for slot in required.iter_mut() {
        *slot = fields.next()?;
    }

    let open_time_ms: i64 = required[0].trim().parse().ok()?;
    let open = parse_number(required[1])?;
    let high = parse_number(required[2])?;
    let low = parse_number(required[3])?;
    let close = parse_number(required[4])?;
    let volume = parse_number(required[5])?;

    Some(Candle {
        time: open_time_ms.div_euclid(1000),
        open,
        high,
        low,
        close,
        volume,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Stable sort ascending by time, then drop duplicate timestamps keeping the
/// first occurrence (input file order breaks ties).
pub fn normalize_series(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|candle| candle.time);
    let before = candles.len();
    candles.dedup_by_key(|candle| candle.time);
    let dropped = before - candles.len();
    if dropped > 0 {
        warn!("dropped {} candle(s) with duplicate timestamps", dropped);
    }
    candles
}

/// Lists the `*.csv` files under a directory in name order, the ingestion
/// command's source set.
pub fn list_csv_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            is_csv.then_some(path)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "open_time,open,high,low,close,volume,close_time,quote_volume,count,taker_buy_volume,taker_buy_quote_volume,ignore";

    fn blob(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn parses_rows_and_converts_millis_to_seconds() {
        let candles = parse_blob(&blob(&[
            "1700000000000,100,105,95,102,5000,1700000299999,0,0,0,0,0",
            "1700000300000,102,106,101,104,4100,1700000599999,0,0,0,0,0",
        ]));
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_700_000_000);
        assert_eq!(candles[0].open, 100.0);
        assert_eq!(candles[1].time, 1_700_000_300);
        assert_eq!(candles[1].volume, 4100.0);
    }

    #[test]
    fn rejects_malformed_rows_without_failing() {
        let candles = parse_blob(&blob(&[
            "not_a_time,100,105,95,102,5000",
            "1700000000000,100,abc,95,102,5000",
            "1700000300000,102,106,101",
            "1700000600000,102,106,101,104,4100",
        ]));
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].time, 1_700_000_600);
    }

    #[test]
    fn ignores_extra_columns() {
        let candles = parse_blob(&blob(&["0,1,2,0.5,1.5,10,junk,junk,junk"]));
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 1.5);
    }

    #[test]
    fn normalize_sorts_and_drops_duplicate_timestamps() {
        let mk = |time: i64, close: f64| Candle {
            time,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        };
        let merged = normalize_series(vec![mk(300, 2.0), mk(0, 1.0), mk(300, 9.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].time, 0);
        assert_eq!(merged[1].time, 300);
        // First occurrence wins.
        assert_eq!(merged[1].close, 2.0);
    }

    #[tokio::test]
    async fn load_requires_at_least_one_source() {
        let err = load_candles(&[]).await.unwrap_err();
        assert!(matches!(err, IngestError::NoData));
    }

    #[tokio::test]
    async fn load_fails_when_any_source_is_unreadable() {
        let err = load_candles(&[PathBuf::from("/nonexistent/markbench.csv")])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Fetch { .. }));
    }
}
