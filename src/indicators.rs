use crate::models::{Candle, IndicatorPoint};

pub const ATR_PERIOD: usize = 14;
pub const EMA_PERIOD: usize = 37;

/// Average True Range with Wilder smoothing.
///
/// True range per bar is `max(high-low, |high-prev_close|, |low-prev_close|)`
/// (the first bar has no previous close and uses `high-low`). The first
/// output value is the simple average of the first `period` true ranges;
/// subsequent values use `atr = (prev * (period-1) + tr) / period`.
///
/// Output point `i` carries the timestamp of input candle `period - 1 + i`,
/// so the series is `period - 1` points shorter than the input and empty when
/// the input has fewer than `period` candles.
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(candles.len() - (period - 1));
    let mut tr_sum = 0.0f64;
    let mut atr = 0.0f64;

    for (i, candle) in candles.iter().enumerate() {
        let tr = if i == 0 {
            candle.high - candle.low
        } else {
            let prev_close = candles[i - 1].close;
            (candle.high - candle.low)
                .max((candle.high - prev_close).abs())
                .max((candle.low - prev_close).abs())
        };

        if i < period {
            tr_sum += tr;
            if i == period - 1 {
                atr = tr_sum / period as f64;
                out.push(IndicatorPoint {
                    time: candle.time,
                    value: atr,
                });
            }
        } else {
            atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
            out.push(IndicatorPoint {
                time: candle.time,
                value: atr,
            });
        }
    }

    out
}

/// Exponential moving average of closing prices, seeded by the simple
/// average of the first `period` closes, smoothing factor `2 / (period + 1)`.
/// Same alignment and length rule as [`atr_series`].
pub fn ema_series(candles: &[Candle], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(candles.len() - (period - 1));

    let seed: f64 = candles[..period].iter().map(|c| c.close).sum::<f64>() / period as f64;
    let mut ema = seed;
    out.push(IndicatorPoint {
        time: candles[period - 1].time,
        value: ema,
    });

    for candle in &candles[period..] {
        ema = candle.close * multiplier + ema * (1.0 - multiplier);
        out.push(IndicatorPoint {
            time: candle.time,
            value: ema,
        });
    }

    out
}

/// Exact-timestamp lookup into a time-aligned indicator series.
pub fn value_at(points: &[IndicatorPoint], time: i64) -> Option<f64> {
    points
        .binary_search_by_key(&time, |point| point.time)
        .ok()
        .map(|index| points[index].value)
}
