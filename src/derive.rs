use crate::config::RuleSet;
use crate::indicators::value_at;
use crate::models::{Candle, DerivedTrade, Direction, IndicatorPoint, Mark, StopLossSource};
use log::debug;

/// Computes entry/stop/target prices for every mark against the active
/// candle series.
///
/// Pure function of its inputs; identical inputs always yield identical
/// output. A mark whose timestamp has no candle in the series (e.g. after a
/// timeframe switch) is excluded from this pass without error and stays in
/// the stored collection. Output order follows the ascending mark order.
pub fn derive_trades(
    marks: &[Mark],
    candles: &[Candle],
    atr: &[IndicatorPoint],
    rules: &RuleSet,
) -> Vec<DerivedTrade> {
    let mut trades = Vec::with_capacity(marks.len());
    let mut excluded = 0usize;

    for mark in marks {
        let Some(candle) = candle_at(candles, mark.time) else {
            excluded += 1;
            continue;
        };

        let rule = rules.for_direction(mark.direction);
        let entry = rule.entry_price_source.select(candle);

        let stop_loss = match rule.stop_loss_source {
            StopLossSource::Atr => {
                // A mark inside the indicator warm-up window has no ATR
                // point; its value is treated as zero, not as an error.
                let atr_value = value_at(atr, mark.time).unwrap_or(0.0);
                match mark.direction {
                    Direction::Long => entry - rule.atr_multiple * atr_value,
                    Direction::Short => entry + rule.atr_multiple * atr_value,
                }
            }
            StopLossSource::Open => candle.open,
            StopLossSource::High => candle.high,
            StopLossSource::Low => candle.low,
            StopLossSource::Close => candle.close,
        };

        let risk = (entry - stop_loss).abs();
        let take_profit = match mark.direction {
            Direction::Long => entry + risk * rule.take_profit_multiple,
            Direction::Short => entry - risk * rule.take_profit_multiple,
        };

        trades.push(DerivedTrade {
            mark_time: mark.time,
            direction: mark.direction,
            entry_price: entry,
            stop_loss_price: stop_loss,
            take_profit_price: take_profit,
            rule_snapshot: *rule,
        });
    }

    if excluded > 0 {
        debug!(
            "{} mark(s) have no candle in the active series and were skipped",
            excluded
        );
    }

    trades
}

fn candle_at(candles: &[Candle], time: i64) -> Option<&Candle> {
    candles
        .binary_search_by_key(&time, |candle| candle.time)
        .ok()
        .map(|index| &candles[index])
}
