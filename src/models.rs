use anyhow::anyhow;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One OHLCV bar. `time` is epoch seconds of the bucket open.
///
/// A candle series is always ascending in `time` with no duplicate
/// timestamps; the pipeline replaces whole series on reload or timeframe
/// change instead of mutating them in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A single indicator value aligned to a candle timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(anyhow!("Unknown direction '{}'", other)),
        }
    }
}

/// Closed set of candle price fields a rule can reference. Selection goes
/// through [`PriceField::select`] so the selector set stays exhaustively
/// checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl PriceField {
    pub fn select(self, candle: &Candle) -> f64 {
        match self {
            PriceField::Open => candle.open,
            PriceField::High => candle.high,
            PriceField::Low => candle.low,
            PriceField::Close => candle.close,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
        }
    }
}

/// Where a rule takes its stop-loss from: an ATR offset around the entry
/// price, or a raw candle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StopLossSource {
    Atr,
    Open,
    High,
    Low,
    Close,
}

impl StopLossSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopLossSource::Atr => "atr",
            StopLossSource::Open => "open",
            StopLossSource::High => "high",
            StopLossSource::Low => "low",
            StopLossSource::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
}

impl MarkerShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerShape::ArrowUp => "arrow_up",
            MarkerShape::ArrowDown => "arrow_down",
        }
    }
}

/// Render metadata frozen at mark creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMeta {
    pub color: String,
    pub shape: MarkerShape,
    pub label: String,
}

/// A user-designated hypothetical trade entry. At most one mark exists per
/// distinct `time`; the collection is kept sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    pub time: i64,
    pub direction: Direction,
    pub meta: DisplayMeta,
}

/// Flat marker record handed to the chart collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub time: i64,
    pub side: Direction,
    pub color: String,
    pub shape: MarkerShape,
    pub label: String,
}

/// Entry/stop/target prices computed for one mark. Never stored; recomputed
/// from marks + candles + ATR + rules on every change. `rule_snapshot`
/// freezes the rule values used, so later config edits do not retroactively
/// alter a trade already handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTrade {
    pub mark_time: i64,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub rule_snapshot: crate::config::RuleConfig,
}
