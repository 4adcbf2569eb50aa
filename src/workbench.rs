use crate::aggregate::{aggregate, Timeframe};
use crate::config::RuleSet;
use crate::derive::derive_trades;
use crate::indicators::{atr_series, ema_series, ATR_PERIOD, EMA_PERIOD};
use crate::marks::MarkStore;
use crate::models::{Candle, DerivedTrade, Direction, IndicatorPoint, Mark, MarkerView, Theme};
use crate::persistence::{KvStore, MARKS_KEY, RULES_KEY};
use anyhow::Result;

/// Everything the presentation layer consumes, recomputed wholesale from the
/// current inputs. Derived state is never patched incrementally, so it can
/// never drift out of sync with the candles/marks/rules it came from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub candles: Vec<Candle>,
    pub atr: Vec<IndicatorPoint>,
    pub ema: Vec<IndicatorPoint>,
    pub markers: Vec<MarkerView>,
    pub trades: Vec<DerivedTrade>,
}

/// Owns the current workbench state and recomputes derived values in
/// dependency order on every change. Mark and rule mutations go through here
/// so persistence and recomputation stay coupled.
pub struct Workbench {
    store: KvStore,
    base_candles: Vec<Candle>,
    base_timeframe: Timeframe,
    timeframe: Timeframe,
    theme: Theme,
    marks: MarkStore,
    rules: RuleSet,
}

impl Workbench {
    /// Builds a workbench over an ingested base candle series, restoring
    /// marks and rule configuration from the key-value store.
    pub fn open(
        store: KvStore,
        base_candles: Vec<Candle>,
        base_timeframe: Timeframe,
        timeframe: Timeframe,
        theme: Theme,
    ) -> Result<Self> {
        let marks = MarkStore::from_marks(store.load_or_default::<Vec<Mark>>(MARKS_KEY)?);
        let rules: RuleSet = store.load_or_default(RULES_KEY)?;
        rules.validate()?;
        Ok(Self {
            store,
            base_candles,
            base_timeframe,
            timeframe,
            theme,
            marks,
            rules,
        })
    }

    /// Recomputes every derived value from the current inputs: aggregated
    /// candles, then indicators, then markers and derived trades.
    pub fn recompute(&self) -> Snapshot {
        let candles = aggregate(
            &self.base_candles,
            self.timeframe,
            self.base_timeframe.seconds(),
        );
        let atr = atr_series(&candles, ATR_PERIOD);
        let ema = ema_series(&candles, EMA_PERIOD);
        let markers = self.marks.markers();
        let trades = derive_trades(self.marks.marks(), &candles, &atr, &self.rules);
        Snapshot {
            candles,
            atr,
            ema,
            markers,
            trades,
        }
    }

    /// Adds a mark and persists the collection. Returns `None` when a mark
    /// already exists at that timestamp (the collection is untouched and
    /// nothing is recomputed).
    pub fn add_mark(&mut self, time: i64, direction: Direction) -> Result<Option<Snapshot>> {
        if !self.marks.add(time, direction, self.theme) {
            return Ok(None);
        }
        self.persist_marks()?;
        Ok(Some(self.recompute()))
    }

    /// Removes the mark at the given ordinal position and persists the
    /// collection.
    pub fn remove_mark(&mut self, index: usize) -> Result<Snapshot> {
        self.marks.remove(index)?;
        self.persist_marks()?;
        Ok(self.recompute())
    }

    /// Replaces the rule configuration, persisting it after validation.
    pub fn set_rules(&mut self, rules: RuleSet) -> Result<Snapshot> {
        rules.validate()?;
        self.rules = rules;
        self.store.save(RULES_KEY, &self.rules)?;
        Ok(self.recompute())
    }

    /// Switches the display timeframe. Derived state for the new grid comes
    /// from the next `recompute`; stored marks are untouched even when their
    /// timestamps vanish from the aggregated series.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Snapshot {
        self.timeframe = timeframe;
        self.recompute()
    }

    pub fn marks(&self) -> &[Mark] {
        self.marks.marks()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    fn persist_marks(&self) -> Result<()> {
        self.store.save(MARKS_KEY, &self.marks.marks().to_vec())
    }
}
