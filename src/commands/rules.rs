use crate::commands::print_snapshot;
use crate::config::{RuleConfig, RuleSet};
use crate::context::AppContext;
use crate::models::{Direction, PriceField, StopLossSource};
use crate::persistence::RULES_KEY;
use anyhow::Result;
use log::info;

/// Partial edit applied to one direction's rule config; unset fields keep
/// their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEdit {
    pub entry_price_source: Option<PriceField>,
    pub stop_loss_source: Option<StopLossSource>,
    pub atr_multiple: Option<f64>,
    pub take_profit_multiple: Option<f64>,
}

impl RuleEdit {
    fn apply(self, config: &mut RuleConfig) {
        if let Some(source) = self.entry_price_source {
            config.entry_price_source = source;
        }
        if let Some(source) = self.stop_loss_source {
            config.stop_loss_source = source;
        }
        if let Some(multiple) = self.atr_multiple {
            config.atr_multiple = multiple;
        }
        if let Some(multiple) = self.take_profit_multiple {
            config.take_profit_multiple = multiple;
        }
    }
}

/// Prints the persisted per-direction rule configuration.
pub fn show(app: &AppContext) -> Result<()> {
    let store = app.state_store()?;
    let rules: RuleSet = store.load_or_default(RULES_KEY)?;
    for direction in [Direction::Long, Direction::Short] {
        let config = rules.for_direction(direction);
        println!(
            "{:5}  entry={} stop={} atr_x={} tp_x={}",
            direction.as_str(),
            config.entry_price_source.as_str(),
            config.stop_loss_source.as_str(),
            config.atr_multiple,
            config.take_profit_multiple
        );
    }
    Ok(())
}

/// Applies an edit to one direction's rules, persists the result and prints
/// the recomputed trade list.
pub async fn set(app: &AppContext, direction: Direction, edit: RuleEdit) -> Result<()> {
    let mut bench = app.workbench().await?;
    let mut rules = *bench.rules();
    edit.apply(rules.for_direction_mut(direction));
    let snapshot = bench.set_rules(rules)?;
    info!("Updated {} rules", direction.as_str());
    print_snapshot(&snapshot);
    Ok(())
}
