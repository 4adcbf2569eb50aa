use crate::models::{Direction, PriceField, StopLossSource};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Rule grammar for deriving trade parameters from a marked entry bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub entry_price_source: PriceField,
    pub stop_loss_source: StopLossSource,
    pub atr_multiple: f64,
    pub take_profit_multiple: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            entry_price_source: PriceField::Close,
            stop_loss_source: StopLossSource::Open,
            atr_multiple: 2.0,
            take_profit_multiple: 2.0,
        }
    }
}

impl RuleConfig {
    pub fn validate(&self, direction: Direction) -> Result<()> {
        if !self.atr_multiple.is_finite() || self.atr_multiple <= 0.0 {
            return Err(anyhow!(
                "{} atrMultiple must be a positive number (value: {})",
                direction.as_str(),
                self.atr_multiple
            ));
        }
        if !self.take_profit_multiple.is_finite() || self.take_profit_multiple <= 0.0 {
            return Err(anyhow!(
                "{} takeProfitMultiple must be a positive number (value: {})",
                direction.as_str(),
                self.take_profit_multiple
            ));
        }
        Ok(())
    }
}

/// Two independently configured rule sets, one per trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub long: RuleConfig,
    pub short: RuleConfig,
}

impl RuleSet {
    pub fn for_direction(&self, direction: Direction) -> &RuleConfig {
        match direction {
            Direction::Long => &self.long,
            Direction::Short => &self.short,
        }
    }

    pub fn for_direction_mut(&mut self, direction: Direction) -> &mut RuleConfig {
        match direction {
            Direction::Long => &mut self.long,
            Direction::Short => &mut self.short,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.long.validate(Direction::Long)?;
        self.short.validate(Direction::Short)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RuleConfig::default();
        assert_eq!(config.entry_price_source, PriceField::Close);
        assert_eq!(config.stop_loss_source, StopLossSource::Open);
        assert_eq!(config.atr_multiple, 2.0);
        assert_eq!(config.take_profit_multiple, 2.0);
    }

    #[test]
    fn validate_rejects_non_positive_multiples() {
        let mut rules = RuleSet::default();
        rules.short.atr_multiple = 0.0;
        assert!(rules.validate().is_err());

        rules.short.atr_multiple = 2.0;
        rules.long.take_profit_multiple = -1.0;
        assert!(rules.validate().is_err());

        rules.long.take_profit_multiple = 1.5;
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn rule_set_round_trips_through_json() {
        let mut rules = RuleSet::default();
        rules.long.stop_loss_source = StopLossSource::Atr;
        rules.long.atr_multiple = 1.25;
        let json = serde_json::to_string(&rules).expect("serialize");
        let restored: RuleSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, rules);
    }
}
