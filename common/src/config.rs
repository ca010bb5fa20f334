use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Strategy selector, resolved into a concrete strategy by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Simple moving average crossover
    SmaCross { fast: usize, slow: usize },
    /// Exponential moving average crossover
    EmaCross { fast: usize, slow: usize },
}

impl StrategyKind {
    pub fn windows(&self) -> (usize, usize) {
        match *self {
            StrategyKind::SmaCross { fast, slow } | StrategyKind::EmaCross { fast, slow } => {
                (fast, slow)
            }
        }
    }

    /// Same family with different windows
    pub fn with_windows(self, fast: usize, slow: usize) -> Self {
        match self {
            StrategyKind::SmaCross { .. } => StrategyKind::SmaCross { fast, slow },
            StrategyKind::EmaCross { .. } => StrategyKind::EmaCross { fast, slow },
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::SmaCross { fast: 30, slow: 90 }
    }
}

/// Broker selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerKind {
    /// Full-allocation simulated exchange filling at the bar close
    #[default]
    Simulated,
}

/// Backtest parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestParameters {
    pub initial_cash: f64,
    /// Fraction of each trade paid as commission (0.003 = 0.3%)
    pub commission: f64,
    /// Upper sanity bound for `commission`
    pub max_commission: f64,
    /// Bars skipped before the strategy is first consulted
    pub warmup: usize,
    pub strategy: StrategyKind,
    pub broker: BrokerKind,
}

impl Default for BacktestParameters {
    fn default() -> Self {
        Self {
            initial_cash: 10000.0,
            commission: 0.0,
            max_commission: 0.05,
            warmup: 100,
            strategy: StrategyKind::default(),
            broker: BrokerKind::default(),
        }
    }
}

impl BacktestParameters {
    /// Load parameters from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let params = serde_json::from_reader(BufReader::new(file))?;
        Ok(params)
    }

    pub fn with_cash(mut self, cash: f64) -> Self {
        self.initial_cash = cash;
        self
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = commission;
        self
    }

    pub fn with_max_commission(mut self, max_commission: f64) -> Self {
        self.max_commission = max_commission;
        self
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks the account parameters that do not depend on the data
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (name, value) in [
            ("initial_cash", self.initial_cash),
            ("commission", self.commission),
            ("max_commission", self.max_commission),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteParameter {
                    name: name.to_string(),
                });
            }
        }

        if self.initial_cash <= 0.0 {
            return Err(ValidationError::NonPositiveCash {
                cash: self.initial_cash,
            });
        }

        // At a rate of 1 or more a buy no longer yields a positive position
        if !(0.0..1.0).contains(&self.max_commission) {
            return Err(ValidationError::CommissionBoundOutOfRange {
                max: self.max_commission,
            });
        }

        if !(0.0..=self.max_commission).contains(&self.commission) {
            return Err(ValidationError::CommissionOutOfRange {
                commission: self.commission,
                max: self.max_commission,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BacktestParameters::default();
        assert_eq!(params.initial_cash, 10000.0);
        assert_eq!(params.commission, 0.0);
        assert_eq!(params.max_commission, 0.05);
        assert_eq!(params.warmup, 100);
        assert_eq!(params.strategy, StrategyKind::SmaCross { fast: 30, slow: 90 });
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"commission": 0.003, "strategy": {"type": "ema_cross", "fast": 12, "slow": 26}}"#;
        let params: BacktestParameters = serde_json::from_str(json).unwrap();

        assert_eq!(params.commission, 0.003);
        assert_eq!(params.initial_cash, 10000.0);
        assert_eq!(params.warmup, 100);
        assert_eq!(params.strategy.windows(), (12, 26));
        assert!(matches!(params.strategy, StrategyKind::EmaCross { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_cash() {
        let params = BacktestParameters::default().with_cash(0.0);
        assert_eq!(
            params.validate(),
            Err(ValidationError::NonPositiveCash { cash: 0.0 })
        );
    }

    #[test]
    fn test_validate_rejects_high_commission() {
        let params = BacktestParameters::default().with_commission(0.06);
        assert!(matches!(
            params.validate(),
            Err(ValidationError::CommissionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_commission_bound_is_configurable() {
        let params = BacktestParameters::default()
            .with_commission(0.06)
            .with_max_commission(0.10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_max_commission_at_or_above_one() {
        for max in [1.0, 2.0] {
            let params = BacktestParameters::default()
                .with_commission(0.5)
                .with_max_commission(max);
            assert_eq!(
                params.validate(),
                Err(ValidationError::CommissionBoundOutOfRange { max })
            );
        }

        let negative = BacktestParameters::default().with_max_commission(-0.01);
        assert!(matches!(
            negative.validate(),
            Err(ValidationError::CommissionBoundOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_commission() {
        let params = BacktestParameters::default().with_commission(f64::NAN);
        assert!(matches!(
            params.validate(),
            Err(ValidationError::NonFiniteParameter { .. })
        ));
    }

    #[test]
    fn test_with_windows_keeps_family() {
        let ema = StrategyKind::EmaCross { fast: 1, slow: 2 }.with_windows(5, 20);
        assert_eq!(ema, StrategyKind::EmaCross { fast: 5, slow: 20 });
    }
}
