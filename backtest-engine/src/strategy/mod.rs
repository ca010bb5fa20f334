//! Strategy contract and the built-in crossover strategies.
//!
//! A strategy is constructed against one [`MarketData`], computes all of its
//! indicators in [`Strategy::init`] and then takes at most one action per
//! step in [`Strategy::next`], through the broker it is handed.

pub mod ema_cross;
pub mod sma_cross;

pub use ema_cross::EmaCross;
pub use sma_cross::SmaCross;

use std::cell::Cell;
use std::rc::Rc;

use common::{StrategyKind, ValidationError};

use crate::broker::Broker;
use crate::data::MarketData;
use crate::indicators::{crossover, Indicator};

pub trait Strategy {
    fn name(&self) -> &str;

    /// Called exactly once before the main loop
    fn init(&mut self) -> Result<(), ValidationError>;

    /// Called once per step with the absolute bar index. Only indicator
    /// values before `tick` may be consulted.
    fn next(&mut self, tick: usize, broker: &mut dyn Broker);

    fn indicators(&self) -> &Indicators;
}

/// Indicator vectors owned by one strategy, bound to the series they describe
#[derive(Debug)]
pub struct Indicators {
    data: Rc<MarketData>,
    computed: Vec<Indicator>,
    sealed: Cell<bool>,
}

impl Indicators {
    pub fn new(data: Rc<MarketData>) -> Self {
        Self {
            data,
            computed: Vec::new(),
            sealed: Cell::new(false),
        }
    }

    pub fn data(&self) -> &MarketData {
        &self.data
    }

    /// Run `f` over the series and register the result.
    ///
    /// The output must have one value per bar. Fails once the registry has
    /// been sealed at the end of initialization.
    pub fn compute<F>(&mut self, name: &str, f: F) -> Result<Indicator, ValidationError>
    where
        F: FnOnce(&MarketData) -> Vec<f64>,
    {
        if self.sealed.get() {
            return Err(ValidationError::IndicatorAfterInit);
        }

        let values = f(&self.data);
        if values.len() != self.data.len() {
            return Err(ValidationError::IndicatorLength {
                expected: self.data.len(),
                actual: values.len(),
            });
        }

        let indicator = Indicator::new(name, values);
        self.computed.push(indicator.clone());
        Ok(indicator)
    }

    pub(crate) fn seal(&self) {
        self.sealed.set(true);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.get()
    }

    pub fn get(&self, name: &str) -> Option<&Indicator> {
        self.computed.iter().find(|i| i.name() == name)
    }

    pub fn len(&self) -> usize {
        self.computed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.computed.is_empty()
    }
}

/// Build the strategy a config tag names
pub fn build_strategy(
    kind: StrategyKind,
    data: Rc<MarketData>,
) -> Result<Box<dyn Strategy>, ValidationError> {
    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::SmaCross { fast, slow } => Box::new(SmaCross::new(data, fast, slow)?),
        StrategyKind::EmaCross { fast, slow } => Box::new(EmaCross::new(data, fast, slow)?),
    };
    Ok(strategy)
}

pub(crate) fn check_window(name: &str, window: usize) -> Result<(), ValidationError> {
    if window == 0 {
        return Err(ValidationError::InvalidWindow {
            name: name.to_string(),
            window,
        });
    }
    Ok(())
}

/// Buy when `fast` crosses above `slow`, sell on the opposite cross, else hold
pub(crate) fn trade_crossover(
    tick: usize,
    fast: &Indicator,
    slow: &Indicator,
    broker: &mut dyn Broker,
) {
    let (fast, slow) = (fast.upto(tick), slow.upto(tick));

    if crossover(fast, slow) {
        broker.buy();
    } else if crossover(slow, fast) {
        broker.sell();
    }
}
