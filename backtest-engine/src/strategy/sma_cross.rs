use std::rc::Rc;

use common::ValidationError;

use super::{check_window, trade_crossover, Indicators, Strategy};
use crate::broker::Broker;
use crate::data::MarketData;
use crate::indicators::{sma, Indicator};

/// Moving-average crossover: long while the fast SMA is above the slow one
#[derive(Debug)]
pub struct SmaCross {
    name: String,
    fast_window: usize,
    slow_window: usize,
    indicators: Indicators,
    fast: Option<Indicator>,
    slow: Option<Indicator>,
}

impl SmaCross {
    pub fn new(
        data: Rc<MarketData>,
        fast_window: usize,
        slow_window: usize,
    ) -> Result<Self, ValidationError> {
        check_window("fast", fast_window)?;
        check_window("slow", slow_window)?;

        Ok(Self {
            name: format!("SmaCross({}, {})", fast_window, slow_window),
            fast_window,
            slow_window,
            indicators: Indicators::new(data),
            fast: None,
            slow: None,
        })
    }

    pub fn windows(&self) -> (usize, usize) {
        (self.fast_window, self.slow_window)
    }
}

impl Strategy for SmaCross {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) -> Result<(), ValidationError> {
        let (fast, slow) = self.windows();
        self.fast = Some(self.indicators.compute("sma_fast", |d| sma(d.closes(), fast))?);
        self.slow = Some(self.indicators.compute("sma_slow", |d| sma(d.closes(), slow))?);
        Ok(())
    }

    fn next(&mut self, tick: usize, broker: &mut dyn Broker) {
        if let (Some(fast), Some(slow)) = (&self.fast, &self.slow) {
            trade_crossover(tick, fast, slow, broker);
        }
    }

    fn indicators(&self) -> &Indicators {
        &self.indicators
    }
}
