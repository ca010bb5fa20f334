use std::rc::Rc;

use common::ValidationError;

use super::{check_window, trade_crossover, Indicators, Strategy};
use crate::broker::Broker;
use crate::data::MarketData;
use crate::indicators::{ema, Indicator};

/// Crossover of two exponential moving averages
#[derive(Debug)]
pub struct EmaCross {
    name: String,
    fast_window: usize,
    slow_window: usize,
    indicators: Indicators,
    fast: Option<Indicator>,
    slow: Option<Indicator>,
}

impl EmaCross {
    pub fn new(
        data: Rc<MarketData>,
        fast_window: usize,
        slow_window: usize,
    ) -> Result<Self, ValidationError> {
        check_window("fast", fast_window)?;
        check_window("slow", slow_window)?;

        Ok(Self {
            name: format!("EmaCross({}, {})", fast_window, slow_window),
            fast_window,
            slow_window,
            indicators: Indicators::new(data),
            fast: None,
            slow: None,
        })
    }
}

impl Strategy for EmaCross {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) -> Result<(), ValidationError> {
        let (fast, slow) = (self.fast_window, self.slow_window);
        self.fast = Some(self.indicators.compute("ema_fast", |d| ema(d.closes(), fast))?);
        self.slow = Some(self.indicators.compute("ema_slow", |d| ema(d.closes(), slow))?);
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
