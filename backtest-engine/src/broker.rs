use std::rc::Rc;

use common::{BacktestParameters, Side, Trade, ValidationError};
use tracing::{debug, warn};

use crate::data::MarketData;

/// Default upper bound for the commission rate
pub const DEFAULT_MAX_COMMISSION: f64 = 0.05;

/// Account interface a strategy trades through.
///
/// Full allocation only: `buy` spends all cash, `sell` liquidates the whole
/// position, both at the close of the bar the broker currently points at.
pub trait Broker {
    /// Point the broker at bar `index`. An index past the end is clamped to the last bar
    fn advance_to(&mut self, index: usize);

    fn index(&self) -> usize;

    /// Close of the current bar
    fn current_price(&self) -> f64;

    fn buy(&mut self);

    fn sell(&mut self);

    fn cash(&self) -> f64;

    /// Units held
    fn position(&self) -> f64;

    fn initial_cash(&self) -> f64;

    fn trades(&self) -> &[Trade];

    fn market_value(&self) -> f64 {
        self.cash() + self.position() * self.current_price()
    }
}

/// Simulated exchange filling every order at the current close, net of commission
#[derive(Debug)]
pub struct SimulatedBroker {
    data: Rc<MarketData>,
    initial_cash: f64,
    cash: f64,
    position: f64,
    commission: f64,
    index: usize,
    trades: Vec<Trade>,
}

impl SimulatedBroker {
    pub fn new(data: Rc<MarketData>, cash: f64, commission: f64) -> Result<Self, ValidationError> {
        Self::with_max_commission(data, cash, commission, DEFAULT_MAX_COMMISSION)
    }

    pub fn with_max_commission(
        data: Rc<MarketData>,
        cash: f64,
        commission: f64,
        max_commission: f64,
    ) -> Result<Self, ValidationError> {
        BacktestParameters::default()
            .with_cash(cash)
            .with_commission(commission)
            .with_max_commission(max_commission)
            .validate()?;

        Ok(Self {
            data,
            initial_cash: cash,
            cash,
            position: 0.0,
            commission,
            index: 0,
            trades: Vec::new(),
        })
    }

    pub fn from_params(
        data: Rc<MarketData>,
        params: &BacktestParameters,
    ) -> Result<Self, ValidationError> {
        Self::with_max_commission(
            data,
            params.initial_cash,
            params.commission,
            params.max_commission,
        )
    }

    fn record(&mut self, side: Side, price: f64, quantity: f64) {
        debug!(tick = self.index, ?side, price, quantity, cash = self.cash, "order filled");
        self.trades.push(Trade {
            tick: self.index,
            timestamp: self.data.bars()[self.index].timestamp,
            side,
            price,
            quantity,
            cash_after: self.cash,
        });
    }

    fn tradable_price(&self) -> Option<f64> {
        let price = self.current_price();
        if price.is_finite() && price > 0.0 {
            Some(price)
        } else {
            warn!(tick = self.index, price, "skipping order at non-positive price");
            None
        }
    }
}

impl Broker for SimulatedBroker {
    fn advance_to(&mut self, index: usize) {
        let last = self.data.len() - 1;
        if index > last {
            warn!(index, last, "advance past the end of the series, clamping");
        }
        self.index = index.min(last);
    }

    fn index(&self) -> usize {
        self.index
    }

    fn current_price(&self) -> f64 {
        self.data.close(self.index)
    }

    fn buy(&mut self) {
        // Nothing to spend: already fully invested
        if self.cash <= 0.0 {
            return;
        }
        let Some(price) = self.tradable_price() else {
            return;
        };

        let quantity = self.cash * (1.0 - self.commission) / price;
        self.position += quantity;
        self.cash = 0.0;
        self.record(Side::Buy, price, quantity);
    }

    fn sell(&mut self) {
        if self.position <= 0.0 {
            return;
        }
        let Some(price) = self.tradable_price() else {
            return;
        };

        let quantity = self.position;
        self.cash += quantity * price * (1.0 - self.commission);
        self.position = 0.0;
        self.record(Side::Sell, price, quantity);
    }

    fn cash(&self) -> f64 {
        self.cash
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    fn trades(&self) -> &[Trade] {
        &self.trades
    }
}
