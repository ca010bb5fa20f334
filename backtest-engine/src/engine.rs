use std::rc::Rc;

use common::{BacktestParameters, BacktestResult, BrokerKind, ValidationError};
use tracing::{info, warn};

use crate::broker::{Broker, SimulatedBroker};
use crate::data::{MarketData, PriceTable};
use crate::metrics::MetricsCalculator;
use crate::strategy::{build_strategy, Strategy};

/// One backtest run: a validated series, a broker and a strategy bound to it.
///
/// Construction performs every validation; [`Backtest::run`] consumes the
/// instance, so a second run needs a fresh one.
pub struct Backtest {
    data: Rc<MarketData>,
    broker: Box<dyn Broker>,
    strategy: Box<dyn Strategy>,
    warmup: usize,
}

impl Backtest {
    /// Wire a run from factories producing the strategy and broker.
    ///
    /// Each factory receives the validated series the run will replay.
    pub fn new<S, B, FS, FB>(
        table: &PriceTable,
        strategy: FS,
        broker: FB,
        warmup: usize,
    ) -> Result<Self, ValidationError>
    where
        S: Strategy + 'static,
        B: Broker + 'static,
        FS: FnOnce(Rc<MarketData>) -> Result<S, ValidationError>,
        FB: FnOnce(Rc<MarketData>) -> Result<B, ValidationError>,
    {
        let data = Rc::new(MarketData::from_table(table)?);
        let broker = broker(Rc::clone(&data))?;
        let strategy = strategy(Rc::clone(&data))?;
        Self::assemble(data, Box::new(broker), Box::new(strategy), warmup)
    }

    /// Wire a run from configuration tags
    pub fn from_params(
        table: &PriceTable,
        params: &BacktestParameters,
    ) -> Result<Self, ValidationError> {
        params.validate()?;

        let data = Rc::new(MarketData::from_table(table)?);
        let broker: Box<dyn Broker> = match params.broker {
            BrokerKind::Simulated => {
                Box::new(SimulatedBroker::from_params(Rc::clone(&data), params)?)
            }
        };
        let strategy = build_strategy(params.strategy, Rc::clone(&data))?;

        Self::assemble(data, broker, strategy, params.warmup)
    }

    fn assemble(
        data: Rc<MarketData>,
        broker: Box<dyn Broker>,
        strategy: Box<dyn Strategy>,
        warmup: usize,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            data,
            broker,
            strategy,
            warmup,
        })
    }

    pub fn data(&self) -> &MarketData {
        &self.data
    }

    pub fn warmup(&self) -> usize {
        self.warmup
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Initialize the strategy, replay bars `warmup..len` and report
    pub fn run(self) -> Result<BacktestResult, ValidationError> {
        let Self {
            data,
            mut broker,
            mut strategy,
            warmup,
        } = self;

        strategy.init()?;
        strategy.indicators().seal();

        let end = data.len();
        info!(
            strategy = strategy.name(),
            bars = end,
            warmup,
            "starting backtest"
        );

        let bars_processed = end.saturating_sub(warmup);
        if bars_processed == 0 {
            warn!(warmup, bars = end, "warm-up covers the whole series, no bars simulated");
            // Ending value is still priced at the final close
            broker.advance_to(end - 1);
        }

        let mut equity_curve = Vec::with_capacity(bars_processed);
        for tick in warmup..end {
            // Broker first: the strategy decides on, and fills at, bar `tick`
            broker.advance_to(tick);
            strategy.next(tick, &mut *broker);
            equity_curve.push((data.bars()[tick].timestamp, broker.market_value()));
        }

        let initial_market_value = broker.initial_cash();
        let ending_market_value = broker.market_value();
        let trades = broker.trades().to_vec();
        let summary = MetricsCalculator::summarize(
            initial_market_value,
            ending_market_value,
            &equity_curve,
            &trades,
        );

        info!(
            strategy = strategy.name(),
            trades = trades.len(),
            ending_market_value,
            return_pct = summary.return_pct,
            "backtest completed"
        );

        Ok(BacktestResult {
            strategy: strategy.name().to_string(),
            initial_market_value,
            ending_market_value,
            profit_or_loss: ending_market_value - initial_market_value,
            summary,
            trades,
            equity_curve,
            warmup,
            bars_processed,
            start: data.first().timestamp,
            end: data.last().timestamp,
        })
    }
}
