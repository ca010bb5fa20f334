pub mod broker;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod metrics;
pub mod strategy;
pub mod sweep;

pub use broker::{Broker, SimulatedBroker};
pub use data::{generate_synthetic_bars, load_file, MarketData, PriceTable};
pub use engine::Backtest;
pub use indicators::{crossover, ema, sma, Indicator};
pub use metrics::MetricsCalculator;
pub use strategy::{build_strategy, EmaCross, Indicators, SmaCross, Strategy};

// Re-export common types
pub use common::{
    BacktestError, BacktestParameters, BacktestResult, Bar, BrokerKind, PerformanceSummary,
    Result, Side, StrategyKind, Trade, ValidationError,
};
