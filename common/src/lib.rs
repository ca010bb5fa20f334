pub mod config;
pub mod error;
pub mod types;

pub use config::{BacktestParameters, BrokerKind, StrategyKind};
pub use error::{BacktestError, Result, ValidationError};
pub use types::*;
