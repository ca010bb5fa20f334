use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// `None` when the source had no Volume column or a null cell
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// A full-allocation conversion executed by the broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub tick: usize,
    pub timestamp: DateTime<Utc>,
    pub side: Side,
    pub price: f64,
    /// Units bought or sold
    pub quantity: f64,
    pub cash_after: f64,
}

/// Aggregate statistics derived from the equity curve and trade log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub return_pct: f64,
    pub max_drawdown_pct: f64,
    pub buys: u32,
    pub sells: u32,
}

/// Backtest result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub strategy: String,
    pub initial_market_value: f64,
    pub ending_market_value: f64,
    pub profit_or_loss: f64,
    pub summary: PerformanceSummary,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<(DateTime<Utc>, f64)>,
    pub warmup: usize,
    pub bars_processed: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
