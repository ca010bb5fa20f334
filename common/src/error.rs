use thiserror::Error;

/// Structural failures detected before any simulation step runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Input table is empty")]
    EmptySeries,

    #[error("Input table is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Column '{column}' has {actual} values, index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Initial cash must be greater than 0, got {cash}")]
    NonPositiveCash { cash: f64 },

    #[error("Commission rate must be within [0, {max}], got {commission}")]
    CommissionOutOfRange { commission: f64, max: f64 },

    #[error("Parameter '{name}' must be a finite number")]
    NonFiniteParameter { name: String },

    #[error("Indicator length must match data length: expected {expected}, got {actual}")]
    IndicatorLength { expected: usize, actual: usize },

    #[error("Indicators can only be computed during strategy initialization")]
    IndicatorAfterInit,

    #[error("Invalid {name} window: {window}")]
    InvalidWindow { name: String, window: usize },

    #[error("Commission bound must be within [0, 1), got {max}")]
    CommissionBoundOutOfRange { max: f64 },
}

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("CSV parse error: {0}")]
    CsvError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BacktestError>;
