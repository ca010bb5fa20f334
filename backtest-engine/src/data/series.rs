use common::{Bar, ValidationError};
use tracing::warn;

use super::table::{PriceTable, CLOSE, HIGH, LOW, OPEN, REQUIRED_COLUMNS, VOLUME};

/// Validated, time-ordered OHLCV series.
///
/// Built once per run and read-only afterwards. `close` is the price every
/// trade executes at.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    bars: Vec<Bar>,
    closes: Vec<f64>,
}

impl MarketData {
    /// Copy and validate a raw table.
    ///
    /// Fails when the table is empty, a required column is absent, a column
    /// length disagrees with the index, or a required cell is null or NaN.
    /// A missing Volume column becomes `None` for every bar. An unordered
    /// index is stable-sorted.
    pub fn from_table(table: &PriceTable) -> Result<Self, ValidationError> {
        if table.is_empty() {
            return Err(ValidationError::EmptySeries);
        }

        let rows = table.len();
        for name in REQUIRED_COLUMNS {
            let column = table
                .column(name)
                .ok_or_else(|| ValidationError::MissingColumn {
                    column: name.to_string(),
                })?;
            check_length(name, column.len(), rows)?;
        }

        let volume = table.column(VOLUME);
        match volume {
            Some(column) => check_length(VOLUME, column.len(), rows)?,
            None => warn!("input has no Volume column, filling with undefined values"),
        }

        let bars = table
            .index()
            .iter()
            .enumerate()
            .map(|(row, &timestamp)| -> Result<Bar, ValidationError> {
                Ok(Bar {
                    timestamp,
                    open: required_cell(table, OPEN, row)?,
                    high: required_cell(table, HIGH, row)?,
                    low: required_cell(table, LOW, row)?,
                    close: required_cell(table, CLOSE, row)?,
                    volume: volume.and_then(|v| v[row]).filter(|v| !v.is_nan()),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self::sorted(bars))
    }

    /// Validate bars that are already in memory
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, ValidationError> {
        if bars.is_empty() {
            return Err(ValidationError::EmptySeries);
        }

        for (row, bar) in bars.iter().enumerate() {
            for (column, value) in [
                (OPEN, bar.open),
                (HIGH, bar.high),
                (LOW, bar.low),
                (CLOSE, bar.close),
            ] {
                if value.is_nan() {
                    return Err(ValidationError::MissingValue {
                        column: column.to_string(),
                        row,
                    });
                }
            }
        }

        Ok(Self::sorted(bars))
    }

    fn sorted(mut bars: Vec<Bar>) -> Self {
        let ordered = bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
        if !ordered {
            warn!(bars = bars.len(), "input index is not time-ordered, sorting");
            bars.sort_by_key(|b| b.timestamp);
        }

        let closes = bars.iter().map(|b| b.close).collect();
        Self { bars, closes }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// Close at `index`. Panics when out of range.
    pub fn close(&self, index: usize) -> f64 {
        self.closes[index]
    }

    pub fn volumes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }
}

fn check_length(column: &str, actual: usize, expected: usize) -> Result<(), ValidationError> {
    if actual != expected {
        return Err(ValidationError::LengthMismatch {
            column: column.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn required_cell(table: &PriceTable, column: &str, row: usize) -> Result<f64, ValidationError> {
    table
        .column(column)
        .and_then(|values| values[row])
        .filter(|v| !v.is_nan())
        .ok_or_else(|| ValidationError::MissingValue {
            column: column.to_string(),
            row,
        })
}
