use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::Bar;

pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

/// Columns that must be present and fully populated
pub const REQUIRED_COLUMNS: [&str; 4] = [OPEN, HIGH, LOW, CLOSE];

/// Raw tabular price input: a timestamp index plus named nullable columns.
///
/// This is what a data-loading collaborator hands to the engine. Nothing
/// here is validated; [`MarketData`](super::MarketData) does that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    index: Vec<DateTime<Utc>>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: BTreeMap::new(),
        }
    }

    /// Build a fully populated table from bars
    pub fn from_bars(bars: &[Bar]) -> Self {
        let index = bars.iter().map(|b| b.timestamp).collect();
        Self::new(index)
            .with_column(OPEN, bars.iter().map(|b| Some(b.open)).collect())
            .with_column(HIGH, bars.iter().map(|b| Some(b.high)).collect())
            .with_column(LOW, bars.iter().map(|b| Some(b.low)).collect())
            .with_column(CLOSE, bars.iter().map(|b| Some(b.close)).collect())
            .with_column(VOLUME, bars.iter().map(|b| b.volume).collect())
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.insert_column(name, values);
        self
    }

    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        self.columns.insert(name.into(), values);
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Option<f64>>> {
        self.columns.remove(name)
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::bars_from_closes;

    #[test]
    fn test_from_bars_populates_all_columns() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        let table = PriceTable::from_bars(&bars);

        assert_eq!(table.len(), 3);
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec![CLOSE, HIGH, LOW, OPEN, VOLUME]);
        assert_eq!(
            table.column(CLOSE).unwrap(),
            &[Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_remove_column() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        let mut table = PriceTable::from_bars(&bars);

        assert!(table.remove_column(VOLUME).is_some());
        assert!(table.column(VOLUME).is_none());
    }
}
