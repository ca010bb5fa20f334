pub mod crossover;
pub mod ema;
pub mod sma;

pub use crossover::crossover;
pub use ema::ema;
pub use sma::sma;

use std::rc::Rc;

/// One value per bar, computed once during strategy initialization.
///
/// Cloning is cheap; clones share the same values.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    name: String,
    values: Rc<[f64]>,
}

impl Indicator {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values strictly before `tick`, i.e. `values[..tick]`
    pub fn upto(&self, tick: usize) -> &[f64] {
        &self.values[..tick.min(self.values.len())]
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upto_excludes_tick() {
        let ind = Indicator::new("x", vec![1.0, 2.0, 3.0, 4.0]);

        assert_eq!(ind.upto(0), &[] as &[f64]);
        assert_eq!(ind.upto(2), &[1.0, 2.0]);
        assert_eq!(ind.upto(10), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_clones_share_values() {
        let ind = Indicator::new("x", vec![1.0]);
        let copy = ind.clone();
        assert!(std::ptr::eq(ind.values(), copy.values()));
        assert_eq!(copy.name(), "x");
    }
}
