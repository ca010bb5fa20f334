use common::{BacktestParameters, ValidationError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::data::PriceTable;
use crate::engine::Backtest;

/// Outcome of one grid point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub fast: usize,
    pub slow: usize,
    pub ending_market_value: f64,
    pub profit_or_loss: f64,
    pub trades: usize,
}

/// Evaluate every `fast < slow` window pair of the base strategy family.
///
/// Each point validates its own copy of the table and runs a fresh
/// backtest, so points share nothing but the read-only input.
pub fn run_grid(
    table: &PriceTable,
    base: &BacktestParameters,
    fast: &[usize],
    slow: &[usize],
) -> Result<Vec<SweepPoint>, ValidationError> {
    let grid: Vec<(usize, usize)> = fast
        .iter()
        .flat_map(|&f| slow.iter().map(move |&s| (f, s)))
        .filter(|(f, s)| f < s)
        .collect();

    info!(points = grid.len(), "running parameter sweep");

    grid.par_iter()
        .map(|&(f, s)| -> Result<SweepPoint, ValidationError> {
            let params = base
                .clone()
                .with_strategy(base.strategy.with_windows(f, s));
            let result = Backtest::from_params(table, &params)?.run()?;

            Ok(SweepPoint {
                fast: f,
                slow: s,
                ending_market_value: result.ending_market_value,
                profit_or_loss: result.profit_or_loss,
                trades: result.trades.len(),
            })
        })
        .collect()
}

/// Most profitable point
pub fn best(points: &[SweepPoint]) -> Option<&SweepPoint> {
    points
        .iter()
        .max_by(|a, b| a.profit_or_loss.total_cmp(&b.profit_or_loss))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::bars_from_closes;

    fn v_shape() -> PriceTable {
        let closes: Vec<f64> = (0..300).map(|i| 100.0 + (i as f64 - 109.0).abs()).collect();
        PriceTable::from_bars(&bars_from_closes(&closes))
    }

    #[test]
    fn test_grid_skips_inverted_pairs() {
        let points = run_grid(
            &v_shape(),
            &BacktestParameters::default(),
            &[10, 30, 90],
            &[30, 90],
        )
        .unwrap();

        let pairs: Vec<(usize, usize)> = points.iter().map(|p| (p.fast, p.slow)).collect();
        assert_eq!(pairs, vec![(10, 30), (10, 90), (30, 90)]);
    }

    #[test]
    fn test_grid_matches_single_run() {
        let table = v_shape();
        let params = BacktestParameters::default();
        let points = run_grid(&table, &params, &[30], &[90]).unwrap();
        let single = Backtest::from_params(&table, &params).unwrap().run().unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].ending_market_value, single.ending_market_value);
        assert_eq!(points[0].trades, single.trades.len());
    }

    #[test]
    fn test_best_picks_highest_profit() {
        let points = run_grid(
            &v_shape(),
            &BacktestParameters::default(),
            &[5, 10, 30],
            &[60, 90],
        )
        .unwrap();
        let top = best(&points).unwrap();

        assert!(points.iter().all(|p| p.profit_or_loss <= top.profit_or_loss));
    }

    #[test]
    fn test_invalid_base_fails() {
        let params = BacktestParameters::default().with_cash(0.0);
        let result = run_grid(&v_shape(), &params, &[30], &[90]);
        assert_eq!(result, Err(ValidationError::NonPositiveCash { cash: 0.0 }));
    }
}
