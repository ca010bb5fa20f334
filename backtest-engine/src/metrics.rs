use chrono::{DateTime, Utc};
use common::{PerformanceSummary, Side, Trade};

/// Summary statistics over a finished run
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn summarize(
        initial_value: f64,
        ending_value: f64,
        equity_curve: &[(DateTime<Utc>, f64)],
        trades: &[Trade],
    ) -> PerformanceSummary {
        let count = |side: Side| trades.iter().filter(|t| t.side == side).count() as u32;

        PerformanceSummary {
            return_pct: (ending_value - initial_value) / initial_value * 100.0,
            max_drawdown_pct: Self::max_drawdown(equity_curve),
            buys: count(Side::Buy),
            sells: count(Side::Sell),
        }
    }

    /// Largest peak-to-trough decline, in percent of the peak
    pub fn max_drawdown(equity_curve: &[(DateTime<Utc>, f64)]) -> f64 {
        let Some(&(_, first)) = equity_curve.first() else {
            return 0.0;
        };

        let mut max_equity = first;
        let mut max_drawdown = 0.0;

        for &(_, equity) in equity_curve {
            if equity > max_equity {
                max_equity = equity;
            }

            if max_equity > 0.0 {
                let drawdown = (max_equity - equity) / max_equity * 100.0;
                if drawdown > max_drawdown {
                    max_drawdown = drawdown;
                }
            }
        }

        max_drawdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_equity_curve(values: &[f64]) -> Vec<(DateTime<Utc>, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                (
                    Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 12, 0, 0).unwrap(),
                    v,
                )
            })
            .collect()
    }

    fn trade(side: Side) -> Trade {
        Trade {
            tick: 0,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            side,
            price: 1.0,
            quantity: 1.0,
            cash_after: 0.0,
        }
    }

    #[test]
    fn test_summary() {
        let equity = make_equity_curve(&[10000.0, 10100.0, 10200.0, 10400.0]);
        let trades = vec![trade(Side::Buy), trade(Side::Sell), trade(Side::Buy)];

        let summary = MetricsCalculator::summarize(10000.0, 10400.0, &equity, &trades);

        assert_eq!(summary.return_pct, 4.0);
        assert_eq!(summary.max_drawdown_pct, 0.0);
        assert_eq!(summary.buys, 2);
        assert_eq!(summary.sells, 1);
    }

    #[test]
    fn test_max_drawdown() {
        let equity = make_equity_curve(&[10000.0, 11000.0, 9000.0, 9500.0, 10500.0]);
        let max_dd = MetricsCalculator::max_drawdown(&equity);

        // Peak was 11000, trough was 9000 = 18.18% drawdown
        assert!((max_dd - 18.18).abs() < 0.1);
    }

    #[test]
    fn test_max_drawdown_empty() {
        assert_eq!(MetricsCalculator::max_drawdown(&[]), 0.0);
    }
}
