/// Exponential moving average seeded with the SMA of the first `window` values.
///
/// Same length as `values`; the first `window - 1` entries are NaN.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];

    if window == 0 || n < window {
        return out;
    }

    let multiplier = 2.0 / (window as f64 + 1.0);

    // Use SMA as initial seed
    out[window - 1] = values[..window].iter().sum::<f64>() / window as f64;

    for i in window..n {
        out[i] = (values[i] - out[i - 1]) * multiplier + out[i - 1];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ema_with_sma_seed() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let ema = ema(&prices, 3);

        assert_eq!(ema.len(), prices.len());
        assert!(ema[0].is_nan());
        assert!(ema[1].is_nan());
        assert_eq!(ema[2], 2.0); // SMA of first 3 = (1+2+3)/3 = 2
        // multiplier 0.5: (4 - 2) * 0.5 + 2
        assert_relative_eq!(ema[3], 3.0);
    }

    #[test]
    fn test_ema_trends_towards_price() {
        let prices = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let ema = ema(&prices, 2);

        for i in 2..prices.len() {
            assert!(ema[i] > ema[i - 1]);
            assert!(ema[i] < prices[i]);
        }
    }

    #[test]
    fn test_ema_short_input() {
        let ema = ema(&[1.0], 3);
        assert_eq!(ema.len(), 1);
        assert!(ema[0].is_nan());
    }
}
