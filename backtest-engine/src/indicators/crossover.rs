/// True when `a` just crossed above `b`.
///
/// Only the last two entries of each series are compared:
/// `a[-2] < b[-2] && a[-1] > b[-1]`. Series shorter than two entries never
/// cross, and NaN comparisons are false.
pub fn crossover(a: &[f64], b: &[f64]) -> bool {
    match (a, b) {
        ([.., a_prev, a_last], [.., b_prev, b_last]) => a_prev < b_prev && a_last > b_last,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upward_cross() {
        assert!(crossover(&[1.0, 3.0], &[2.0, 2.0]));
    }

    #[test]
    fn test_downward_cross_is_not_upward() {
        assert!(!crossover(&[3.0, 1.0], &[2.0, 2.0]));
        assert!(crossover(&[2.0, 2.0], &[3.0, 1.0]));
    }

    #[test]
    fn test_only_trailing_edge_counts() {
        // Crossed long ago, now just above
        assert!(!crossover(&[1.0, 3.0, 4.0, 5.0], &[2.0, 2.0, 2.0, 2.0]));
        // Crossed on the last step after a long stretch below
        assert!(crossover(&[5.0, 1.0, 1.0, 3.0], &[2.0, 2.0, 2.0, 2.0]));
    }

    #[test]
    fn test_touching_is_not_crossing() {
        assert!(!crossover(&[2.0, 3.0], &[2.0, 2.0]));
        assert!(!crossover(&[1.0, 2.0], &[2.0, 2.0]));
    }

    #[test]
    fn test_short_series() {
        assert!(!crossover(&[], &[]));
        assert!(!crossover(&[1.0], &[0.0]));
        assert!(!crossover(&[1.0, 3.0], &[2.0]));
    }

    #[test]
    fn test_unequal_lengths_use_tails() {
        assert!(crossover(&[9.0, 9.0, 1.0, 3.0], &[2.0, 2.0]));
    }

    #[test]
    fn test_nan_never_crosses() {
        assert!(!crossover(&[1.0, 3.0], &[f64::NAN, 2.0]));
        assert!(!crossover(&[f64::NAN, 3.0], &[2.0, 2.0]));
    }

    #[test]
    fn test_matches_definition_on_grid() {
        let values = [-1.0, 0.0, 1.0];
        for &a0 in &values {
            for &a1 in &values {
                for &b0 in &values {
                    for &b1 in &values {
                        let expected = a0 < b0 && a1 > b1;
                        assert_eq!(crossover(&[a0, a1], &[b0, b1]), expected);
                    }
                }
            }
        }
    }
}
