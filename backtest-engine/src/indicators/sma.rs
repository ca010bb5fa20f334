/// Simple moving average.
///
/// Same length as `values`. Entry `i` is the mean of `values[i + 1 - window..=i]`;
/// the first `window - 1` entries are NaN, as is everything when `window`
/// is 0 or exceeds the input.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];

    if window == 0 || n < window {
        return out;
    }

    for (slot, w) in out[window - 1..].iter_mut().zip(values.windows(window)) {
        *slot = w.iter().sum::<f64>() / window as f64;
    }

    out
}
