use chrono::{DateTime, Duration, Utc};
use common::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Days from the unix epoch to 2024-01-01
const BASE_DAY: i64 = 19_723;

/// Generate a random-walk daily series for demos and smoke runs
pub fn generate_synthetic_bars(days: usize, initial_price: f64, seed: Option<u64>) -> Vec<Bar> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut bars = Vec::with_capacity(days);

    let mut price = initial_price;
    let daily_volatility = 0.02;
    let drift = 0.0005;

    for i in 0..days {
        let random_return: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = drift + daily_volatility * random_return;
        let new_price = (price * (1.0 + daily_return)).max(0.01);

        let intraday_range = price * rng.gen_range(0.005..0.03);
        let open = price;
        let close = new_price;
        let high = open.max(close) + rng.gen_range(0.0..intraday_range);
        let low = (open.min(close) - rng.gen_range(0.0..intraday_range)).max(0.0);

        let volume = 1_000_000.0 * (1.0 + daily_return.abs() * 10.0) * rng.gen_range(0.8..1.2);

        bars.push(Bar::new(day(i), open, high, low, close, Some(volume)));

        price = new_price;
    }

    bars
}

/// Flat bars (open = high = low = close) on consecutive days
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar::new(day(i), close, close, close, close, Some(1000.0)))
        .collect()
}

fn day(i: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(BASE_DAY + i as i64)
}
