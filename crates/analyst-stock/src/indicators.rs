//! Rolling indicators over a close-price series

use ta::{Next, indicators::SimpleMovingAverage};

/// Short moving-average window (trading days)
pub const MA_SHORT: usize = 50;

/// Long moving-average window (trading days)
pub const MA_LONG: usize = 200;

/// Simple moving average of `closes` over `window` periods
///
/// The output has one entry per input. Entry `i` is the mean of
/// `closes[i + 1 - window..=i]`, or `None` while fewer than `window` values
/// have been seen. A zero window yields all `None`.
pub fn rolling_mean(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let Ok(mut sma) = SimpleMovingAverage::new(window) else {
        return vec![None; closes.len()];
    };

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            // ta averages over what it has seen so far during warm-up
            let value = sma.next(close);
            (i + 1 >= window).then_some(value)
        })
        .collect()
}
