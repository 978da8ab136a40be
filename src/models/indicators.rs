//! Moving-average indicators drawn on price charts

use crate::constants::MA_PERIODS;
use crate::models::Bar;

/// Simple moving average over closing prices
///
/// Returns one value per input position; positions before the window fills
/// are `None`, matching a rolling-window mean.
pub fn sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];

    if period == 0 || closes.len() < period {
        return values;
    }

    for i in (period - 1)..closes.len() {
        let start = i + 1 - period;
        let sum: f64 = closes[start..=i].iter().sum();
        values[i] = Some(sum / period as f64);
    }

    values
}

/// Fill ma5/ma20/ma60 on a chronologically sorted series
pub fn apply_moving_averages(bars: &mut [Bar]) {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let [p5, p20, p60] = MA_PERIODS;
    let ma5 = sma(&closes, p5);
    let ma20 = sma(&closes, p20);
    let ma60 = sma(&closes, p60);

    for (i, bar) in bars.iter_mut().enumerate() {
        bar.ma5 = ma5[i];
        bar.ma20 = ma20[i];
        bar.ma60 = ma60[i];
    }
}
