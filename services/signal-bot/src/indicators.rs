//! Technical indicators over close prices
//!
//! Pure functions, no state kept between calls. Input must be ordered
//! oldest first; nothing here re-sorts. Every indicator has its own
//! insufficient-data fallback, so `analyze_all` cannot fail.

use services_common::{BollingerBands, IndicatorSet, MacdValues};

pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// RSI value reported when there is not enough data
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index with Wilder smoothing.
///
/// Seeds average gain/loss with the plain mean of the first `period`
/// changes, then smooths each later change as
/// `avg = (avg * (period - 1) + x) / period`. Returns 50 with fewer than
/// `period + 1` prices and 100 when the final average loss is zero.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let n = period as f64;
    let mut avg_gain = gains / n;
    let mut avg_loss = losses / n;

    for i in (period + 1)..prices.len() {
        let change = prices[i] - prices[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Exponential moving average seeded with the first price.
///
/// Empty input gives 0 and a single price is returned unchanged. There is
/// no minimum length relative to `period`.
pub fn ema(prices: &[f64], period: usize) -> f64 {
    let Some((&first, rest)) = prices.split_first() else {
        return 0.0;
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    rest.iter()
        .fold(first, |ema, &price| price * multiplier + ema * (1.0 - multiplier))
}

/// Mean of the last `period` prices, or 0 when fewer are available
pub fn sma(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return 0.0;
    }
    prices[prices.len() - period..].iter().sum::<f64>() / period as f64
}

/// Bollinger Bands: SMA middle line ± `k` population standard deviations
/// over the last `period` prices.
pub fn bollinger_bands(prices: &[f64], period: usize, k: f64) -> BollingerBands {
    if period == 0 {
        return BollingerBands::default();
    }

    let middle = sma(prices, period);
    let window = &prices[prices.len().saturating_sub(period)..];
    let variance = window
        .iter()
        .map(|p| (p - middle).powi(2))
        .sum::<f64>()
        / period as f64;
    let width = k * variance.sqrt();

    BollingerBands {
        upper: middle + width,
        middle,
        lower: middle - width,
    }
}

/// MACD line (EMA12 - EMA26) with its signal line and histogram.
///
/// The signal line smooths only the current MACD value, so it equals the
/// MACD line and the histogram is always 0.
pub fn macd(prices: &[f64]) -> MacdValues {
    let line = ema(prices, MACD_FAST) - ema(prices, MACD_SLOW);
    let signal = ema(&[line], MACD_SIGNAL);
    MacdValues {
        macd: line,
        signal,
        histogram: line - signal,
    }
}

/// Compute the full indicator set for one cycle
pub fn analyze_all(prices: &[f64]) -> IndicatorSet {
    IndicatorSet {
        rsi: rsi(prices, RSI_PERIOD),
        macd: macd(prices),
        bollinger: bollinger_bands(prices, BOLLINGER_PERIOD, BOLLINGER_K),
        ema20: ema(prices, 20),
        ema50: ema(prices, 50),
        sma200: sma(prices, 200),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_recurrence() {
        // multiplier for period 3 is 0.5
        let value = ema(&[10.0, 20.0, 30.0], 3);
        assert!((value - 22.5).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_mixed_changes() {
        // 2 gains of 1 and 1 loss of 1 over period 3, no smoothing steps
        let value = rsi(&[10.0, 11.0, 10.0, 11.0], 3);
        let expected = 100.0 - 100.0 / (1.0 + 2.0);
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sma_uses_tail() {
        assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), 3.5);
    }
}
