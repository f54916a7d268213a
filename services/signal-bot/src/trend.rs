//! Coarse trend classification from two adjacent price windows

use services_common::MarketTrend;

/// Size of the recent and the prior comparison windows
pub const TREND_WINDOW: usize = 10;
/// Relative move of the recent mean required to call a trend
pub const TREND_BAND: f64 = 0.01;

/// Compare the mean of the last 10 prices with the mean of the up-to-10
/// prices before them.
///
/// A recent mean more than 1% above the prior one is `Uptrend`; one at or
/// below 99% of it is `Downtrend`. Fewer than 10 prices, or
/// no prior prices at all, is `Sideways`. With 11..19 prices the prior
/// window is whatever precedes the recent one.
pub fn determine_trend(prices: &[f64]) -> MarketTrend {
    if prices.len() < TREND_WINDOW {
        return MarketTrend::Sideways;
    }

    let split = prices.len() - TREND_WINDOW;
    let recent = &prices[split..];
    let older = &prices[split.saturating_sub(TREND_WINDOW)..split];
    if older.is_empty() {
        return MarketTrend::Sideways;
    }

    let recent_avg = mean(recent);
    let older_avg = mean(older);

    if recent_avg > older_avg * (1.0 + TREND_BAND) {
        MarketTrend::Uptrend
    } else if recent_avg <= older_avg * (1.0 - TREND_BAND) {
        MarketTrend::Downtrend
    } else {
        MarketTrend::Sideways
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
