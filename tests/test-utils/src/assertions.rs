//! Custom assertions for testing

use services_common::{LogEntry, LogLevel, TradeSignal};
use std::fmt::Debug;

/// Assert that two floating point values are approximately equal
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "Values not approximately equal: {left} != {right} (diff: {diff}, tolerance: {tolerance})"
    );
}

/// Assert that a value is within a closed range
pub fn assert_in_range<T: PartialOrd + Debug>(value: T, min: T, max: T) {
    assert!(
        value >= min && value <= max,
        "Value {value:?} not in range [{min:?}, {max:?}]"
    );
}

/// Count log entries of one level
pub fn count_level(logs: &[LogEntry], level: LogLevel) -> usize {
    logs.iter().filter(|entry| entry.level == level).count()
}

/// Assert exactly one ERROR entry and return it
pub fn assert_single_error(logs: &[LogEntry]) -> &LogEntry {
    let errors: Vec<&LogEntry> = logs
        .iter()
        .filter(|entry| entry.level == LogLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1, "Expected one ERROR entry, got {logs:?}");
    errors[0]
}

/// Assert signals are ordered newest first
pub fn assert_newest_first(signals: &[TradeSignal]) {
    for pair in signals.windows(2) {
        assert!(
            pair[0].timestamp >= pair[1].timestamp,
            "Signals not newest first: {} before {}",
            pair[0].timestamp,
            pair[1].timestamp
        );
    }
}
