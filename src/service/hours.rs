//! Elapsed-time accounting for check-out.

use chrono::{DateTime, Utc};
use tracing::warn;

/// Elapsed duration between two instants, in hours.
///
/// Negative elapsed time is only reachable through clock anomalies or
/// upstream record tampering; it clamps to 0 rather than producing a
/// negative stored duration.
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds();
    if millis < 0 {
        warn!(%start, %end, "negative elapsed time clamped to zero");
        return 0.0;
    }
    millis as f64 / 3_600_000.0
}

/// Rounds to 2 decimal places, half away from zero (`f64::round` semantics).
pub fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
