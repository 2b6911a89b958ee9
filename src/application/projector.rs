// Window projector - Maps samples in a trailing window onto a unit square, larger values on top
use crate::domain::sample::{Sample, ValueRange};
use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapping {
    start: DateTime<Utc>,
    window_ms: f64,
    range: ValueRange,
}

impl Mapping {
    /// Fraction of the window elapsed at `timestamp`; not clipped
    pub fn to_x(&self, timestamp: DateTime<Utc>) -> f64 {
        (timestamp - self.start).num_milliseconds() as f64 / self.window_ms
    }

    pub fn to_y(&self, value: f64) -> f64 {
        1.0 - (value - self.range.min) / self.range.span()
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        self.start
    }
}

/// Build a mapping for `samples` over `[now - window, now]`.
///
/// Returns `None` when fewer than two samples are available.
pub fn project(samples: &[Sample], now: DateTime<Utc>, window: TimeDelta) -> Option<Mapping> {
    if samples.len() < 2 {
        return None;
    }

    let window_ms = window.num_milliseconds();
    if window_ms <= 0 {
        return None;
    }

    let range = ValueRange::from_values(samples.iter().map(|s| s.value))?;

    Some(Mapping {
        start: now - window,
        window_ms: window_ms as f64,
        range,
    })
}

/// The part of an ordered buffer that falls inside `[now - window, now]`
pub fn in_window(samples: &[Sample], now: DateTime<Utc>, window: TimeDelta) -> &[Sample] {
    let start = now - window;
    let lo = samples.partition_point(|s| s.timestamp < start);
    let hi = samples.partition_point(|s| s.timestamp <= now);
    if lo >= hi { &[] } else { &samples[lo..hi] }
}
