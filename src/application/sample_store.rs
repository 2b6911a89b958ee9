// Sample store - Per-channel history buffers
use crate::domain::reading::Reading;
use crate::domain::sample::{HistoryPoint, Sample};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

/// Minimum spacing between locally recorded samples
pub const RECORD_THROTTLE_SECS: i64 = 30;
pub const RETENTION_HOURS: i64 = 12;

#[derive(Debug)]
pub struct SampleStore {
    buffers: HashMap<String, Vec<Sample>>,
    retention: TimeDelta,
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleStore {
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            retention: TimeDelta::hours(RETENTION_HOURS),
        }
    }

    /// Append a locally observed value, throttled to one sample per 30 seconds.
    ///
    /// Returns whether a sample was appended.
    pub fn record_current(&mut self, channel: &str, value: f64, now: DateTime<Utc>) -> bool {
        if !value.is_finite() {
            return false;
        }

        let buffer = self.buffers.entry(channel.to_string()).or_default();
        if let Some(last) = buffer.last() {
            if now - last.timestamp < TimeDelta::seconds(RECORD_THROTTLE_SECS) {
                return false;
            }
        }

        buffer.push(Sample::new(now, value));

        let cutoff = now - self.retention;
        let expired = buffer.partition_point(|s| s.timestamp < cutoff);
        buffer.drain(..expired);
        true
    }

    /// Replace a channel's buffer with an authoritative bulk fetch.
    ///
    /// Non-numeric states are dropped; duplicate timestamps keep the last
    /// point delivered. Returns the number of samples kept.
    pub fn merge_bulk(&mut self, channel: &str, points: Vec<HistoryPoint>) -> usize {
        let mut samples: Vec<Sample> = points
            .into_iter()
            .filter_map(|p| {
                Reading::parse(&p.state)
                    .as_number()
                    .map(|value| Sample::new(p.timestamp, value))
            })
            .collect();

        // Stable sort keeps delivery order among equal timestamps
        samples.sort_by_key(|s| s.timestamp);

        let mut merged: Vec<Sample> = Vec::with_capacity(samples.len());
        for sample in samples {
            match merged.last_mut() {
                Some(last) if last.timestamp == sample.timestamp => *last = sample,
                _ => merged.push(sample),
            }
        }

        let kept = merged.len();
        self.buffers.insert(channel.to_string(), merged);
        kept
    }

    pub fn buffer_for(&self, channel: &str) -> &[Sample] {
        self.buffers
            .get(channel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
