// Time-series domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Smallest value span a chart is allowed to map onto
pub const MIN_VALUE_SPAN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// One entry of a bulk history response, before numeric parsing
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub state: String,
}

impl HistoryPoint {
    pub fn new(timestamp: DateTime<Utc>, state: impl Into<String>) -> Self {
        Self {
            timestamp,
            state: state.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range over the given values, padded symmetrically to [`MIN_VALUE_SPAN`]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut found = false;

        for value in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(value);
            max = max.max(value);
            found = true;
        }

        if !found {
            return None;
        }

        if max - min < MIN_VALUE_SPAN {
            let mid = (min + max) / 2.0;
            min = mid - MIN_VALUE_SPAN / 2.0;
            max = mid + MIN_VALUE_SPAN / 2.0;
        }

        Some(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_of_equal_values_is_padded() {
        let range = ValueRange::from_values([71.0, 71.0, 71.0]).unwrap();
        assert_eq!(range.min, 70.75);
        assert_eq!(range.max, 71.25);
    }

    #[test]
    fn test_narrow_range_is_padded_around_midpoint() {
        let range = ValueRange::from_values([10.0, 10.2]).unwrap();
        assert!((range.span() - MIN_VALUE_SPAN).abs() < 1e-12);
        assert!((range.min - 9.85).abs() < 1e-12);
    }

    #[test]
    fn test_wide_range_is_untouched() {
        let range = ValueRange::from_values([3.0, -2.0, 8.0]).unwrap();
        assert_eq!(range, ValueRange { min: -2.0, max: 8.0 });
    }

    #[test]
    fn test_empty_range() {
        assert!(ValueRange::from_values(Vec::<f64>::new()).is_none());
        assert!(ValueRange::from_values([f64::NAN]).is_none());
    }
}
