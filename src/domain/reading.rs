// Raw channel state as pushed by the host
use serde::Serialize;

/// Sentinel states the host uses when a sensor has nothing to report
const ABSENT_STATES: [&str; 2] = ["unavailable", "unknown"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reading {
    Absent,
    Numeric(f64),
    Label(String),
}

impl Reading {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || ABSENT_STATES
                .iter()
                .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
        {
            return Reading::Absent;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Reading::Numeric(value),
            _ => Reading::Label(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Reading::Numeric(value) => Some(*value),
            _ => None,
        }
    }

    /// Text shown on the console: numbers with fixed decimals, labels verbatim
    pub fn display(&self, decimals: usize, fallback: &str) -> String {
        match self {
            Reading::Absent => fallback.to_string(),
            Reading::Numeric(value) => format!("{:.*}", decimals, value),
            Reading::Label(label) => label.clone(),
        }
    }
}

/// A reading resolved for display on a single console field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayValue {
    pub value: Option<f64>,
    pub text: String,
    pub unit: String,
}

impl DisplayValue {
    pub fn new(value: Option<f64>, text: String, unit: String) -> Self {
        Self { value, text, unit }
    }

    pub fn fallback(fallback: &str, unit: &str) -> Self {
        Self::new(None, fallback.to_string(), unit.to_string())
    }

    pub fn is_fallback(&self, fallback: &str) -> bool {
        self.text == fallback
    }
}
