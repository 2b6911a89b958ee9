// Console snapshot domain model
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::geometry::{CompactSeries, GaugeGeometry, Plot, TrendChart, WindGaugeGeometry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingView {
    pub channel: String,
    pub label: String,
    pub text: String,
    pub unit: String,
    /// False when no entity is mapped to the channel
    pub enabled: bool,
    /// True when tapping the reading opens a trend view
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleGauges {
    pub outdoor_temp: GaugeGeometry,
    pub indoor_temp: GaugeGeometry,
    pub indoor_humidity: GaugeGeometry,
    pub wind: WindGaugeGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Stormy,
}

impl WeatherIcon {
    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "☀️",
            WeatherIcon::PartlyCloudy => "⛅",
            WeatherIcon::Cloudy => "☁️",
            WeatherIcon::Stormy => "⛈️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl Serialize for WeatherIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = match self {
            WeatherIcon::Sunny => "sunny",
            WeatherIcon::PartlyCloudy => "partly_cloudy",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::Stormy => "stormy",
        };
        let mut icon = serializer.serialize_struct("WeatherIcon", 2)?;
        icon.serialize_field("kind", kind)?;
        icon.serialize_field("emoji", self.emoji())?;
        icon.end()
    }
}

impl MoonPhase {
    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::FullMoon => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }
}

// Rendered as the display name plus glyph, e.g. {"name": "Full Moon", "emoji": "🌕"}
impl Serialize for MoonPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut phase = serializer.serialize_struct("MoonPhase", 2)?;
        phase.serialize_field("name", self.name())?;
        phase.serialize_field("emoji", self.emoji())?;
        phase.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LightningSummary {
    NoneDetected,
    Recent {
        distance: String,
        count: String,
        /// Minutes since the last strike, when the station reports it
        minutes_ago: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicators {
    pub pressure_arrow: &'static str,
    pub weather_icon: WeatherIcon,
    pub rain_drops: [bool; 4],
    pub moon: MoonPhase,
    pub lightning: LightningSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub channel: String,
    pub closes_at: DateTime<Utc>,
    pub chart: Plot<TrendChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleSnapshot {
    pub generated_at: DateTime<Utc>,
    pub readings: Vec<ReadingView>,
    pub gauges: ConsoleGauges,
    pub indicators: Indicators,
    pub sparklines: BTreeMap<String, Plot<CompactSeries>>,
    pub trend: Option<TrendView>,
}

#[cfg(test)]
impl ConsoleSnapshot {
    pub fn reading(&self, channel: &str) -> Option<&ReadingView> {
        self.readings.iter().find(|r| r.channel == channel)
    }
}
