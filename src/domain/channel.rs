// Channel domain model and the weather-station channel catalog
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Temperature,
    Humidity,
    WindSpeed,
    Pressure,
    Rain,
    Radiation,
    Generic,
}

impl Category {
    /// Value domain a gauge clamps into, if the category has one
    pub fn gauge_domain(&self) -> Option<(f64, f64)> {
        match self {
            Category::Temperature => Some((0.0, 120.0)),
            Category::Humidity => Some((0.0, 100.0)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub id: String,
    pub label: String,
    pub unit: String,
    pub category: Category,
    /// Decimal places used when the reading is numeric
    pub decimals: usize,
    /// Whether the channel keeps history and can open a trend view
    pub trend: bool,
}

impl Channel {
    pub fn new(
        id: &str,
        label: &str,
        unit: &str,
        category: Category,
        decimals: usize,
        trend: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            unit: unit.to_string(),
            category,
            decimals,
            trend,
        }
    }
}

// (id, label, default unit, category, decimals, trend)
const WEATHER_STATION: &[(&str, &str, &str, Category, usize, bool)] = &[
    ("outdoor_temp", "Outdoor", "°F", Category::Temperature, 1, true),
    ("outdoor_temp_high", "High", "°F", Category::Temperature, 1, false),
    ("outdoor_temp_low", "Low", "°F", Category::Temperature, 1, false),
    ("outdoor_humidity", "Humidity", "%", Category::Humidity, 0, true),
    ("feels_like", "Feels Like", "°F", Category::Temperature, 1, true),
    ("dew_point", "Dew Point", "°F", Category::Temperature, 1, true),
    ("wind_speed", "Wind", "mph", Category::WindSpeed, 1, true),
    ("wind_gust", "Gust", "mph", Category::WindSpeed, 1, true),
    ("wind_direction", "Direction", "", Category::Generic, 0, false),
    ("wind_direction_degrees", "Direction", "°", Category::Generic, 0, false),
    ("wind_avg_10min", "10 Min Avg", "mph", Category::WindSpeed, 1, true),
    ("wind_max_daily", "Max Daily Gust", "mph", Category::WindSpeed, 1, false),
    ("indoor_temp", "Indoor", "°F", Category::Temperature, 1, true),
    ("indoor_humidity", "Indoor Humidity", "%", Category::Humidity, 0, true),
    ("pressure_abs", "Absolute", "inHg", Category::Pressure, 2, true),
    ("pressure_rel", "Relative", "inHg", Category::Pressure, 2, true),
    ("pressure_trend", "Trend", "", Category::Generic, 0, false),
    ("pressure_change", "Change", "inHg", Category::Pressure, 2, false),
    ("rain_rate", "Rate", "in/hr", Category::Rain, 2, true),
    ("rain_event", "Event", "in", Category::Rain, 2, false),
    ("rain_hourly", "Hourly", "in", Category::Rain, 2, false),
    ("rain_daily", "Daily", "in", Category::Rain, 2, true),
    ("rain_weekly", "Weekly", "in", Category::Rain, 2, false),
    ("rain_monthly", "Monthly", "in", Category::Rain, 2, false),
    ("rain_yearly", "Yearly", "in", Category::Rain, 2, false),
    ("uv_index", "UV Index", "", Category::Radiation, 0, true),
    ("solar_radiation", "Solar", "W/m²", Category::Radiation, 3, true),
    ("pm25_outdoor", "PM2.5 Outdoor", "µg/m³", Category::Generic, 0, true),
    ("pm25_indoor", "PM2.5 Indoor", "µg/m³", Category::Generic, 0, true),
    ("soil_moisture", "Soil Moisture", "%", Category::Humidity, 0, false),
    ("lightning_distance", "Distance", "km", Category::Generic, 0, false),
    ("lightning_count", "Count", "", Category::Generic, 0, false),
    ("lightning_time", "Last Strike", "min", Category::Generic, 0, false),
];

/// Channels a WS-5000 style console knows how to lay out
pub fn weather_station_catalog() -> Vec<Channel> {
    WEATHER_STATION
        .iter()
        .map(|(id, label, unit, category, decimals, trend)| {
            Channel::new(id, label, unit, *category, *decimals, *trend)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = weather_station_catalog();
        let ids: HashSet<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_catalog_display_decimals() {
        let catalog = weather_station_catalog();
        let decimals = |id: &str| catalog.iter().find(|c| c.id == id).map(|c| c.decimals);
        assert_eq!(decimals("solar_radiation"), Some(3));
        assert_eq!(decimals("pressure_rel"), Some(2));
        assert_eq!(decimals("outdoor_temp"), Some(1));
        assert_eq!(decimals("uv_index"), Some(0));
    }

    #[test]
    fn test_gauge_domains() {
        assert_eq!(Category::Temperature.gauge_domain(), Some((0.0, 120.0)));
        assert_eq!(Category::Humidity.gauge_domain(), Some((0.0, 100.0)));
        assert_eq!(Category::WindSpeed.gauge_domain(), None);
    }
}
