// Small derived indicators shown around the gauges
use crate::domain::console::{LightningSummary, MoonPhase, WeatherIcon};
use crate::domain::reading::{DisplayValue, Reading};
use chrono::{DateTime, TimeZone, Utc};

const LUNAR_CYCLE_DAYS: f64 = 29.53;
const RAIN_DROP_STEP: f64 = 0.25;

/// Arrow for the pressure trend text; `None` means no trend channel is mapped
pub fn pressure_arrow(trend: Option<&Reading>) -> &'static str {
    let Some(reading) = trend else {
        return "↘";
    };

    let text = match reading {
        Reading::Label(label) => label.to_lowercase(),
        _ => String::new(),
    };

    if text.contains("rising") || text == "up" {
        "↗"
    } else if text.contains("falling") || text == "down" {
        "↘"
    } else {
        "→"
    }
}

/// Rough outlook from absolute pressure in inHg
pub fn weather_icon(pressure: Option<f64>) -> WeatherIcon {
    match pressure {
        Some(p) if p > 30.2 => WeatherIcon::Sunny,
        Some(p) if p > 29.8 => WeatherIcon::PartlyCloudy,
        Some(p) if p > 29.2 => WeatherIcon::Cloudy,
        _ => WeatherIcon::Stormy,
    }
}

pub fn rain_drops(daily: Option<f64>) -> [bool; 4] {
    let mut drops = [false; 4];
    if let Some(daily) = daily {
        for (i, drop) in drops.iter_mut().enumerate() {
            *drop = daily > i as f64 * RAIN_DROP_STEP;
        }
    }
    drops
}

pub fn moon_phase(now: DateTime<Utc>) -> MoonPhase {
    // 2000-01-06 was a new moon
    let reference = Utc.with_ymd_and_hms(2000, 1, 6, 0, 0, 0).single();
    let Some(reference) = reference else {
        return MoonPhase::NewMoon;
    };

    let days = (now - reference).num_milliseconds() as f64 / 86_400_000.0;
    let phase = days.rem_euclid(LUNAR_CYCLE_DAYS);

    match phase {
        p if p < 1.85 => MoonPhase::NewMoon,
        p if p < 7.38 => MoonPhase::WaxingCrescent,
        p if p < 9.22 => MoonPhase::FirstQuarter,
        p if p < 14.76 => MoonPhase::WaxingGibbous,
        p if p < 16.61 => MoonPhase::FullMoon,
        p if p < 22.15 => MoonPhase::WaningGibbous,
        p if p < 23.99 => MoonPhase::LastQuarter,
        _ => MoonPhase::WaningCrescent,
    }
}

pub fn lightning(
    distance: &DisplayValue,
    count: &DisplayValue,
    minutes_ago: &DisplayValue,
    fallback: &str,
) -> LightningSummary {
    if distance.is_fallback(fallback) {
        return LightningSummary::NoneDetected;
    }

    LightningSummary::Recent {
        distance: distance.text.clone(),
        count: count.text.clone(),
        minutes_ago: (!minutes_ago.is_fallback(fallback)).then(|| minutes_ago.text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_pressure_arrow() {
        assert_eq!(pressure_arrow(Some(&Reading::Label("Rising".into()))), "↗");
        assert_eq!(pressure_arrow(Some(&Reading::Label("up".into()))), "↗");
        assert_eq!(pressure_arrow(Some(&Reading::Label("falling slowly".into()))), "↘");
        assert_eq!(pressure_arrow(Some(&Reading::Label("steady".into()))), "→");
        assert_eq!(pressure_arrow(Some(&Reading::Absent)), "→");
        assert_eq!(pressure_arrow(None), "↘");
    }

    #[test]
    fn test_weather_icon() {
        assert_eq!(weather_icon(Some(30.25)), WeatherIcon::Sunny);
        assert_eq!(weather_icon(Some(30.0)), WeatherIcon::PartlyCloudy);
        assert_eq!(weather_icon(Some(29.5)), WeatherIcon::Cloudy);
        assert_eq!(weather_icon(Some(29.0)), WeatherIcon::Stormy);
        assert_eq!(weather_icon(None), WeatherIcon::Stormy);
    }

    #[test]
    fn test_rain_drops() {
        assert_eq!(rain_drops(None), [false; 4]);
        assert_eq!(rain_drops(Some(0.0)), [false; 4]);
        assert_eq!(rain_drops(Some(0.3)), [true, true, false, false]);
        assert_eq!(rain_drops(Some(1.0)), [true; 4]);
    }

    #[test]
    fn test_moon_phase() {
        let new_moon = Utc.with_ymd_and_hms(2000, 1, 6, 12, 0, 0).unwrap();
        assert_eq!(moon_phase(new_moon), MoonPhase::NewMoon);
        assert_eq!(moon_phase(new_moon + TimeDelta::days(15)), MoonPhase::FullMoon);
        assert_eq!(moon_phase(new_moon - TimeDelta::days(3)), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_lightning_summary() {
        let none = DisplayValue::fallback("--", "km");
        assert_eq!(lightning(&none, &none, &none, "--"), LightningSummary::NoneDetected);

        let distance = DisplayValue::new(Some(12.0), "12".into(), "km".into());
        let count = DisplayValue::new(Some(3.0), "3".into(), "".into());
        assert_eq!(
            lightning(&distance, &count, &none, "--"),
            LightningSummary::Recent {
                distance: "12".into(),
                count: "3".into(),
                minutes_ago: None,
            }
        );
    }
}
