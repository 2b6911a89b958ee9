// Gauge geometry - Dial arcs, colour ramps and the wind needle for single readings
use crate::domain::channel::Category;
use crate::domain::geometry::{
    ArcGeometry, ColorRamp, DialSpec, GaugeGeometry, Label, Needle, Point, Tick,
    WindGaugeGeometry,
};
use crate::domain::reading::{DisplayValue, Reading};

/// Large outdoor temperature dial
pub const PRIMARY_DIAL: DialSpec = DialSpec {
    start_deg: 148.0,
    sweep_deg: 244.0,
    size: 140.0,
    radius: 55.0,
    stroke: 12.0,
};

pub const WIND_DIAL_SIZE: f64 = 140.0;
pub const WIND_DIAL_RADIUS: f64 = 52.0;

/// Neutral colours for values that cannot be placed on a ramp
pub const UNKNOWN_RAMP: ColorRamp = ColorRamp::new("#555", "#333", "#888");

// Upper bounds are inclusive
const TEMPERATURE_BANDS: [(f64, ColorRamp); 6] = [
    (32.0, ColorRamp::new("#4fc3f7", "#0288d1", "#4fc3f7")),
    (50.0, ColorRamp::new("#4dd0e1", "#006064", "#4dd0e1")),
    (65.0, ColorRamp::new("#81c784", "#388e3c", "#81c784")),
    (75.0, ColorRamp::new("#fff176", "#f9a825", "#ffe57f")),
    (85.0, ColorRamp::new("#ffb74d", "#e65100", "#ffa726")),
    (95.0, ColorRamp::new("#ef9a9a", "#c62828", "#ef5350")),
];
const TEMPERATURE_HOT: ColorRamp = ColorRamp::new("#ce93d8", "#6a1b9a", "#ba68c8");

// Upper bounds are exclusive
const HUMIDITY_BANDS: [(f64, ColorRamp); 3] = [
    (25.0, ColorRamp::new("#81d4fa", "#0277bd", "#29b6f6")),
    (45.0, ColorRamp::new("#a5d6a7", "#2e7d32", "#66bb6a")),
    (65.0, ColorRamp::new("#b39ddb", "#4527a0", "#9575cd")),
];
const HUMIDITY_SATURATED: ColorRamp = ColorRamp::new("#7c4dff", "#311b92", "#7c4dff");

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    High(String),
    Low(String),
}

/// Smaller dial used for indoor temperature and humidity
pub fn compact_dial(size: f64) -> DialSpec {
    DialSpec {
        start_deg: 135.0,
        sweep_deg: 270.0,
        size,
        radius: size * 0.36,
        stroke: size * 0.11,
    }
}

/// Position of `value` inside the category domain, clamped to `0..=1`
pub fn sweep_fraction(category: Category, value: Option<f64>) -> f64 {
    match (category.gauge_domain(), value.filter(|v| v.is_finite())) {
        (Some((lo, hi)), Some(value)) => ((value - lo) / (hi - lo)).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

pub fn color_ramp(category: Category, value: Option<f64>) -> ColorRamp {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return UNKNOWN_RAMP;
    };
    let Some((lo, hi)) = category.gauge_domain() else {
        return UNKNOWN_RAMP;
    };
    if value < lo || value > hi {
        return UNKNOWN_RAMP;
    }

    match category {
        Category::Temperature => TEMPERATURE_BANDS
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map(|(_, ramp)| *ramp)
            .unwrap_or(TEMPERATURE_HOT),
        Category::Humidity => HUMIDITY_BANDS
            .iter()
            .find(|(upper, _)| value < *upper)
            .map(|(_, ramp)| *ramp)
            .unwrap_or(HUMIDITY_SATURATED),
        _ => UNKNOWN_RAMP,
    }
}

pub fn gauge(
    category: Category,
    value: &DisplayValue,
    markers: &[Marker],
    dial: &DialSpec,
) -> GaugeGeometry {
    let center = Point::new(dial.size / 2.0, dial.size / 2.0);
    let fraction = sweep_fraction(category, value.value);
    let full_end = dial.start_deg + dial.sweep_deg;

    // Stop one degree short so the rounded stroke caps never meet
    let fill = value.value.map(|_| {
        let end = (dial.start_deg + fraction * dial.sweep_deg).min(full_end - 1.0);
        ArcGeometry::new(center, dial.radius, dial.start_deg, end)
    });

    let value_text = match (category, value.value) {
        (Category::Humidity, Some(_)) => format!("{}%", value.text),
        _ => value.text.clone(),
    };
    let degree = if category == Category::Temperature { "°" } else { "" };
    let scale = dial.size / PRIMARY_DIAL.size;

    let markers = markers
        .iter()
        .map(|marker| match marker {
            Marker::High(text) => Label::new(
                Point::new(center.x - 26.0 * scale, center.y - 18.0 * scale),
                format!("↑ {}{}", text, degree),
            ),
            Marker::Low(text) => Label::new(
                Point::new(center.x - 26.0 * scale, center.y + 26.0 * scale),
                format!("↓ {}{}", text, degree),
            ),
        })
        .collect();

    GaugeGeometry {
        category,
        dial: *dial,
        center,
        fraction,
        track: ArcGeometry::new(center, dial.radius, dial.start_deg, full_end),
        fill,
        colors: color_ramp(category, value.value),
        value_label: Label::new(Point::new(center.x, center.y + dial.size * 0.07), value_text),
        markers,
    }
}

/// 16-point compass name for a bearing, rounding to the nearest 22.5° bucket
pub fn compass_label(degrees: f64) -> &'static str {
    let bucket = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[bucket]
}

/// Prefer the station's own direction text; fall back to the compass bucket
pub fn direction_label(raw: &Reading, degrees: Option<f64>, fallback: &str) -> String {
    match raw {
        Reading::Label(label) if label != fallback => label.clone(),
        _ => degrees
            .filter(|d| d.is_finite())
            .map(|d| compass_label(d).to_string())
            .unwrap_or_else(|| fallback.to_string()),
    }
}

pub fn wind_gauge(
    speed: &DisplayValue,
    gust: &DisplayValue,
    direction_deg: Option<f64>,
    direction_label: &str,
) -> WindGaugeGeometry {
    let c = WIND_DIAL_SIZE / 2.0;
    let r = WIND_DIAL_RADIUS;
    let center = Point::new(c, c);

    let ticks = (0..8)
        .map(|i| {
            let angle = i as f64 * 45.0;
            let major = i % 2 == 0;
            let outer = r + 1.0;
            let inner = outer - if major { 8.0 } else { 5.0 };
            Tick {
                outer: Point::polar(center, outer, angle),
                inner: Point::polar(center, inner, angle),
                major,
            }
        })
        .collect();

    let cardinals = vec![
        Label::new(Point::new(c, c - r + 13.0), "N"),
        Label::new(Point::new(c, c + r - 3.0), "S"),
        Label::new(Point::new(c + r - 3.0, c + 4.0), "E"),
        Label::new(Point::new(c - r + 3.0, c + 4.0), "W"),
    ];

    let needle = direction_deg.filter(|d| d.is_finite()).map(|deg| {
        let head_len = r * 0.72;
        let base = Point::polar(center, head_len - 10.0, deg);
        let head = Point::polar(center, head_len, deg);
        Needle {
            head,
            tail: Point::polar(center, r * 0.28, deg + 180.0),
            arrowhead: [
                head,
                Point::polar(base, 5.0, deg + 90.0),
                Point::polar(base, 5.0, deg - 90.0),
            ],
        }
    });

    WindGaugeGeometry {
        center,
        radius: r,
        ticks,
        cardinals,
        needle,
        direction_label: Label::new(Point::new(c - 22.0, c - 22.0), direction_label),
        speed_label: Label::new(Point::new(c, c + 18.0), speed.text.clone()),
        gust_label: Label::new(Point::new(c, c + 30.0), format!("Gust {}", gust.text)),
        unit_label: Label::new(Point::new(c, c + 41.0), speed.unit.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(value: f64, text: &str) -> DisplayValue {
        DisplayValue::new(Some(value), text.to_string(), "°F".to_string())
    }

    #[test]
    fn test_temperature_clamps_to_full_sweep() {
        assert_eq!(sweep_fraction(Category::Temperature, Some(150.0)), 1.0);
        assert_eq!(sweep_fraction(Category::Temperature, Some(-20.0)), 0.0);
        assert_eq!(sweep_fraction(Category::Temperature, Some(60.0)), 0.5);
        assert_eq!(sweep_fraction(Category::Humidity, Some(25.0)), 0.25);
    }

    #[test]
    fn test_fill_stops_short_of_track() {
        let geometry = gauge(
            Category::Temperature,
            &numeric(150.0, "150.0"),
            &[],
            &PRIMARY_DIAL,
        );
        assert_eq!(geometry.fraction, 1.0);
        assert_eq!(geometry.track.end_deg, 392.0);
        assert_eq!(geometry.fill.unwrap().end_deg, 391.0);
    }

    #[test]
    fn test_fill_omitted_for_missing_value() {
        let geometry = gauge(
            Category::Humidity,
            &DisplayValue::fallback("--", "%"),
            &[],
            &compact_dial(95.0),
        );
        assert!(geometry.fill.is_none());
        assert_eq!(geometry.colors, UNKNOWN_RAMP);
        assert_eq!(geometry.value_label.text, "--");
    }

    #[test]
    fn test_compact_dial_sweep() {
        let dial = compact_dial(90.0);
        let geometry = gauge(Category::Humidity, &numeric(50.0, "50"), &[], &dial);
        let fill = geometry.fill.unwrap();
        assert_eq!(fill.start_deg, 135.0);
        assert_eq!(fill.end_deg, 270.0);
        assert_eq!(geometry.value_label.text, "50%");
    }

    #[test]
    fn test_temperature_bands() {
        let t = |v| color_ramp(Category::Temperature, Some(v)).low;
        assert_eq!(t(32.0), "#4fc3f7");
        assert_eq!(t(32.1), "#4dd0e1");
        assert_eq!(t(72.4), "#fff176");
        assert_eq!(t(95.0), "#ef9a9a");
        assert_eq!(t(100.0), "#ce93d8");
    }

    #[test]
    fn test_humidity_bands_are_exclusive() {
        let h = |v| color_ramp(Category::Humidity, Some(v)).low;
        assert_eq!(h(24.9), "#81d4fa");
        assert_eq!(h(25.0), "#a5d6a7");
        assert_eq!(h(65.0), "#7c4dff");
    }

    #[test]
    fn test_out_of_domain_is_unknown() {
        assert_eq!(color_ramp(Category::Temperature, Some(150.0)), UNKNOWN_RAMP);
        assert_eq!(color_ramp(Category::Humidity, Some(-1.0)), UNKNOWN_RAMP);
        assert_eq!(color_ramp(Category::Temperature, None), UNKNOWN_RAMP);
        assert_eq!(color_ramp(Category::WindSpeed, Some(10.0)), UNKNOWN_RAMP);
    }

    #[test]
    fn test_markers() {
        let geometry = gauge(
            Category::Temperature,
            &numeric(70.0, "70.0"),
            &[Marker::High("80.1".into()), Marker::Low("55.2".into())],
            &PRIMARY_DIAL,
        );
        assert_eq!(geometry.markers[0].text, "↑ 80.1°");
        assert_eq!(geometry.markers[0].anchor, Point::new(44.0, 52.0));
        assert_eq!(geometry.markers[1].text, "↓ 55.2°");
    }

    #[test]
    fn test_compass_buckets() {
        assert_eq!(compass_label(0.0), "N");
        assert_eq!(compass_label(22.5), "NNE");
        assert_eq!(compass_label(90.0), "E");
        assert_eq!(compass_label(359.0), "N");
        assert_eq!(compass_label(-90.0), "W");
    }

    #[test]
    fn test_direction_label_prefers_raw_text() {
        let raw = Reading::Label("SW".into());
        assert_eq!(direction_label(&raw, Some(0.0), "--"), "SW");
        assert_eq!(direction_label(&Reading::Numeric(225.0), Some(90.0), "--"), "E");
        assert_eq!(direction_label(&Reading::Absent, None, "--"), "--");
    }

    #[test]
    fn test_wind_needle_omitted_without_direction() {
        let speed = DisplayValue::new(Some(5.0), "5.0".into(), "mph".into());
        let gust = DisplayValue::fallback("--", "mph");
        let geometry = wind_gauge(&speed, &gust, None, "--");
        assert!(geometry.needle.is_none());
        assert_eq!(geometry.ticks.len(), 8);
        assert_eq!(geometry.gust_label.text, "Gust --");
    }

    #[test]
    fn test_wind_needle_points_east() {
        let speed = DisplayValue::new(Some(5.0), "5.0".into(), "mph".into());
        let geometry = wind_gauge(&speed, &speed, Some(90.0), "E");
        let needle = geometry.needle.unwrap();
        assert!((needle.head.x - (70.0 + 52.0 * 0.72)).abs() < 1e-9);
        assert!((needle.head.y - 70.0).abs() < 1e-9);
        assert!(needle.tail.x < 70.0);
    }
}
