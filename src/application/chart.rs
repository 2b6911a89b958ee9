// Chart geometry - Sparkline and trend chart over the fixed 12 hour window
use crate::application::projector::{Mapping, in_window, project};
use crate::domain::geometry::{
    CompactSeries, GridLine, Label, Plot, Point, Rect, TimeTick, TrendChart,
};
use crate::domain::sample::Sample;
use chrono::{DateTime, TimeDelta, Utc};

pub const WINDOW_HOURS: i64 = 12;

pub const SPARKLINE_AREA: Rect = Rect::new(0.0, 0.0, 120.0, 32.0);
pub const TREND_VIEWBOX: Rect = Rect::new(0.0, 0.0, 600.0, 280.0);
/// Plot rectangle inside the viewbox, leaving room for axis labels
pub const TREND_PLOT: Rect = Rect::new(44.0, 12.0, 540.0, 240.0);

const GRID_LINES: usize = 5;
const SPARKLINE_PLACEHOLDER: &str = "Collecting data";
const TREND_PLACEHOLDER: &str = "Not enough history yet. The trend appears once readings accumulate.";

pub fn window() -> TimeDelta {
    TimeDelta::hours(WINDOW_HOURS)
}

/// Axis and value labels: whole numbers from 10 upwards, one decimal below
pub fn format_axis_value(value: f64) -> String {
    if value.abs() >= 10.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn plot_points(samples: &[Sample], mapping: &Mapping, area: &Rect) -> Vec<Point> {
    samples
        .iter()
        .map(|s| area.clamp(area.place(mapping.to_x(s.timestamp), mapping.to_y(s.value))))
        .collect()
}

pub fn sparkline(buffer: &[Sample], now: DateTime<Utc>) -> Plot<CompactSeries> {
    let samples = in_window(buffer, now, window());
    let (Some(mapping), Some(latest)) = (project(samples, now, window()), samples.last()) else {
        return Plot::placeholder(SPARKLINE_PLACEHOLDER);
    };

    Plot::Ready(CompactSeries {
        area: SPARKLINE_AREA,
        points: plot_points(samples, &mapping, &SPARKLINE_AREA),
        range: mapping.range(),
        latest: *latest,
    })
}

pub fn trend_chart(buffer: &[Sample], now: DateTime<Utc>, label: &str, unit: &str) -> Plot<TrendChart> {
    let samples = in_window(buffer, now, window());
    let (Some(mapping), Some(latest)) = (project(samples, now, window()), samples.last()) else {
        return Plot::placeholder(TREND_PLACEHOLDER);
    };

    let plot = TREND_PLOT;
    let polyline = plot_points(samples, &mapping, &plot);

    let mut area = polyline.clone();
    if let (Some(first), Some(last)) = (polyline.first(), polyline.last()) {
        area.push(Point::new(last.x, plot.bottom()));
        area.push(Point::new(first.x, plot.bottom()));
    }

    let range = mapping.range();
    let grid = (0..GRID_LINES)
        .map(|i| {
            let value = range.max - range.span() * i as f64 / (GRID_LINES - 1) as f64;
            let y = plot.y + mapping.to_y(value) * plot.height;
            GridLine {
                y,
                value,
                label: Label::new(Point::new(plot.x - 6.0, y + 4.0), format_axis_value(value)),
            }
        })
        .collect();

    let ticks = (0..=WINDOW_HOURS)
        .map(|hour| {
            let x = plot.x + mapping.to_x(mapping.window_start() + TimeDelta::hours(hour)) * plot.width;
            let text = match hour {
                0 => Some(format!("-{}h", WINDOW_HOURS)),
                WINDOW_HOURS => Some("now".to_string()),
                h if h % 2 == 0 => Some(format!("-{}h", WINDOW_HOURS - h)),
                _ => None,
            };
            TimeTick {
                x,
                label: text.map(|t| Label::new(Point::new(x, plot.bottom() + 16.0), t)),
            }
        })
        .collect();

    Plot::Ready(TrendChart {
        title: label.to_string(),
        unit: unit.to_string(),
        viewbox: TREND_VIEWBOX,
        plot,
        polyline,
        area,
        grid,
        ticks,
        range,
        latest: *latest,
        latest_text: format_axis_value(latest.value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn hourly(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(at(i as i64 * 3600), *v))
            .collect()
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(72.4), "72");
        assert_eq!(format_axis_value(-12.6), "-13");
        assert_eq!(format_axis_value(9.94), "9.9");
        assert_eq!(format_axis_value(0.05), "0.1");
    }

    #[test]
    fn test_placeholder_with_too_few_samples() {
        let buffer = hourly(&[70.0]);
        assert!(matches!(sparkline(&buffer, at(3600)), Plot::Placeholder { .. }));
        assert!(matches!(
            trend_chart(&buffer, at(3600), "Outdoor", "°F"),
            Plot::Placeholder { .. }
        ));
    }

    #[test]
    fn test_samples_outside_window_do_not_count() {
        // Only the last sample is within 12 hours of `now`
        let buffer = vec![Sample::new(at(0), 1.0), Sample::new(at(20 * 3600), 2.0)];
        assert!(sparkline(&buffer, at(20 * 3600)).ready().is_none());
    }

    #[test]
    fn test_sparkline_points_span_area() {
        let buffer = hourly(&[10.0, 20.0]);
        let now = at(12 * 3600);
        let series = sparkline(&buffer, now);
        let series = series.ready().unwrap();

        assert_eq!(series.points.len(), 2);
        // Oldest sample sits at the left edge, highest value at the top
        assert_eq!(series.points[0], Point::new(0.0, 32.0));
        assert_eq!(series.points[1].y, 0.0);
        assert_eq!(series.latest.value, 20.0);
    }

    #[test]
    fn test_trend_chart_axes() {
        let buffer = hourly(&[60.0, 62.0, 61.0, 70.0]);
        let now = at(12 * 3600);
        let chart = trend_chart(&buffer, now, "Outdoor", "°F");
        let chart = chart.ready().unwrap();

        assert_eq!(chart.grid.len(), 5);
        assert_eq!(chart.grid[0].value, 70.0);
        assert_eq!(chart.grid[4].value, 60.0);
        assert_eq!(chart.grid[0].y, TREND_PLOT.y);
        assert_eq!(chart.grid[4].y, TREND_PLOT.bottom());

        assert_eq!(chart.ticks.len(), 13);
        let labels: Vec<Option<&str>> = chart
            .ticks
            .iter()
            .map(|t| t.label.as_ref().map(|l| l.text.as_str()))
            .collect();
        assert_eq!(labels[0], Some("-12h"));
        assert_eq!(labels[1], None);
        assert_eq!(labels[2], Some("-10h"));
        assert_eq!(labels[12], Some("now"));
        assert_eq!(chart.ticks[0].x, TREND_PLOT.x);
        assert_eq!(chart.ticks[12].x, TREND_PLOT.right());
        assert_eq!(chart.latest_text, "70");
    }

    #[test]
    fn test_trend_area_closes_on_baseline() {
        let buffer = hourly(&[1.0, 3.0, 2.0]);
        let now = at(12 * 3600);
        let chart = trend_chart(&buffer, now, "Rain", "in");
        let chart = chart.ready().unwrap();

        assert_eq!(chart.area.len(), chart.polyline.len() + 2);
        let n = chart.area.len();
        assert_eq!(chart.area[n - 2].y, TREND_PLOT.bottom());
        assert_eq!(chart.area[n - 1].x, chart.polyline[0].x);
        for p in &chart.area {
            assert!(p.x >= TREND_PLOT.x && p.x <= TREND_PLOT.right());
            assert!(p.y >= TREND_PLOT.y && p.y <= TREND_PLOT.bottom());
        }
    }
}
