// Geometry model - Plain viewbox-unit shapes for gauges and charts
use serde::Serialize;

use super::channel::Category;
use super::sample::{Sample, ValueRange};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on a circle; 0° is 12 o'clock and angles grow clockwise
    pub fn polar(center: Point, radius: f64, degrees: f64) -> Self {
        let radians = (degrees - 90.0).to_radians();
        Self::new(
            center.x + radius * radians.cos(),
            center.y + radius * radians.sin(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Map a normalized (0..1, 0..1) coordinate into this rectangle
    pub fn place(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x + fx * self.width, self.y + fy * self.height)
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.x, self.right()),
            point.y.clamp(self.y, self.bottom()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub anchor: Point,
    pub text: String,
}

impl Label {
    pub fn new(anchor: Point, text: impl Into<String>) -> Self {
        Self {
            anchor,
            text: text.into(),
        }
    }
}

/// Gradient endpoints plus the text colour for a value band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorRamp {
    pub low: &'static str,
    pub high: &'static str,
    pub text: &'static str,
}

impl ColorRamp {
    pub const fn new(low: &'static str, high: &'static str, text: &'static str) -> Self {
        Self { low, high, text }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcGeometry {
    pub center: Point,
    pub radius: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    pub start: Point,
    pub end: Point,
    /// Set when the arc spans more than half a circle
    pub large_arc: bool,
}

impl ArcGeometry {
    pub fn new(center: Point, radius: f64, start_deg: f64, end_deg: f64) -> Self {
        Self {
            center,
            radius,
            start_deg,
            end_deg,
            start: Point::polar(center, radius, start_deg),
            end: Point::polar(center, radius, end_deg),
            large_arc: end_deg - start_deg > 180.0,
        }
    }
}

/// Shape of a circular dial
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DialSpec {
    pub start_deg: f64,
    pub sweep_deg: f64,
    pub size: f64,
    pub radius: f64,
    pub stroke: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeGeometry {
    pub category: Category,
    pub dial: DialSpec,
    pub center: Point,
    /// Clamped position of the value inside the category domain, 0..=1
    pub fraction: f64,
    pub track: ArcGeometry,
    /// Absent when the value is not numeric
    pub fill: Option<ArcGeometry>,
    pub colors: ColorRamp,
    pub value_label: Label,
    pub markers: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Needle {
    pub head: Point,
    pub tail: Point,
    pub arrowhead: [Point; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub outer: Point,
    pub inner: Point,
    pub major: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindGaugeGeometry {
    pub center: Point,
    pub radius: f64,
    pub ticks: Vec<Tick>,
    pub cardinals: Vec<Label>,
    /// Omitted entirely when the direction is unknown
    pub needle: Option<Needle>,
    pub direction_label: Label,
    pub speed_label: Label,
    pub gust_label: Label,
    pub unit_label: Label,
}

/// Result of a chart computation: either geometry or a "no data yet" marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Plot<T> {
    Placeholder { message: String },
    Ready(T),
}

impl<T> Plot<T> {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Plot::Placeholder {
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Plot::Ready(geometry) => Some(geometry),
            Plot::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactSeries {
    pub area: Rect,
    pub points: Vec<Point>,
    pub range: ValueRange,
    pub latest: Sample,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLine {
    pub y: f64,
    pub value: f64,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeTick {
    pub x: f64,
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub title: String,
    pub unit: String,
    pub viewbox: Rect,
    pub plot: Rect,
    pub polyline: Vec<Point>,
    /// Closed polygon from the polyline down to the plot baseline
    pub area: Vec<Point>,
    pub grid: Vec<GridLine>,
    pub ticks: Vec<TimeTick>,
    pub range: ValueRange,
    pub latest: Sample,
    pub latest_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_polar_zero_is_north() {
        let center = Point::new(70.0, 70.0);
        assert!(close(Point::polar(center, 10.0, 0.0), Point::new(70.0, 60.0)));
        assert!(close(Point::polar(center, 10.0, 90.0), Point::new(80.0, 70.0)));
    }

    #[test]
    fn test_arc_large_flag() {
        let center = Point::new(0.0, 0.0);
        assert!(ArcGeometry::new(center, 5.0, 148.0, 392.0).large_arc);
        assert!(!ArcGeometry::new(center, 5.0, 148.0, 300.0).large_arc);
    }

    #[test]
    fn test_rect_clamp() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert_eq!(rect.clamp(Point::new(0.0, 80.0)), Point::new(10.0, 60.0));
        assert_eq!(rect.place(0.5, 1.0), Point::new(60.0, 60.0));
    }
}
