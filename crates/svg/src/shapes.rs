//! Path data of the SVG basic shapes.
//!
//! Each shape produces raw path data the way the SVG specification describes its
//! equivalent path, with arcs for round corners and ellipses.

use crate::math::{point, vector, Point, Vector};
use crate::path::parser::parse_numbers;
use crate::path::{ArcFlags, PathData, Segment};

/// The geometry of a leaf of the shape tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Geometry {
    Path(PathData),
    Rect(Rect),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
}

impl Geometry {
    /// A path element, parsing the content of its `d` attribute.
    pub fn path(d: &str) -> Self {
        Geometry::Path(PathData::parse(d))
    }

    /// The raw path data describing this geometry.
    pub fn path_data(&self) -> PathData {
        match self {
            Geometry::Path(path) => path.clone(),
            Geometry::Rect(rect) => rect.path_data(),
            Geometry::Circle(circle) => circle.path_data(),
            Geometry::Ellipse(ellipse) => ellipse.path_data(),
            Geometry::Line(line) => line.path_data(),
            Geometry::Polyline(polyline) => polyline.path_data(),
            Geometry::Polygon(polygon) => polygon.path_data(),
        }
    }

    /// The name of the corresponding SVG element.
    pub fn element_name(&self) -> &'static str {
        match self {
            Geometry::Path(..) => "path",
            Geometry::Rect(..) => "rect",
            Geometry::Circle(..) => "circle",
            Geometry::Ellipse(..) => "ellipse",
            Geometry::Line(..) => "line",
            Geometry::Polyline(..) => "polyline",
            Geometry::Polygon(..) => "polygon",
        }
    }
}

macro_rules! impl_into_geometry {
    ($($shape:ident),*) => {
        $(
            impl From<$shape> for Geometry {
                fn from(shape: $shape) -> Geometry {
                    Geometry::$shape(shape)
                }
            }
        )*
    };
}

impl_into_geometry!(Rect, Circle, Ellipse, Line, Polyline, Polygon);

impl From<PathData> for Geometry {
    fn from(path: PathData) -> Geometry {
        Geometry::Path(path)
    }
}

fn move_to(x: f64, y: f64) -> Segment {
    Segment::MoveTo {
        abs: true,
        to: point(x, y),
    }
}

fn line_to(x: f64, y: f64) -> Segment {
    Segment::LineTo {
        abs: true,
        to: point(x, y),
    }
}

// A clockwise arc without rotation, as used by all the rounded shapes.
fn arc_to(radii: Vector, x: f64, y: f64) -> Segment {
    Segment::ArcTo {
        abs: true,
        radii,
        x_rotation: 0.0,
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
        to: point(x, y),
    }
}

/// A rectangle, with optionally rounded corners.
///
/// When only one of the corner radii is set the other one takes the same value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
            rx: None,
            ry: None,
        }
    }

    pub fn with_radii(mut self, rx: Option<f64>, ry: Option<f64>) -> Self {
        self.rx = rx;
        self.ry = ry;
        self
    }

    /// The corner radii actually used, after fallback and clamping to half the size
    /// of the rectangle.
    pub fn corner_radii(&self) -> Vector {
        let rx = self.rx.or(self.ry).unwrap_or(0.0);
        let ry = self.ry.or(self.rx).unwrap_or(0.0);

        vector(rx.min(self.width / 2.0), ry.min(self.height / 2.0))
    }

    /// Clockwise from the end of the top left corner. Corners without radius have no
    /// arc segment.
    pub fn path_data(&self) -> PathData {
        let Rect {
            x,
            y,
            width: w,
            height: h,
            ..
        } = *self;
        let radii = self.corner_radii();
        let (rx, ry) = (radii.x, radii.y);
        let rounded = rx != 0.0 && ry != 0.0;

        let segments = [
            move_to(x + rx, y),
            Segment::HorizTo {
                abs: true,
                x: x + w - rx,
            },
            arc_to(radii, x + w, y + ry),
            Segment::VertTo {
                abs: true,
                y: y + h - ry,
            },
            arc_to(radii, x + w - rx, y + h),
            Segment::HorizTo { abs: true, x: x + rx },
            arc_to(radii, x, y + h - ry),
            Segment::VertTo { abs: true, y: y + ry },
            arc_to(radii, x + rx, y),
            Segment::Close,
        ];

        segments
            .iter()
            .filter(|segment| rounded || !matches!(segment, Segment::ArcTo { .. }))
            .copied()
            .collect()
    }
}

/// A circle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Circle { cx, cy, r }
    }

    /// Four quarter arcs, clockwise from the rightmost point.
    pub fn path_data(&self) -> PathData {
        Ellipse::new(self.cx, self.cy, self.r, self.r).path_data()
    }
}

/// An axis-aligned ellipse.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Ellipse { cx, cy, rx, ry }
    }

    /// Four quarter arcs, clockwise from the rightmost point.
    pub fn path_data(&self) -> PathData {
        let Ellipse { cx, cy, rx, ry } = *self;
        let radii = vector(rx, ry);

        vec![
            move_to(cx + rx, cy),
            arc_to(radii, cx, cy + ry),
            arc_to(radii, cx - rx, cy),
            arc_to(radii, cx, cy - ry),
            arc_to(radii, cx + rx, cy),
            Segment::Close,
        ]
        .into()
    }
}

/// A line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Line { x1, y1, x2, y2 }
    }

    pub fn path_data(&self) -> PathData {
        vec![move_to(self.x1, self.y1), line_to(self.x2, self.y2)].into()
    }
}

/// An open sequence of connected line segments.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Polyline { points }
    }

    /// Reads the content of a `points` attribute, see [`parse_points`].
    pub fn parse(points: &str) -> Self {
        Polyline::new(parse_points(points))
    }

    pub fn path_data(&self) -> PathData {
        polyline_path_data(&self.points)
    }
}

/// A closed sequence of connected line segments.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Polygon { points }
    }

    /// Reads the content of a `points` attribute, see [`parse_points`].
    pub fn parse(points: &str) -> Self {
        Polygon::new(parse_points(points))
    }

    /// Same as the polyline followed by a close segment. No points give empty path data.
    pub fn path_data(&self) -> PathData {
        let mut path = polyline_path_data(&self.points);
        if !path.is_empty() {
            path.push(Segment::Close);
        }

        path
    }
}

fn polyline_path_data(points: &[Point]) -> PathData {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                move_to(p.x, p.y)
            } else {
                line_to(p.x, p.y)
            }
        })
        .collect()
}

/// Parses the `points` attribute of polylines and polygons.
///
/// Coordinates are separated by whitespace and/or commas. Parsing stops at the first
/// invalid number and a trailing odd coordinate is dropped.
pub fn parse_points(src: &str) -> Vec<Point> {
    parse_numbers(src)
        .chunks_exact(2)
        .map(|pair| point(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
fn commands(path: &PathData) -> String {
    path.iter().map(Segment::command).collect()
}

#[cfg(test)]
fn arc_count(path: &PathData) -> usize {
    path.iter()
        .filter(|segment| matches!(segment, Segment::ArcTo { .. }))
        .count()
}

#[test]
fn circle() {
    let path = Circle::new(0.0, 0.0, 5.0).path_data();
    assert_eq!(path.first(), Some(&move_to(5.0, 0.0)));
    assert_eq!(arc_count(&path), 4);
    assert_eq!(commands(&path), "MAAAAZ");
    assert_eq!(
        path.to_string(),
        "M 5 0 A 5 5 0 0 1 0 5 A 5 5 0 0 1 -5 0 A 5 5 0 0 1 0 -5 A 5 5 0 0 1 5 0 Z"
    );
}

#[test]
fn ellipse() {
    let path = Ellipse::new(10.0, 20.0, 4.0, 2.0).path_data();
    assert_eq!(
        path.to_string(),
        "M 14 20 A 4 2 0 0 1 10 22 A 4 2 0 0 1 6 20 A 4 2 0 0 1 10 18 A 4 2 0 0 1 14 20 Z"
    );
}

#[test]
fn plain_rect() {
    let path = Rect::new(1.0, 2.0, 10.0, 5.0).path_data();
    assert_eq!(path.to_string(), "M 1 2 H 11 V 7 H 1 V 2 Z");

    // A single null radius is enough to drop the arcs.
    let path = Rect::new(1.0, 2.0, 10.0, 5.0)
        .with_radii(Some(0.0), Some(3.0))
        .path_data();
    assert_eq!(commands(&path), "MHVHVZ");
}

#[test]
fn rounded_rect() {
    let path = Rect::new(0.0, 0.0, 10.0, 6.0)
        .with_radii(Some(2.0), None)
        .path_data();
    assert_eq!(commands(&path), "MHAVAHAVAZ");
    assert_eq!(
        path.to_string(),
        "M 2 0 H 8 A 2 2 0 0 1 10 2 V 4 A 2 2 0 0 1 8 6 H 2 A 2 2 0 0 1 0 4 V 2 A 2 2 0 0 1 2 0 Z"
    );
}

#[test]
fn rect_radii() {
    let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
    assert_eq!(rect.corner_radii(), vector(0.0, 0.0));
    assert_eq!(
        rect.with_radii(None, Some(1.5)).corner_radii(),
        vector(1.5, 1.5)
    );
    assert_eq!(
        rect.with_radii(Some(1.0), Some(0.5)).corner_radii(),
        vector(1.0, 0.5)
    );
    // Clamped to half the size.
    assert_eq!(
        rect.with_radii(Some(20.0), None).corner_radii(),
        vector(5.0, 2.0)
    );
}

#[test]
fn lines() {
    assert_eq!(
        Line::new(0.0, 1.0, 2.0, 3.0).path_data().to_string(),
        "M 0 1 L 2 3"
    );

    let polyline = Polyline::parse("0,0 10,0 10,10");
    assert_eq!(polyline.path_data().to_string(), "M 0 0 L 10 0 L 10 10");

    let polygon = Polygon::new(polyline.points.clone());
    assert_eq!(polygon.path_data().to_string(), "M 0 0 L 10 0 L 10 10 Z");

    assert!(Polygon::default().path_data().is_empty());
    assert!(Polyline::default().path_data().is_empty());
}

#[test]
fn points_attribute() {
    assert_eq!(
        parse_points("0,0 10,0 10 10 5"),
        vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)]
    );
    assert_eq!(parse_points("1-2-3e1,4 x 5 6"), vec![point(1.0, -2.0), point(-30.0, 4.0)]);
    assert!(parse_points("").is_empty());
}

#[test]
fn geometry() {
    let geometry = Geometry::path("M0 0 L 1 1 ???");
    assert_eq!(geometry.element_name(), "path");
    assert_eq!(geometry.path_data().len(), 2);

    let geometry: Geometry = Circle::new(0.0, 0.0, 1.0).into();
    assert_eq!(geometry.element_name(), "circle");
    assert_eq!(geometry.path_data(), Circle::new(0.0, 0.0, 1.0).path_data());
}
