//! Conversion of path data to absolute and canonical forms.
//!
//! Both transformations are folds over the segments of the input, carrying the pen
//! position from one segment to the next in an explicit state value.

use crate::geom::{Angle, CubicBezierSegment, QuadraticBezierSegment, SvgArc};
use crate::math::Point;
use crate::split::{self, Subpaths};
use crate::{PathData, PathError, Segment};

use log::warn;
use std::convert::TryFrom;
use std::fmt;
use std::slice;

/// The pen position at some point along the path.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PenState {
    /// The endpoint of the previous segment.
    pub current: Point,
    /// Where the current subpath began, which the pen returns to when the subpath
    /// is closed.
    pub subpath_start: Point,
}

impl PenState {
    /// Resolves a possibly relative position against the current point.
    #[inline]
    pub fn resolve(&self, abs: bool, p: Point) -> Point {
        if abs {
            p
        } else {
            self.current + p.to_vector()
        }
    }

    #[inline]
    pub fn move_to(self, to: Point) -> Self {
        PenState {
            current: to,
            subpath_start: to,
        }
    }

    #[inline]
    pub fn draw_to(self, to: Point) -> Self {
        PenState {
            current: to,
            ..self
        }
    }

    #[inline]
    pub fn close(self) -> Self {
        PenState {
            current: self.subpath_start,
            ..self
        }
    }
}

/// Converts every relative segment into its absolute form.
///
/// The segment kinds are preserved, only the coordinates change. A relative move-to
/// at the beginning of the path is relative to the origin.
pub fn absolutize(path: &PathData) -> PathData {
    path.iter()
        .scan(PenState::default(), |pen, segment| {
            let (segment, next) = absolutize_segment(*pen, segment);
            *pen = next;
            Some(segment)
        })
        .collect()
}

fn absolutize_segment(pen: PenState, segment: &Segment) -> (Segment, PenState) {
    match *segment {
        Segment::MoveTo { abs, to } => {
            let to = pen.resolve(abs, to);
            (Segment::MoveTo { abs: true, to }, pen.move_to(to))
        }
        Segment::LineTo { abs, to } => {
            let to = pen.resolve(abs, to);
            (Segment::LineTo { abs: true, to }, pen.draw_to(to))
        }
        Segment::CubicTo {
            abs,
            ctrl1,
            ctrl2,
            to,
        } => {
            let to = pen.resolve(abs, to);
            let segment = Segment::CubicTo {
                abs: true,
                ctrl1: pen.resolve(abs, ctrl1),
                ctrl2: pen.resolve(abs, ctrl2),
                to,
            };
            (segment, pen.draw_to(to))
        }
        Segment::QuadTo { abs, ctrl, to } => {
            let to = pen.resolve(abs, to);
            let segment = Segment::QuadTo {
                abs: true,
                ctrl: pen.resolve(abs, ctrl),
                to,
            };
            (segment, pen.draw_to(to))
        }
        Segment::SmoothCubicTo { abs, ctrl2, to } => {
            let to = pen.resolve(abs, to);
            let segment = Segment::SmoothCubicTo {
                abs: true,
                ctrl2: pen.resolve(abs, ctrl2),
                to,
            };
            (segment, pen.draw_to(to))
        }
        Segment::SmoothQuadTo { abs, to } => {
            let to = pen.resolve(abs, to);
            (Segment::SmoothQuadTo { abs: true, to }, pen.draw_to(to))
        }
        Segment::ArcTo {
            abs,
            radii,
            x_rotation,
            flags,
            to,
        } => {
            let to = pen.resolve(abs, to);
            let segment = Segment::ArcTo {
                abs: true,
                radii,
                x_rotation,
                flags,
                to,
            };
            (segment, pen.draw_to(to))
        }
        Segment::HorizTo { abs, x } => {
            let x = if abs { x } else { pen.current.x + x };
            let to = Point::new(x, pen.current.y);
            (Segment::HorizTo { abs: true, x }, pen.draw_to(to))
        }
        Segment::VertTo { abs, y } => {
            let y = if abs { y } else { pen.current.y + y };
            let to = Point::new(pen.current.x, y);
            (Segment::VertTo { abs: true, y }, pen.draw_to(to))
        }
        Segment::Close => (Segment::Close, pen.close()),
    }
}

/// A segment of canonical path data.
///
/// All coordinates are absolute.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CanonicalSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Close,
}

impl CanonicalSegment {
    pub fn to_segment(&self) -> Segment {
        match *self {
            CanonicalSegment::MoveTo(to) => Segment::MoveTo { abs: true, to },
            CanonicalSegment::LineTo(to) => Segment::LineTo { abs: true, to },
            CanonicalSegment::CubicTo { ctrl1, ctrl2, to } => Segment::CubicTo {
                abs: true,
                ctrl1,
                ctrl2,
                to,
            },
            CanonicalSegment::Close => Segment::Close,
        }
    }
}

impl From<CanonicalSegment> for Segment {
    fn from(segment: CanonicalSegment) -> Segment {
        segment.to_segment()
    }
}

// The last control point of the previous segment, used to reflect the first control
// point of the shorthand curve commands.
#[derive(Copy, Clone, Debug, PartialEq)]
enum PrevCtrl {
    None,
    Cubic(Point),
    Quadratic(Point),
}

#[derive(Copy, Clone, Debug)]
struct ReduceState {
    pen: PenState,
    prev_ctrl: PrevCtrl,
}

impl ReduceState {
    fn new() -> Self {
        ReduceState {
            pen: PenState::default(),
            prev_ctrl: PrevCtrl::None,
        }
    }

    fn reflect(&self, ctrl: Point) -> Point {
        self.pen.current + (self.pen.current - ctrl)
    }
}

/// Rewrites path data using only move-to, line-to, cubic bézier and close segments,
/// with absolute coordinates.
///
/// - Horizontal and vertical lines become line-to segments.
/// - Quadratic curves are elevated to cubic curves.
/// - The shorthand curves get their first control point from the reflection of the
///   previous segment's last control point if that segment is a curve of the same
///   degree, and from the current point otherwise.
/// - Arcs are approximated with cubic curves, see [`SvgArc::to_cubic_beziers`].
///
/// Relative segments are resolved along the way so the input doesn't need to go
/// through [`absolutize`] first.
pub fn reduce(path: &PathData) -> PathData {
    let mut output = PathData::with_capacity(path.len());
    reduce_into(path, &mut |segment| output.push(segment.to_segment()));

    output
}

/// Converts path data to its canonical form.
///
/// Equivalent to `reduce(&absolutize(path))` with the result typed as a
/// [`CanonicalPath`].
pub fn normalize(path: &PathData) -> CanonicalPath {
    let mut segments = Vec::with_capacity(path.len());
    reduce_into(path, &mut |segment| segments.push(segment));

    CanonicalPath { segments }
}

fn reduce_into(path: &PathData, output: &mut dyn FnMut(CanonicalSegment)) {
    path.iter().fold(ReduceState::new(), |state, segment| {
        reduce_segment(state, segment, output)
    });
}

fn reduce_segment(
    state: ReduceState,
    segment: &Segment,
    output: &mut dyn FnMut(CanonicalSegment),
) -> ReduceState {
    let pen = state.pen;
    let from = pen.current;

    match *segment {
        Segment::MoveTo { abs, to } => {
            let to = pen.resolve(abs, to);
            output(CanonicalSegment::MoveTo(to));
            ReduceState {
                pen: pen.move_to(to),
                prev_ctrl: PrevCtrl::None,
            }
        }
        Segment::LineTo { abs, to } => line_to(pen, pen.resolve(abs, to), output),
        Segment::HorizTo { abs, x } => {
            let x = if abs { x } else { from.x + x };
            line_to(pen, Point::new(x, from.y), output)
        }
        Segment::VertTo { abs, y } => {
            let y = if abs { y } else { from.y + y };
            line_to(pen, Point::new(from.x, y), output)
        }
        Segment::CubicTo {
            abs,
            ctrl1,
            ctrl2,
            to,
        } => {
            let curve = CubicBezierSegment {
                from,
                ctrl1: pen.resolve(abs, ctrl1),
                ctrl2: pen.resolve(abs, ctrl2),
                to: pen.resolve(abs, to),
            };
            cubic_to(pen, &curve, output)
        }
        Segment::SmoothCubicTo { abs, ctrl2, to } => {
            let ctrl1 = match state.prev_ctrl {
                PrevCtrl::Cubic(ctrl) => state.reflect(ctrl),
                _ => from,
            };
            let curve = CubicBezierSegment {
                from,
                ctrl1,
                ctrl2: pen.resolve(abs, ctrl2),
                to: pen.resolve(abs, to),
            };
            cubic_to(pen, &curve, output)
        }
        Segment::QuadTo { abs, ctrl, to } => {
            let curve = QuadraticBezierSegment {
                from,
                ctrl: pen.resolve(abs, ctrl),
                to: pen.resolve(abs, to),
            };
            quadratic_to(pen, &curve, output)
        }
        Segment::SmoothQuadTo { abs, to } => {
            let ctrl = match state.prev_ctrl {
                PrevCtrl::Quadratic(ctrl) => state.reflect(ctrl),
                _ => from,
            };
            let curve = QuadraticBezierSegment {
                from,
                ctrl,
                to: pen.resolve(abs, to),
            };
            quadratic_to(pen, &curve, output)
        }
        Segment::ArcTo {
            abs,
            radii,
            x_rotation,
            flags,
            to,
        } => {
            let arc = SvgArc {
                from,
                to: pen.resolve(abs, to),
                radii,
                x_rotation: Angle::degrees(x_rotation),
                flags,
            };

            if arc.is_straight_line() {
                warn!("Arc to {:?} has a null radius, drawing a line.", arc.to);
            } else if arc.is_empty() {
                warn!("Arc at {:?} has coincident endpoints, skipping it.", arc.to);
            } else if !arc.is_finite() {
                warn!("Arc to {:?} has non-finite parameters, drawing a line.", arc.to);
            }

            arc.for_each_cubic_bezier(&mut |curve| {
                output(CanonicalSegment::CubicTo {
                    ctrl1: curve.ctrl1,
                    ctrl2: curve.ctrl2,
                    to: curve.to,
                });
            });

            ReduceState {
                pen: pen.draw_to(arc.to),
                prev_ctrl: PrevCtrl::None,
            }
        }
        Segment::Close => {
            output(CanonicalSegment::Close);
            ReduceState {
                pen: pen.close(),
                prev_ctrl: PrevCtrl::None,
            }
        }
    }
}

fn line_to(pen: PenState, to: Point, output: &mut dyn FnMut(CanonicalSegment)) -> ReduceState {
    output(CanonicalSegment::LineTo(to));
    ReduceState {
        pen: pen.draw_to(to),
        prev_ctrl: PrevCtrl::None,
    }
}

fn cubic_to(
    pen: PenState,
    curve: &CubicBezierSegment<f64>,
    output: &mut dyn FnMut(CanonicalSegment),
) -> ReduceState {
    output(CanonicalSegment::CubicTo {
        ctrl1: curve.ctrl1,
        ctrl2: curve.ctrl2,
        to: curve.to,
    });
    ReduceState {
        pen: pen.draw_to(curve.to),
        prev_ctrl: PrevCtrl::Cubic(curve.ctrl2),
    }
}

fn quadratic_to(
    pen: PenState,
    curve: &QuadraticBezierSegment<f64>,
    output: &mut dyn FnMut(CanonicalSegment),
) -> ReduceState {
    let cubic = curve.to_cubic();
    output(CanonicalSegment::CubicTo {
        ctrl1: cubic.ctrl1,
        ctrl2: cubic.ctrl2,
        to: cubic.to,
    });
    ReduceState {
        pen: pen.draw_to(curve.to),
        prev_ctrl: PrevCtrl::Quadratic(curve.ctrl),
    }
}

/// Path data in canonical form.
///
/// The segment type can only represent canonical segments, so consumers don't have
/// to deal with the other commands.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CanonicalPath {
    segments: Vec<CanonicalSegment>,
}

impl CanonicalPath {
    pub fn new() -> Self {
        CanonicalPath {
            segments: Vec::new(),
        }
    }

    pub fn iter(&self) -> slice::Iter<CanonicalSegment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[CanonicalSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the continuous subpaths of this path.
    pub fn subpaths(&self) -> Subpaths {
        split::split(self)
    }

    pub fn to_path_data(&self) -> PathData {
        self.segments.iter().map(CanonicalSegment::to_segment).collect()
    }
}

impl<'l> IntoIterator for &'l CanonicalPath {
    type Item = &'l CanonicalSegment;
    type IntoIter = slice::Iter<'l, CanonicalSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl From<CanonicalPath> for PathData {
    fn from(path: CanonicalPath) -> PathData {
        path.to_path_data()
    }
}

/// Checks that path data is already in canonical form.
///
/// This doesn't normalize anything, see [`normalize`] for that.
impl<'l> TryFrom<&'l PathData> for CanonicalPath {
    type Error = PathError;

    fn try_from(path: &'l PathData) -> Result<Self, PathError> {
        let mut segments = Vec::with_capacity(path.len());
        for (index, segment) in path.iter().enumerate() {
            segments.push(match *segment {
                Segment::MoveTo { abs: true, to } => CanonicalSegment::MoveTo(to),
                Segment::LineTo { abs: true, to } => CanonicalSegment::LineTo(to),
                Segment::CubicTo {
                    abs: true,
                    ctrl1,
                    ctrl2,
                    to,
                } => CanonicalSegment::CubicTo { ctrl1, ctrl2, to },
                Segment::Close => CanonicalSegment::Close,
                _ => {
                    return Err(PathError::NonCanonicalSegment {
                        index,
                        command: segment.command(),
                    });
                }
            });
        }

        Ok(CanonicalPath { segments })
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.to_path_data(), f)
    }
}

#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::parser::parse;

#[cfg(test)]
fn assert_approx_eq(a: &[f64], b: &[f64], epsilon: f64) {
    assert_eq!(a.len(), b.len(), "{:?} != {:?}", a, b);
    for (a, b) in a.iter().zip(b) {
        assert!((a - b).abs() <= epsilon, "{:?} != {:?}", a, b);
    }
}

#[cfg(test)]
fn commands(path: &PathData) -> String {
    path.iter().map(Segment::command).collect()
}

#[test]
fn absolutize_relative_segments() {
    let path = absolutize(&parse("m10 10 l5 0 h5 v5 c1 1 2 2 3 3 z l1 1"));
    assert!(path.is_absolute());
    assert_eq!(commands(&path), "MLHVCZL");
    assert_eq!(
        path.to_string(),
        "M 10 10 L 15 10 H 20 V 15 C 21 16 22 17 23 18 Z L 11 11"
    );
}

#[test]
fn absolutize_keeps_arc_radii() {
    let path = absolutize(&parse("M10 10 a 5 6 30 0 1 10 0 q 1 1 2 0 t 5 0 s 1 2 3 4"));
    assert_eq!(
        path.to_string(),
        "M 10 10 A 5 6 30 0 1 20 10 Q 21 11 22 10 T 27 10 S 28 12 30 14"
    );
}

#[test]
fn absolutize_is_idempotent() {
    for src in &[
        "m10 10 l5 0 h5 v5 z l1 1",
        "M0 0 q5 5 10 0 t10 0 s5 5 10 0 a5 5 0 1 0 10 10 Z",
        "m 1 1 2 2 3 3 m 4 4 z m 1 1 v -1",
        "",
    ] {
        let once = absolutize(&parse(src));
        assert_eq!(absolutize(&once), once);
    }
}

#[test]
fn reduce_quadratic() {
    let path = reduce(&parse("M0 0 Q5 10 10 0"));
    assert_eq!(commands(&path), "MC");
    assert_approx_eq(
        &path.as_slice()[1].values(),
        &[3.33, 6.67, 6.67, 6.67, 10.0, 0.0],
        0.005,
    );
}

#[test]
fn reduce_lines() {
    let path = reduce(&parse("M1 2 H5 V7 h-1 v-1 Z"));
    assert_eq!(path.to_string(), "M 1 2 L 5 2 L 5 7 L 4 7 L 4 6 Z");
}

#[test]
fn reduce_smooth_cubic() {
    let path = reduce(&parse("M0 0 C0 10 10 10 10 0 S20 -10 20 0"));
    assert_eq!(
        path.as_slice()[2],
        Segment::CubicTo {
            abs: true,
            ctrl1: point(10.0, -10.0),
            ctrl2: point(20.0, -10.0),
            to: point(20.0, 0.0),
        }
    );

    // No reflection after a segment that isn't a cubic curve.
    let path = reduce(&parse("M0 0 L5 0 S10 10 10 0"));
    assert_eq!(
        path.as_slice()[2],
        Segment::CubicTo {
            abs: true,
            ctrl1: point(5.0, 0.0),
            ctrl2: point(10.0, 10.0),
            to: point(10.0, 0.0),
        }
    );

    let path = reduce(&parse("M0 0 Q5 10 10 0 S20 -10 20 0"));
    assert_eq!(path.as_slice()[2].values()[..2], [10.0, 0.0]);
}

#[test]
fn reduce_smooth_quadratic() {
    let path = reduce(&parse("M0 0 Q5 10 10 0 T20 0"));
    assert_eq!(commands(&path), "MCC");
    // The reflected quadratic control point is (15, -10).
    assert_approx_eq(
        &path.as_slice()[2].values(),
        &[40.0 / 3.0, -20.0 / 3.0, 50.0 / 3.0, -20.0 / 3.0, 20.0, 0.0],
        1e-9,
    );

    // Chains of shorthand quadratic curves keep reflecting.
    let path = reduce(&parse("M0 0 Q5 10 10 0 T20 0 T30 0"));
    assert_approx_eq(
        &path.as_slice()[3].values(),
        &[70.0 / 3.0, 20.0 / 3.0, 80.0 / 3.0, 20.0 / 3.0, 30.0, 0.0],
        1e-9,
    );

    // After a cubic curve the control point is the current point, which gives a line.
    let path = reduce(&parse("M0 0 C1 1 2 1 3 0 T6 0"));
    assert_approx_eq(
        &path.as_slice()[2].values(),
        &[3.0, 0.0, 4.0, 0.0, 6.0, 0.0],
        1e-9,
    );
}

#[test]
fn reduce_arcs() {
    let path = reduce(&parse("M0 0 A5 5 0 0 1 10 0 Z"));
    // Half a circle is cut in pieces of at most 120°.
    assert_eq!(commands(&path), "MCCZ");
    let last = path.as_slice()[2].values();
    assert!((last[4] - 10.0).abs() < 1e-9);
    assert!(last[5].abs() < 1e-9);

    let path = reduce(&parse("M0 0 A0 5 0 0 1 10 0"));
    assert_eq!(path.to_string(), "M 0 0 C 0 0 10 0 10 0");

    let path = reduce(&parse("M0 0 a5 5 0 0 1 0 0 L 1 1"));
    assert_eq!(path.to_string(), "M 0 0 L 1 1");
}

#[test]
fn reduce_non_finite_arcs() {
    // The parser stops at the out of range number.
    let path = normalize(&parse("M0 0 A5 5 0 0 1 1e400 0"));
    assert_eq!(path.to_string(), "M 0 0");

    // Relative coordinates overflow while being resolved.
    let path = reduce(&parse("M1e308 0 a5 5 0 0 1 1e308 0 L 1 1"));
    assert_eq!(commands(&path), "MCL");
    let values = path.as_slice()[1].values();
    assert_eq!(values[0], 1e308);
    assert_eq!(values[2], std::f64::INFINITY);
    assert_eq!(values[4], std::f64::INFINITY);

    // Finite parameters that overflow while computing the center.
    let path = reduce(&parse("M-1e300 0 A1 1 0 0 1 1e300 0"));
    assert_eq!(commands(&path), "MC");
    assert_eq!(path.as_slice()[1].values()[4], 1e300);
}

#[test]
fn reduce_is_idempotent_and_canonical() {
    for src in &[
        "m10 10 l5 0 h5 v5 z l1 1",
        "M0 0 q5 5 10 0 t10 0 s5 5 10 0 a5 5 0 1 0 10 10 Z",
        "M3 3 A 4 8 45 1 1 -5 2 C 1 1 1 1 2 2 S 4 4 5 5 z",
        "",
    ] {
        let once = reduce(&parse(src));
        assert!(once.is_canonical());
        assert_eq!(reduce(&once), once);
    }
}

#[test]
fn reduce_resolves_relative_segments() {
    for src in &[
        "m10 10 l5 0 h5 v5 z l1 1",
        "M0 0 q5 5 10 0 t10 0 s5 5 10 0 a5 5 0 1 0 10 10 Z",
    ] {
        let path = parse(src);
        assert_eq!(reduce(&path), reduce(&absolutize(&path)));
        assert_eq!(PathData::from(normalize(&path)), reduce(&path));
    }
}

#[test]
fn canonical_path_conversion() {
    let canonical = reduce(&parse("M0 0 Q5 10 10 0 z"));
    let path = CanonicalPath::try_from(&canonical).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path.to_path_data(), canonical);

    let raw = parse("M0 0 L1 1 Q5 10 10 0");
    assert_eq!(
        CanonicalPath::try_from(&raw),
        Err(PathError::NonCanonicalSegment {
            index: 2,
            command: 'Q'
        })
    );

    let relative = parse("m0 0");
    assert!(CanonicalPath::try_from(&relative).is_err());
}
