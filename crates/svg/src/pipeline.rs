//! Extraction of polygonal contours from a shape tree.

use crate::geom::CubicBezierSegment;
use crate::math::Point;
use crate::path::{Edge, Subpath, Subpaths};
use crate::tree::Node;

use log::{trace, warn};
use std::slice;

/// Parameters for the extraction of contours.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FlattenOptions {
    /// Maximum allowed distance between a curve and its polygonal approximation.
    ///
    /// Values that aren't strictly positive are replaced with the default.
    ///
    /// Default value: `FlattenOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,
}

impl FlattenOptions {
    /// Default flattening tolerance, in user units.
    pub const DEFAULT_TOLERANCE: f64 = 0.25;

    pub const DEFAULT: Self = FlattenOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
    };

    #[inline]
    pub fn tolerance(tolerance: f64) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn effective_tolerance(&self) -> f64 {
        // Also catches NaN.
        if self.tolerance > 0.0 {
            return self.tolerance;
        }

        warn!(
            "Invalid flattening tolerance {}, using {} instead.",
            self.tolerance,
            Self::DEFAULT_TOLERANCE
        );

        Self::DEFAULT_TOLERANCE
    }
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The flattened form of a subpath.
///
/// A closed contour doesn't repeat its first point at the end, `closed` is the only
/// record that the last point connects back to the first one. See `closed_points`
/// for consumers that need the explicit closing point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// The points of the contour followed by the first point again if the contour is
    /// closed.
    pub fn closed_points(&self) -> impl Iterator<Item = Point> + '_ {
        let closing = if self.closed { self.first() } else { None };
        self.points.iter().copied().chain(closing)
    }
}

/// Flattens a subpath into a contour.
///
/// Lines contribute their endpoint and cubic curves the points of their flattened
/// approximation, without the first one which is the current point.
pub fn flatten_subpath(subpath: &Subpath, options: &FlattenOptions) -> Contour {
    let tolerance = options.effective_tolerance();
    flatten_with_tolerance(subpath, tolerance)
}

fn flatten_with_tolerance(subpath: &Subpath, tolerance: f64) -> Contour {
    let mut points = Vec::with_capacity(subpath.edges.len() + 1);
    points.push(subpath.start);

    let mut current = subpath.start;
    for edge in &subpath.edges {
        match *edge {
            Edge::Line { to } => points.push(to),
            Edge::Cubic { ctrl1, ctrl2, to } => {
                let curve = CubicBezierSegment {
                    from: current,
                    ctrl1,
                    ctrl2,
                    to,
                };
                points.extend(curve.flattened(tolerance).skip(1));
            }
        }
        current = edge.to();
    }

    trace!(
        "{} contour with {} points",
        if subpath.closed { "closed" } else { "open" },
        points.len()
    );

    Contour {
        points,
        closed: subpath.closed,
    }
}

/// Walks the tree in document order and yields the contours of every shape, using
/// the default options.
///
/// See [`to_paths_with_options`].
pub fn to_paths(root: &Node) -> Contours {
    to_paths_with_options(root, &FlattenOptions::DEFAULT)
}

/// Walks the tree in document order and yields the contours of every shape.
///
/// Groups are visited depth-first. Each shape is normalized (or its cached canonical
/// path data reused), split into subpaths and each subpath flattened into a contour.
/// Shapes are processed one at a time as the iterator advances.
pub fn to_paths_with_options<'l>(root: &'l Node, options: &FlattenOptions) -> Contours<'l> {
    Contours {
        stack: vec![slice::from_ref(root).iter()],
        subpaths: None,
        tolerance: options.effective_tolerance(),
    }
}

/// Iterator over the contours of a shape tree, see [`to_paths`].
#[derive(Clone, Debug)]
pub struct Contours<'l> {
    stack: Vec<slice::Iter<'l, Node>>,
    subpaths: Option<Subpaths<'l>>,
    tolerance: f64,
}

impl<'l> Contours<'l> {
    // The next shape or group in document order.
    fn next_node(&mut self) -> Option<&'l Node> {
        loop {
            let siblings = self.stack.last_mut()?;
            match siblings.next() {
                Some(node) => return Some(node),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'l> Iterator for Contours<'l> {
    type Item = Contour;

    fn next(&mut self) -> Option<Contour> {
        loop {
            if let Some(subpaths) = &mut self.subpaths {
                if let Some(subpath) = subpaths.next() {
                    return Some(flatten_with_tolerance(&subpath, self.tolerance));
                }
                self.subpaths = None;
            }

            match self.next_node()? {
                Node::Group(children) => self.stack.push(children.iter()),
                Node::Shape(shape) => {
                    self.subpaths = Some(shape.canonical_path().subpaths());
                }
            }
        }
    }
}

#[cfg(test)]
use crate::geom::euclid::approxeq::ApproxEq;
#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::shapes::{Circle, Geometry, Line, Polygon, Rect};
#[cfg(test)]
use crate::tree::Shape;

#[test]
fn group_in_document_order() {
    let root = Node::group(vec![
        Node::shape(Rect::new(0.0, 0.0, 10.0, 5.0)),
        Node::shape(Circle::new(20.0, 20.0, 5.0)),
    ]);

    let contours: Vec<Contour> = to_paths(&root).collect();
    assert_eq!(contours.len(), 2);

    let rect = &contours[0];
    assert!(rect.closed);
    assert_eq!(
        rect.points,
        vec![
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 5.0),
            point(0.0, 5.0),
            point(0.0, 0.0),
        ]
    );

    let circle = &contours[1];
    assert!(circle.closed);
    assert_eq!(circle.first(), Some(point(25.0, 20.0)));
    assert!(circle.last().unwrap().approx_eq_eps(&point(25.0, 20.0), &point(1e-9, 1e-9)));
    for p in &circle.points {
        let r = (*p - point(20.0, 20.0)).length();
        assert!((r - 5.0).abs() <= FlattenOptions::DEFAULT_TOLERANCE);
    }
}

#[test]
fn nested_groups() {
    let root = Node::group(vec![
        Node::group(vec![Node::shape(Line::new(0.0, 0.0, 1.0, 1.0))]),
        Node::shape(Geometry::path("M0 0 L1 1 Z M5 5 L6 6")),
        Node::group(vec![]),
        Node::group(vec![Node::group(vec![Node::shape(Polygon::parse(
            "0,0 3,0 3,3",
        ))])]),
    ]);

    let contours: Vec<Contour> = to_paths(&root).collect();
    assert_eq!(contours.len(), 4);
    assert_eq!(contours[0].points, vec![point(0.0, 0.0), point(1.0, 1.0)]);
    assert!(!contours[0].closed);
    assert!(contours[1].closed);
    assert_eq!(contours[2].first(), Some(point(5.0, 5.0)));
    assert!(!contours[2].closed);
    assert_eq!(contours[3].len(), 3);
    assert!(contours[3].closed);
}

#[test]
fn single_shape_root() {
    let root = Node::shape(Circle::new(0.0, 0.0, 1.0));
    assert_eq!(to_paths(&root).count(), 1);

    let empty = Node::group(vec![Node::shape(Geometry::path("L 1 1"))]);
    assert_eq!(to_paths(&empty).count(), 0);
}

#[test]
fn shapes_are_processed_lazily() {
    let root = Node::group(vec![
        Node::shape(Rect::new(0.0, 0.0, 10.0, 5.0)),
        Node::shape(Circle::new(20.0, 20.0, 5.0)),
    ]);

    let mut contours = to_paths(&root);
    assert!(contours.next().is_some());

    match &root {
        Node::Group(children) => match (&children[0], &children[1]) {
            (Node::Shape(rect), Node::Shape(circle)) => {
                assert!(rect.is_cached());
                assert!(!circle.is_cached());
            }
            _ => panic!(),
        },
        _ => panic!(),
    }

    assert!(contours.next().is_some());
    assert!(contours.next().is_none());
}

#[test]
fn tolerance() {
    let root = Node::shape(Circle::new(0.0, 0.0, 100.0));

    let coarse: usize = to_paths_with_options(&root, &FlattenOptions::tolerance(1.0))
        .map(|contour| contour.len())
        .sum();
    let fine: usize = to_paths_with_options(&root, &FlattenOptions::tolerance(0.01))
        .map(|contour| contour.len())
        .sum();
    assert!(fine > coarse);

    let default: Vec<Contour> = to_paths(&root).collect();
    for invalid in &[0.0, -1.0, std::f64::NAN] {
        let contours: Vec<Contour> =
            to_paths_with_options(&root, &FlattenOptions::tolerance(*invalid)).collect();
        assert_eq!(contours, default);
    }
}

#[test]
fn contours_are_restartable() {
    let root = Node::shape(Geometry::path("M0 0 C 0 10 10 10 10 0 S 20 -10 20 0"));
    let a: Vec<Contour> = to_paths(&root).collect();
    let b: Vec<Contour> = to_paths(&root).collect();
    assert_eq!(a, b);
    assert_eq!(a[0].first(), Some(point(0.0, 0.0)));
    assert_eq!(a[0].last(), Some(point(20.0, 0.0)));
}

#[test]
fn closed_points() {
    let contour = Contour {
        points: vec![point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)],
        closed: true,
    };
    let points: Vec<Point> = contour.closed_points().collect();
    assert_eq!(points.len(), 4);
    assert_eq!(points[3], point(0.0, 0.0));

    let open = Contour {
        closed: false,
        ..contour.clone()
    };
    assert_eq!(open.closed_points().count(), 3);
}

#[test]
fn flatten_subpath_skips_duplicate_points() {
    let shape = Shape::new(Geometry::path("M0 0 C 0 10 10 10 10 0 L 20 0"));
    let subpath = shape.canonical_path().subpaths().next().unwrap();
    let contour = flatten_subpath(&subpath, &FlattenOptions::DEFAULT);

    assert_eq!(contour.first(), Some(point(0.0, 0.0)));
    assert_eq!(contour.last(), Some(point(20.0, 0.0)));
    for pair in contour.points.windows(2) {
        assert!(pair[0] != pair[1]);
    }
}

#[test]
fn overflowing_curves_terminate() {
    let root = Node::group(vec![
        Node::shape(Geometry::path("M0 0 C 1e200 0 0 0 1 1")),
        Node::shape(Geometry::path("M0 0 C 1e15 0 -1e15 1e15 1 1")),
    ]);

    let options = FlattenOptions::tolerance(0.01);
    let contours: Vec<Contour> = to_paths_with_options(&root, &options).collect();
    assert_eq!(contours.len(), 2);
    assert_eq!(contours[0].points, vec![point(0.0, 0.0), point(1.0, 1.0)]);

    let bounded = crate::geom::cubic_bezier::MAX_FLATTENING_STEPS as usize + 2;
    assert!(contours[1].len() <= bounded);
    assert_eq!(contours[1].last(), Some(point(1.0, 1.0)));
}
