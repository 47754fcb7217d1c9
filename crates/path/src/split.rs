//! Splitting canonical path data into continuous subpaths.

use crate::math::Point;
use crate::normalize::{CanonicalPath, CanonicalSegment};

use log::trace;
use std::iter;
use std::slice;

/// A drawing segment of a subpath, starting where the previous one ended.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Edge {
    Line {
        to: Point,
    },
    Cubic {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
}

impl Edge {
    pub fn to(&self) -> Point {
        match *self {
            Edge::Line { to } | Edge::Cubic { to, .. } => to,
        }
    }

    pub fn to_segment(&self) -> CanonicalSegment {
        match *self {
            Edge::Line { to } => CanonicalSegment::LineTo(to),
            Edge::Cubic { ctrl1, ctrl2, to } => CanonicalSegment::CubicTo { ctrl1, ctrl2, to },
        }
    }
}

/// One continuous contour of a path.
///
/// `closed` records whether the path data closed the subpath, the edges don't include
/// the closing line back to `start`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Subpath {
    pub start: Point,
    pub edges: Vec<Edge>,
    pub closed: bool,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Subpath {
            start,
            edges: Vec::new(),
            closed: false,
        }
    }

    /// Where the last edge ends.
    pub fn end(&self) -> Point {
        self.edges.last().map_or(self.start, Edge::to)
    }

    /// The canonical segments of this subpath: a move-to followed by the edges.
    pub fn segments(&self) -> impl Iterator<Item = CanonicalSegment> + '_ {
        iter::once(CanonicalSegment::MoveTo(self.start))
            .chain(self.edges.iter().map(Edge::to_segment))
    }
}

/// Splits canonical path data into subpaths.
///
/// - A close segment ends the current subpath, marking it closed.
/// - A move-to ends the current subpath if there is one, leaving it open. A move-to
///   without any edge after it gives a subpath with no edges.
/// - Edges that follow a close segment without a move-to start a new subpath at the
///   start of the closed one.
/// - A subpath still open at the end of the input is yielded last.
///
/// The iterator doesn't hold state besides its position in the input; iterating again
/// means calling this function again.
pub fn split(path: &CanonicalPath) -> Subpaths {
    Subpaths {
        segments: path.iter(),
        current: None,
        subpath_start: Point::origin(),
    }
}

/// Iterator over the subpaths of a [`CanonicalPath`], see [`split`].
#[derive(Clone, Debug)]
pub struct Subpaths<'l> {
    segments: slice::Iter<'l, CanonicalSegment>,
    current: Option<Subpath>,
    subpath_start: Point,
}

impl<'l> Subpaths<'l> {
    fn current_mut(&mut self) -> &mut Subpath {
        let start = self.subpath_start;
        self.current.get_or_insert_with(|| Subpath::new(start))
    }
}

impl<'l> Iterator for Subpaths<'l> {
    type Item = Subpath;

    fn next(&mut self) -> Option<Subpath> {
        while let Some(segment) = self.segments.next() {
            match *segment {
                CanonicalSegment::MoveTo(to) => {
                    self.subpath_start = to;
                    let done = self.current.replace(Subpath::new(to));
                    if let Some(subpath) = done {
                        trace!("open subpath with {} edges", subpath.edges.len());
                        return Some(subpath);
                    }
                }
                CanonicalSegment::LineTo(to) => {
                    self.current_mut().edges.push(Edge::Line { to });
                }
                CanonicalSegment::CubicTo { ctrl1, ctrl2, to } => {
                    self.current_mut()
                        .edges
                        .push(Edge::Cubic { ctrl1, ctrl2, to });
                }
                CanonicalSegment::Close => {
                    if let Some(mut subpath) = self.current.take() {
                        trace!("closed subpath with {} edges", subpath.edges.len());
                        subpath.closed = true;
                        return Some(subpath);
                    }
                }
            }
        }

        self.current.take()
    }
}

#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::{normalize::normalize, parser::parse};

#[cfg(test)]
fn subpaths(src: &str) -> Vec<Subpath> {
    normalize(&parse(src)).subpaths().collect()
}

#[test]
fn split_at_close_and_move_to() {
    let subpaths = subpaths("M0 0 L1 0 L1 1 Z M5 5 L6 5");
    assert_eq!(subpaths.len(), 2);

    assert_eq!(subpaths[0].start, point(0.0, 0.0));
    assert_eq!(subpaths[0].edges.len(), 2);
    assert!(subpaths[0].closed);

    assert_eq!(subpaths[1].start, point(5.0, 5.0));
    assert_eq!(subpaths[1].edges, vec![Edge::Line { to: point(6.0, 5.0) }]);
    assert!(!subpaths[1].closed);
}

#[test]
fn split_open_subpaths() {
    let subpaths = subpaths("M0 0 L1 1 M5 5 L6 6 L7 7");
    assert_eq!(subpaths.len(), 2);
    assert!(!subpaths[0].closed);
    assert_eq!(subpaths[0].end(), point(1.0, 1.0));
    assert!(!subpaths[1].closed);
    assert_eq!(subpaths[1].end(), point(7.0, 7.0));
}

#[test]
fn split_after_close_without_move_to() {
    let subpaths = subpaths("M1 1 L2 1 Z L2 2 Z");
    assert_eq!(subpaths.len(), 2);
    assert_eq!(subpaths[1].start, point(1.0, 1.0));
    assert_eq!(subpaths[1].edges, vec![Edge::Line { to: point(2.0, 2.0) }]);
    assert!(subpaths[1].closed);
}

#[test]
fn split_lone_move_to() {
    let subpaths = subpaths("M1 1 M2 2 L3 3 M4 4");
    assert_eq!(subpaths.len(), 3);
    assert_eq!(subpaths[0], Subpath::new(point(1.0, 1.0)));
    assert_eq!(subpaths[1].edges.len(), 1);
    assert_eq!(subpaths[2], Subpath::new(point(4.0, 4.0)));

    // Nothing left to close.
    let subpaths = self::subpaths("M0 0 Z Z");
    assert_eq!(subpaths.len(), 1);
    assert!(subpaths[0].closed);
    assert!(subpaths[0].edges.is_empty());
}

#[test]
fn split_empty() {
    assert!(subpaths("").is_empty());
}

#[test]
fn split_is_restartable() {
    let path = normalize(&parse("M0 0 Q5 10 10 0 Z m 1 1 c 1 1 2 2 3 3"));
    let a: Vec<Subpath> = path.subpaths().collect();
    let b: Vec<Subpath> = split(&path).collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);

    let segments: Vec<CanonicalSegment> = a[0].segments().collect();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0], CanonicalSegment::MoveTo(point(0.0, 0.0)));
}
