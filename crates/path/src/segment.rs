use crate::geom::arrayvec::ArrayVec;
use crate::geom::ArcFlags;
use crate::math::{Point, Vector};

use std::fmt;

/// One command of SVG path data with its parameters.
///
/// `abs` is false for the relative (lowercase) form of a command, in which case the
/// coordinates are offsets from the current point.
///
/// Close has a single form, `z` and `Z` are equivalent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Segment {
    MoveTo {
        abs: bool,
        to: Point,
    },
    LineTo {
        abs: bool,
        to: Point,
    },
    CubicTo {
        abs: bool,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    QuadTo {
        abs: bool,
        ctrl: Point,
        to: Point,
    },
    SmoothCubicTo {
        abs: bool,
        ctrl2: Point,
        to: Point,
    },
    SmoothQuadTo {
        abs: bool,
        to: Point,
    },
    ArcTo {
        abs: bool,
        radii: Vector,
        /// In degrees.
        x_rotation: f64,
        flags: ArcFlags,
        to: Point,
    },
    HorizTo {
        abs: bool,
        x: f64,
    },
    VertTo {
        abs: bool,
        y: f64,
    },
    Close,
}

impl Segment {
    /// The command letter of this segment, lowercase for relative forms.
    pub fn command(&self) -> char {
        let upper = match self {
            Segment::MoveTo { .. } => 'M',
            Segment::LineTo { .. } => 'L',
            Segment::CubicTo { .. } => 'C',
            Segment::QuadTo { .. } => 'Q',
            Segment::SmoothCubicTo { .. } => 'S',
            Segment::SmoothQuadTo { .. } => 'T',
            Segment::ArcTo { .. } => 'A',
            Segment::HorizTo { .. } => 'H',
            Segment::VertTo { .. } => 'V',
            Segment::Close => 'Z',
        };

        if self.is_relative() {
            upper.to_ascii_lowercase()
        } else {
            upper
        }
    }

    pub fn is_relative(&self) -> bool {
        match *self {
            Segment::MoveTo { abs, .. }
            | Segment::LineTo { abs, .. }
            | Segment::CubicTo { abs, .. }
            | Segment::QuadTo { abs, .. }
            | Segment::SmoothCubicTo { abs, .. }
            | Segment::SmoothQuadTo { abs, .. }
            | Segment::ArcTo { abs, .. }
            | Segment::HorizTo { abs, .. }
            | Segment::VertTo { abs, .. } => !abs,
            Segment::Close => false,
        }
    }

    /// Whether this segment belongs to the canonical command set
    /// (absolute move-to, line-to and cubic bézier, or close).
    pub fn is_canonical(&self) -> bool {
        match self {
            Segment::MoveTo { abs: true, .. }
            | Segment::LineTo { abs: true, .. }
            | Segment::CubicTo { abs: true, .. }
            | Segment::Close => true,
            _ => false,
        }
    }

    /// The segment's parameters in path syntax order.
    ///
    /// Arc flags are represented as `0.0` or `1.0`.
    pub fn values(&self) -> ArrayVec<f64, 7> {
        let mut values = ArrayVec::new();
        match *self {
            Segment::MoveTo { to, .. }
            | Segment::LineTo { to, .. }
            | Segment::SmoothQuadTo { to, .. } => {
                values.extend([to.x, to.y]);
            }
            Segment::CubicTo {
                ctrl1, ctrl2, to, ..
            } => {
                values.extend([ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y]);
            }
            Segment::QuadTo {
                ctrl: ctrl2, to, ..
            }
            | Segment::SmoothCubicTo { ctrl2, to, .. } => {
                values.extend([ctrl2.x, ctrl2.y, to.x, to.y]);
            }
            Segment::ArcTo {
                radii,
                x_rotation,
                flags,
                to,
                ..
            } => {
                values.extend([
                    radii.x,
                    radii.y,
                    x_rotation,
                    flag_value(flags.large_arc),
                    flag_value(flags.sweep),
                    to.x,
                    to.y,
                ]);
            }
            Segment::HorizTo { x, .. } => values.push(x),
            Segment::VertTo { y, .. } => values.push(y),
            Segment::Close => {}
        }

        values
    }
}

fn flag_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Writes the command letter followed by the space-separated values.
///
/// The parser only produces finite values, but resolving relative coordinates can
/// overflow. Such values are written as `inf` or `NaN`, which the parser rejects.
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.command())?;
        for value in &self.values() {
            write!(f, " {}", value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
use crate::math::{point, vector};

#[test]
fn command_letters() {
    let segments = [
        (Segment::MoveTo { abs: true, to: point(1.0, 2.0) }, 'M'),
        (Segment::LineTo { abs: false, to: point(1.0, 2.0) }, 'l'),
        (Segment::HorizTo { abs: false, x: 3.0 }, 'h'),
        (Segment::VertTo { abs: true, y: 3.0 }, 'V'),
        (Segment::SmoothQuadTo { abs: false, to: point(0.0, 0.0) }, 't'),
        (Segment::Close, 'Z'),
    ];

    for (segment, command) in &segments {
        assert_eq!(segment.command(), *command);
    }

    assert!(!Segment::Close.is_relative());
    assert!(Segment::Close.is_canonical());
    assert!(!segments[1].0.is_canonical());
}

#[test]
fn display() {
    let line = Segment::LineTo {
        abs: true,
        to: point(10.0, -0.5),
    };
    assert_eq!(line.to_string(), "L 10 -0.5");

    let arc = Segment::ArcTo {
        abs: false,
        radii: vector(5.0, 5.0),
        x_rotation: 30.0,
        flags: ArcFlags {
            large_arc: true,
            sweep: false,
        },
        to: point(1.25, 0.0),
    };
    assert_eq!(arc.to_string(), "a 5 5 30 1 0 1.25 0");
    assert_eq!(arc.values().len(), 7);

    assert_eq!(Segment::Close.to_string(), "Z");
}
