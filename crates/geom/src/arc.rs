//! Elliptic arc related maths and tools.

use crate::scalar::{Float, Scalar};
use crate::{point, vector, Angle, CubicBezierSegment, Point, Rotation, Vector};

use arrayvec::ArrayVec;

/// The maximum number of cubic bézier curves produced by
/// [`SvgArc::to_cubic_beziers`].
///
/// A full turn split in pieces of at most 120° gives three curves, the extra slot
/// absorbs rounding on sweeps that land right on a multiple of 120°.
pub const MAX_ARC_CUBICS: usize = 4;

/// An elliptic arc curve segment using the SVG's end-point notation.
///
/// See [SVG implementation notes](https://www.w3.org/TR/SVG/implnote.html#ArcImplementationNotes).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc<S> {
    pub from: Point<S>,
    pub to: Point<S>,
    pub radii: Vector<S>,
    pub x_rotation: Angle<S>,
    pub flags: ArcFlags,
}

/// An elliptic arc curve segment using the center notation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc<S> {
    pub center: Point<S>,
    pub radii: Vector<S>,
    pub start_angle: Angle<S>,
    pub sweep_angle: Angle<S>,
    pub x_rotation: Angle<S>,
}

/// Flag parameters for arcs as described by the SVG specification.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    pub large_arc: bool,
    pub sweep: bool,
}

impl<S: Scalar> SvgArc<S> {
    /// Converts this arc to its center parameterization.
    ///
    /// Radii that are too small for the chord between the endpoints are scaled up
    /// uniformly. The arc must not be degenerate, see `is_straight_line` and `is_empty`.
    pub fn to_arc(&self) -> Arc<S> {
        debug_assert!(!self.is_straight_line());
        debug_assert!(!self.is_empty());

        let mut rx = self.radii.x.abs();
        let mut ry = self.radii.y.abs();

        // Work in the ellipse's unrotated frame.
        let to_ellipse = Rotation::new(-self.x_rotation);
        let p1 = to_ellipse.transform_point(self.from);
        let p2 = to_ellipse.transform_point(self.to);

        let hx = (p1.x - p2.x) * S::HALF;
        let hy = (p1.y - p2.y) * S::HALF;

        let lambda = (hx * hx) / (rx * rx) + (hy * hy) / (ry * ry);
        if lambda > S::ONE {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let sign = if self.flags.large_arc == self.flags.sweep {
            -S::ONE
        } else {
            S::ONE
        };

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * hy * hy - ry2 * hx * hx;
        let den = rx2 * hy * hy + ry2 * hx * hx;
        let k = sign * (num / den).abs().sqrt();

        let cx = k * rx * hy / ry + (p1.x + p2.x) * S::HALF;
        let cy = -k * ry * hx / rx + (p1.y + p2.y) * S::HALF;

        let two_pi = S::TWO * S::PI();
        let mut start = ((p1.y - cy) / ry).atan2((p1.x - cx) / rx);
        let mut end = ((p2.y - cy) / ry).atan2((p2.x - cx) / rx);
        if start < S::ZERO {
            start += two_pi;
        }
        if end < S::ZERO {
            end += two_pi;
        }

        // Positive sweeps go through increasing angles.
        if self.flags.sweep && start > end {
            start -= two_pi;
        }
        if !self.flags.sweep && end > start {
            end -= two_pi;
        }

        Arc {
            center: Rotation::new(self.x_rotation).transform_point(point(cx, cy)),
            radii: vector(rx, ry),
            start_angle: Angle::radians(start),
            sweep_angle: Angle::radians(end - start),
            x_rotation: self.x_rotation,
        }
    }

    /// Whether this arc has a null radius, in which case it is drawn as a straight line.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x == S::ZERO || self.radii.y == S::ZERO
    }

    /// Whether the endpoints coincide, in which case the arc is not drawn at all.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Approximates this arc with a sequence of cubic bézier curves.
    ///
    /// - An arc with a null radius produces a single curve whose control points sit on
    ///   the endpoints, which is a straight segment.
    /// - Otherwise an arc with coincident endpoints produces nothing.
    /// - Otherwise an arc that isn't finite, or whose center or sweep overflows, is
    ///   drawn as a straight segment too.
    /// - Otherwise each curve covers at most 120° of the ellipse.
    ///
    /// The first curve starts exactly at `from` and the last one ends exactly at `to`.
    pub fn to_cubic_beziers(&self) -> ArrayVec<CubicBezierSegment<S>, MAX_ARC_CUBICS> {
        let mut curves = ArrayVec::new();

        if self.is_straight_line() {
            curves.push(self.straight_line());
            return curves;
        }

        if self.is_empty() {
            return curves;
        }

        // Finite parameters can still overflow in the center computation.
        let arc = self.to_arc();
        if !self.is_finite() || !arc.is_finite() {
            curves.push(self.straight_line());
            return curves;
        }

        arc.for_each_cubic_bezier(&mut |curve| {
            if curves.try_push(*curve).is_err() {
                debug_assert!(false, "arc split into more than {} curves", MAX_ARC_CUBICS);
            }
        });

        // Snap the ends back onto the input, the rotation round trip is not exact.
        if let Some(first) = curves.first_mut() {
            first.from = self.from;
        }
        if let Some(last) = curves.last_mut() {
            last.to = self.to;
        }

        curves
    }

    /// Whether the endpoints, radii and rotation are all finite numbers.
    ///
    /// Arcs with infinite or NaN parameters are drawn as a straight line.
    pub fn is_finite(&self) -> bool {
        is_finite_point(self.from)
            && is_finite_point(self.to)
            && self.radii.x.is_finite()
            && self.radii.y.is_finite()
            && self.x_rotation.get().is_finite()
    }

    // A cubic with its control points on the endpoints.
    fn straight_line(&self) -> CubicBezierSegment<S> {
        CubicBezierSegment {
            from: self.from,
            ctrl1: self.from,
            ctrl2: self.to,
            to: self.to,
        }
    }

    /// Invokes a callback for each cubic bézier curve of `to_cubic_beziers`.
    pub fn for_each_cubic_bezier<F>(&self, cb: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        for curve in &self.to_cubic_beziers() {
            cb(curve);
        }
    }
}

impl<S: Scalar> Arc<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        self.sample_angle(self.get_angle(t))
    }

    /// Sample the curve's angle at t (expecting t between 0 and 1).
    #[inline]
    pub fn get_angle(&self, t: S) -> Angle<S> {
        self.start_angle + Angle::radians(self.sweep_angle.get() * t)
    }

    #[inline]
    pub fn end_angle(&self) -> Angle<S> {
        self.start_angle + self.sweep_angle
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.sample(S::ZERO)
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.sample(S::ONE)
    }

    /// Whether the center, radii and angles are all finite numbers.
    pub fn is_finite(&self) -> bool {
        is_finite_point(self.center)
            && self.radii.x.is_finite()
            && self.radii.y.is_finite()
            && self.start_angle.get().is_finite()
            && self.sweep_angle.get().is_finite()
            && self.x_rotation.get().is_finite()
    }

    /// Invokes a callback for each cubic bézier curve approximating this arc.
    ///
    /// The arc is cut in consecutive pieces of 120° followed by the remainder. Each
    /// piece becomes one curve with control points placed along the tangents at its
    /// endpoints. Nothing is produced if the arc isn't finite.
    pub fn for_each_cubic_bezier<F>(&self, cb: &mut F)
    where
        F: FnMut(&CubicBezierSegment<S>),
    {
        if !self.is_finite() {
            return;
        }

        let max_sweep = S::TWO * S::PI() / S::THREE;
        let rotation = Rotation::new(self.x_rotation);

        let mut emit = |a0: S, a1: S| {
            let curve = self.local_cubic(a0, a1).transformed(&rotation);
            cb(&CubicBezierSegment {
                from: self.center + curve.from.to_vector(),
                ctrl1: self.center + curve.ctrl1.to_vector(),
                ctrl2: self.center + curve.ctrl2.to_vector(),
                to: self.center + curve.to.to_vector(),
            });
        };

        let mut start = self.start_angle.get();
        let mut remaining = self.sweep_angle.get();

        let pieces = ((remaining.abs() - S::EPSILON) / max_sweep)
            .ceil()
            .max(S::ONE)
            .to_usize()
            .unwrap_or(1);

        for _ in 1..pieces {
            let sweep = if remaining < S::ZERO {
                -max_sweep
            } else {
                max_sweep
            };
            emit(start, start + sweep);
            start += sweep;
            remaining -= sweep;
        }

        emit(start, start + remaining);
    }

    // One cubic for the angle range `a0..a1` of the ellipse centered on the origin,
    // before rotation.
    fn local_cubic(&self, a0: S, a1: S) -> CubicBezierSegment<S> {
        let (rx, ry) = (self.radii.x, self.radii.y);
        let h = S::FOUR / S::THREE * Float::tan((a1 - a0) / S::FOUR);

        let (sin0, cos0) = Float::sin_cos(a0);
        let (sin1, cos1) = Float::sin_cos(a1);

        let from = point(rx * cos0, ry * sin0);
        let to = point(rx * cos1, ry * sin1);
        let tangent0 = vector(-rx * sin0, ry * cos0);
        let tangent1 = vector(-rx * sin1, ry * cos1);

        CubicBezierSegment {
            from,
            ctrl1: from + tangent0 * h,
            ctrl2: to - tangent1 * h,
            to,
        }
    }

    fn sample_angle(&self, angle: Angle<S>) -> Point<S> {
        let (sin, cos) = Float::sin_cos(angle.get());
        self.center
            + Rotation::new(self.x_rotation)
                .transform_vector(vector(self.radii.x * cos, self.radii.y * sin))
    }
}

fn is_finite_point<S: Scalar>(p: Point<S>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
fn svg_arc(
    from: (f64, f64),
    to: (f64, f64),
    radii: (f64, f64),
    degrees: f64,
    large_arc: bool,
    sweep: bool,
) -> SvgArc<f64> {
    SvgArc {
        from: point(from.0, from.1),
        to: point(to.0, to.1),
        radii: vector(radii.0, radii.1),
        x_rotation: Angle::degrees(degrees),
        flags: ArcFlags { large_arc, sweep },
    }
}

#[cfg(test)]
fn assert_on_ellipse(arc: &Arc<f64>, p: Point<f64>) {
    let local = Rotation::new(-arc.x_rotation).transform_vector(p - arc.center);
    let v = (local.x / arc.radii.x).powi(2) + (local.y / arc.radii.y).powi(2);
    assert!((v - 1.0).abs() < 1e-9, "{:?} is not on the ellipse ({})", p, v);
}

#[test]
fn endpoints_are_exact() {
    let arcs = [
        svg_arc((10.0, 0.0), (0.0, 10.0), (10.0, 10.0), 0.0, false, true),
        svg_arc((10.0, 0.0), (0.0, 10.0), (10.0, 10.0), 0.0, true, true),
        svg_arc((3.5, -2.0), (40.0, 17.0), (25.0, 10.0), 30.0, true, false),
        svg_arc((3.5, -2.0), (40.0, 17.0), (25.0, 10.0), -75.0, false, false),
        svg_arc((0.0, 0.0), (100.0, 0.0), (1.0, 1.0), 0.0, false, true),
    ];

    for arc in &arcs {
        let curves = arc.to_cubic_beziers();
        assert!(!curves.is_empty());
        assert!((curves[0].from - arc.from).length() < 1e-9);
        assert!((curves[curves.len() - 1].to - arc.to).length() < 1e-9);
        for pair in curves.windows(2) {
            assert!((pair[0].to - pair[1].from).length() < 1e-9);
        }
    }
}

#[test]
fn quarter_circle() {
    let arc = svg_arc((10.0, 0.0), (0.0, 10.0), (10.0, 10.0), 0.0, false, true);
    let center_arc = arc.to_arc();
    assert!((center_arc.center - point(0.0, 0.0)).length() < 1e-9);
    assert!((center_arc.sweep_angle.get() - core::f64::consts::FRAC_PI_2).abs() < 1e-9);

    let curves = arc.to_cubic_beziers();
    assert_eq!(curves.len(), 1);

    // The classic 0.5523 kappa constant for quarter circles.
    let kappa = 4.0 / 3.0 * (core::f64::consts::PI / 8.0).tan();
    assert!((curves[0].ctrl1 - point(10.0, 10.0 * kappa)).length() < 1e-9);
    assert!((curves[0].ctrl2 - point(10.0 * kappa, 10.0)).length() < 1e-9);

    let mid = curves[0].sample(0.5);
    assert!((mid.to_vector().length() - 10.0).abs() < 0.01);
}

#[test]
fn large_arc_is_split() {
    // Three quarters of a circle, going the long way around.
    let arc = svg_arc((10.0, 0.0), (0.0, 10.0), (10.0, 10.0), 0.0, true, false);
    let center_arc = arc.to_arc();
    assert!((center_arc.sweep_angle.get() + 1.5 * core::f64::consts::PI).abs() < 1e-9);

    let curves = arc.to_cubic_beziers();
    assert_eq!(curves.len(), 3);
    for curve in &curves {
        assert_on_ellipse(&center_arc, curve.to);
        assert_on_ellipse(&center_arc, curve.from);
    }
}

#[test]
fn sweep_flag_selects_direction() {
    let cw = svg_arc((0.0, 0.0), (20.0, 0.0), (10.0, 10.0), 0.0, false, true).to_arc();
    let ccw = svg_arc((0.0, 0.0), (20.0, 0.0), (10.0, 10.0), 0.0, false, false).to_arc();
    assert!(cw.sweep_angle.get() > 0.0);
    assert!(ccw.sweep_angle.get() < 0.0);
    // Half circles through opposite sides.
    assert!(cw.sample(0.5).y < 0.0);
    assert!(ccw.sample(0.5).y > 0.0);
}

#[test]
fn radii_are_scaled_up() {
    // The chord is 100 long but the radii only 1.
    let arc = svg_arc((0.0, 0.0), (100.0, 0.0), (1.0, 1.0), 0.0, false, true);
    let center_arc = arc.to_arc();
    assert!((center_arc.radii.x - 50.0).abs() < 1e-9);
    assert!((center_arc.radii.y - 50.0).abs() < 1e-9);
    assert!((center_arc.center - point(50.0, 0.0)).length() < 1e-6);
}

#[test]
fn rotated_ellipse_points() {
    let arc = svg_arc((3.5, -2.0), (40.0, 17.0), (25.0, 10.0), 30.0, true, false);
    let center_arc = arc.to_arc();
    assert_on_ellipse(&center_arc, arc.from);
    assert_on_ellipse(&center_arc, arc.to);
    for curve in &arc.to_cubic_beziers() {
        assert_on_ellipse(&center_arc, curve.to);
    }
}

#[test]
fn degenerate_arcs() {
    let straight = svg_arc((0.0, 0.0), (10.0, 5.0), (0.0, 4.0), 0.0, false, true);
    let curves = straight.to_cubic_beziers();
    assert_eq!(
        curves.as_slice(),
        &[CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 0.0),
            ctrl2: point(10.0, 5.0),
            to: point(10.0, 5.0),
        }]
    );

    let empty = svg_arc((3.0, 3.0), (3.0, 3.0), (4.0, 4.0), 0.0, false, true);
    assert!(empty.to_cubic_beziers().is_empty());
}

#[test]
fn non_finite_arcs() {
    let infinite = svg_arc((0.0, 0.0), (f64::INFINITY, 0.0), (5.0, 5.0), 0.0, false, true);
    assert!(!infinite.is_finite());
    let curves = infinite.to_cubic_beziers();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].ctrl1, curves[0].from);
    assert_eq!(curves[0].ctrl2, curves[0].to);

    let nan = svg_arc((0.0, 0.0), (1.0, 0.0), (f64::NAN, 5.0), 0.0, false, true);
    assert_eq!(nan.to_cubic_beziers().len(), 1);

    // Finite parameters overflowing in the center computation.
    let overflow = svg_arc((-1e300, 0.0), (1e300, 0.0), (1.0, 1.0), 0.0, false, true);
    assert!(overflow.is_finite());
    assert!(!overflow.to_arc().is_finite());
    assert_eq!(overflow.to_cubic_beziers().len(), 1);

    let arc = Arc {
        center: point(0.0, 0.0),
        radii: vector(1.0, 1.0),
        start_angle: Angle::radians(0.0),
        sweep_angle: Angle::radians(f64::NAN),
        x_rotation: Angle::radians(0.0),
    };
    let mut count = 0;
    arc.for_each_cubic_bezier(&mut |_| count += 1);
    assert_eq!(count, 0);
}

#[test]
fn full_sweep_piece_count() {
    let circle = Arc {
        center: point(0.0, 0.0),
        radii: vector(1.0, 1.0),
        start_angle: Angle::radians(0.0),
        sweep_angle: Angle::radians(-2.0 * core::f64::consts::PI),
        x_rotation: Angle::radians(0.0),
    };
    let mut curves = 0;
    let mut last = point(0.0, 0.0);
    circle.for_each_cubic_bezier(&mut |curve| {
        curves += 1;
        last = curve.to;
    });
    assert_eq!(curves, 3);
    assert!((last - point(1.0, 0.0)).length() < 1e-9);
}
