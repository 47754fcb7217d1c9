use crate::scalar::Scalar;
use crate::traits::Transformation;
use crate::{Point, Vector};

#[cfg(test)]
use std::vec::Vec;

/// Upper bound of the number of segments a curve is flattened into.
pub const MAX_FLATTENING_STEPS: f32 = 65536.0;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: S) -> Vector<S> {
        let t2 = t * t;
        let c0 = -S::THREE * t2 + S::SIX * t - S::THREE;
        let c1 = S::value(9.0) * t2 - S::value(12.0) * t + S::THREE;
        let c2 = -S::value(9.0) * t2 + S::SIX * t;
        let c3 = S::THREE * t2;

        self.from.to_vector() * c0
            + self.ctrl1.to_vector() * c1
            + self.ctrl2.to_vector() * c2
            + self.to.to_vector() * c3
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// Applies the transform to this curve and returns the results.
    #[inline]
    pub fn transformed<T: Transformation<S>>(&self, transform: &T) -> Self {
        CubicBezierSegment {
            from: transform.transform_point(self.from),
            ctrl1: transform.transform_point(self.ctrl1),
            ctrl2: transform.transform_point(self.ctrl2),
            to: transform.transform_point(self.to),
        }
    }

    /// An upper bound of the magnitude of the curve's second derivative over `[0, 1]`.
    ///
    /// The second derivative of a cubic bézier curve is a linear interpolation of
    /// `6 * (from - 2 * ctrl1 + ctrl2)` and `6 * (ctrl1 - 2 * ctrl2 + to)`, so its
    /// magnitude is bounded by the largest of the two.
    pub fn second_derivative_bound(&self) -> S {
        let d0 = self.from.to_vector() - self.ctrl1.to_vector() * S::TWO + self.ctrl2.to_vector();
        let d1 = self.ctrl1.to_vector() - self.ctrl2.to_vector() * S::TWO + self.to.to_vector();

        S::SIX * d0.square_length().max(d1.square_length()).sqrt()
    }

    /// The uniform parameter step used when flattening this curve with a given tolerance.
    ///
    /// A chord spanning a parameter interval `h` deviates from the curve by at most
    /// `dd * h² / 8` where `dd` is the second derivative bound, so picking
    /// `h = sqrt(8 * tolerance / dd)` keeps the error under the tolerance.
    /// Curves with a flat control polygon have `dd = 0` and are approximated by a single
    /// segment.
    ///
    /// The step never goes below `1 / MAX_FLATTENING_STEPS`, past which the tolerance
    /// is no longer guaranteed. If the bound overflows, the curve is approximated by a
    /// single segment.
    pub fn flattening_step(&self, tolerance: S) -> S {
        let dd = self.second_derivative_bound();
        if !dd.is_finite() {
            return S::ONE;
        }

        let eight_tolerance = S::EIGHT * tolerance;
        let e2 = if eight_tolerance < dd {
            eight_tolerance / dd
        } else {
            S::ONE
        };

        // Float::max also replaces NaN.
        e2.sqrt().max(S::ONE / S::value(MAX_FLATTENING_STEPS))
    }

    /// Returns the flattened representation of the curve as an iterator.
    ///
    /// The iterator yields the curve's start point, then one point per parameter step and
    /// finally the exact end point of the curve. It never yields fewer than two points.
    pub fn flattened(&self, tolerance: S) -> Flattened<S> {
        Flattened::new(self, tolerance)
    }

    /// Iterates through the curve invoking a callback at each point of its flattened
    /// representation.
    pub fn for_each_flattened<F: FnMut(Point<S>)>(&self, tolerance: S, callback: &mut F) {
        for p in self.flattened(tolerance) {
            callback(p);
        }
    }
}

/// Flattening iterator for cubic bézier curves.
///
/// Created with [`CubicBezierSegment::flattened`]. The iterator owns a copy of the
/// curve; restarting it means creating a new one.
#[derive(Clone, Debug)]
pub struct Flattened<S> {
    curve: CubicBezierSegment<S>,
    step: S,
    index: S,
    done: bool,
}

impl<S: Scalar> Flattened<S> {
    pub(crate) fn new(curve: &CubicBezierSegment<S>, tolerance: S) -> Self {
        // Float::max also replaces NaN, which would otherwise stall the iterator.
        let tolerance = tolerance.max(S::EPSILON * S::EPSILON);

        Flattened {
            curve: *curve,
            step: curve.flattening_step(tolerance),
            index: S::ZERO,
            done: false,
        }
    }
}

impl<S: Scalar> Iterator for Flattened<S> {
    type Item = Point<S>;

    fn next(&mut self) -> Option<Point<S>> {
        if self.done {
            return None;
        }

        let t = self.index * self.step;
        if t < S::ONE {
            self.index += S::ONE;
            return Some(self.curve.sample(t));
        }

        // Always finish exactly on the endpoint.
        self.done = true;
        Some(self.curve.to)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }

        let remaining = ((S::ONE - self.index * self.step) / self.step)
            .ceil()
            .max(S::ZERO)
            .to_usize()
            .unwrap_or(0);

        // Rounding of `index * step` near 1.0 can shift the count by one either way.
        (remaining.max(1), Some(remaining + 2))
    }
}

#[cfg(test)]
fn distance_to_segment(p: Point<f64>, a: Point<f64>, b: Point<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.square_length();
    if len2 == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len2).max(0.0).min(1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
fn max_deviation(curve: &CubicBezierSegment<f64>, tolerance: f64) -> f64 {
    // Each polyline segment covers a known parameter range, so the curve is sampled
    // densely inside that range and compared against its own chord.
    let step = curve.flattening_step(tolerance);
    let points: Vec<Point<f64>> = curve.flattened(tolerance).collect();
    let mut max = 0.0f64;
    for i in 0..points.len() - 1 {
        let t0 = step * i as f64;
        let t1 = (step * (i + 1) as f64).min(1.0);
        for j in 0..=64 {
            let t = t0 + (t1 - t0) * j as f64 / 64.0;
            let d = distance_to_segment(curve.sample(t), points[i], points[i + 1]);
            max = max.max(d);
        }
    }
    max
}

#[test]
fn flatten_ends_on_endpoint() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(10.0, 30.0),
        ctrl2: Point::new(50.0, -20.0),
        to: Point::new(60.0, 10.0),
    };

    let points: Vec<Point<f64>> = curve.flattened(0.25).collect();
    assert!(points.len() > 2);
    assert_eq!(points[0], curve.from);
    assert_eq!(*points.last().unwrap(), curve.to);
}

#[test]
fn flatten_degenerate_curve() {
    // A flat control polygon has a null second derivative.
    let curve = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(1.0, 1.0),
        ctrl2: Point::new(2.0, 2.0),
        to: Point::new(3.0, 3.0),
    };

    assert_eq!(curve.second_derivative_bound(), 0.0);
    let points: Vec<Point<f64>> = curve.flattened(0.25).collect();
    assert_eq!(points, [curve.from, curve.to]);

    let point = CubicBezierSegment {
        from: Point::new(5.0f32, 5.0),
        ctrl1: Point::new(5.0, 5.0),
        ctrl2: Point::new(5.0, 5.0),
        to: Point::new(5.0, 5.0),
    };
    assert_eq!(point.flattened(0.1).count(), 2);
}

#[test]
fn flatten_error_is_bounded() {
    let curves = [
        CubicBezierSegment {
            from: Point::new(0.0, 0.0),
            ctrl1: Point::new(0.0, 100.0),
            ctrl2: Point::new(100.0, 100.0),
            to: Point::new(100.0, 0.0),
        },
        CubicBezierSegment {
            from: Point::new(141.0, 135.0),
            ctrl1: Point::new(141.0, 130.0),
            ctrl2: Point::new(140.0, 130.0),
            to: Point::new(131.0, 130.0),
        },
        CubicBezierSegment {
            from: Point::new(-20.0, 3.0),
            ctrl1: Point::new(400.0, 12.0),
            ctrl2: Point::new(-300.0, 40.0),
            to: Point::new(15.0, -7.0),
        },
    ];

    for tolerance in [1.0, 0.25, 0.01] {
        for curve in &curves {
            let err = max_deviation(curve, tolerance);
            assert!(err <= tolerance, "error {} > tolerance {}", err, tolerance);
        }
    }
}

#[test]
fn flatten_count_follows_tolerance() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(0.0, 100.0),
        ctrl2: Point::new(100.0, 100.0),
        to: Point::new(100.0, 0.0),
    };

    let coarse = curve.flattened(1.0).count();
    let fine = curve.flattened(0.01).count();
    assert!(fine > coarse);

    let iter = curve.flattened(0.25);
    let (lower, upper) = iter.size_hint();
    let count = iter.clone().count();
    assert!(lower <= count);
    assert!(count <= upper.unwrap());
}

#[test]
fn flatten_is_restartable() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(1.0, 3.0),
        ctrl2: Point::new(11.0, 14.0),
        to: Point::new(11.0, 12.0),
    };

    let a: Vec<Point<f64>> = curve.flattened(0.05).collect();
    let b: Vec<Point<f64>> = curve.flattened(0.05).collect();
    assert_eq!(a, b);

    let mut c = Vec::new();
    curve.for_each_flattened(0.05, &mut |p| c.push(p));
    assert_eq!(a, c);
}

#[test]
fn flatten_nan_tolerance_terminates() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0f32, 0.0),
        ctrl1: Point::new(1.0, 0.0),
        ctrl2: Point::new(1.0, 1.0),
        to: Point::new(0.0, 1.0),
    };

    assert!(curve.flattened(f32::NAN).count() >= 2);
}

#[test]
fn flatten_overflowing_curve_terminates() {
    // The second derivative bound overflows although every coordinate is finite.
    let curve: CubicBezierSegment<f64> = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(1e200, 0.0),
        ctrl2: Point::new(0.0, 0.0),
        to: Point::new(1.0, 1.0),
    };

    assert!(!curve.second_derivative_bound().is_finite());
    assert_eq!(curve.flattening_step(0.25), 1.0);
    let points: Vec<Point<f64>> = curve.flattened(0.25).collect();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0], curve.from);
    assert_eq!(points[1], curve.to);
}

#[test]
fn flatten_huge_curve_is_bounded() {
    let curve = CubicBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl1: Point::new(1e15, 0.0),
        ctrl2: Point::new(-1e15, 1e15),
        to: Point::new(1.0, 1.0),
    };

    let step = curve.flattening_step(0.01);
    assert_eq!(step, 1.0 / MAX_FLATTENING_STEPS as f64);
    let count = curve.flattened(0.01).count();
    assert!(count <= MAX_FLATTENING_STEPS as usize + 2, "{}", count);
    assert!(count >= MAX_FLATTENING_STEPS as usize);
}
