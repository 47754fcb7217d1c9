use crate::scalar::Scalar;
use crate::{CubicBezierSegment, Point};

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from * one_t2 + self.ctrl.to_vector() * S::TWO * one_t * t + self.to.to_vector() * t2
    }

    /// Elevate this curve to a third order bézier.
    ///
    /// Each cubic control point sits two thirds of the way from an endpoint to the
    /// quadratic control point, which describes exactly the same curve.
    pub fn to_cubic(&self) -> CubicBezierSegment<S> {
        let two_thirds = S::TWO / S::THREE;
        CubicBezierSegment {
            from: self.from,
            ctrl1: self.from + (self.ctrl - self.from) * two_thirds,
            ctrl2: self.to + (self.ctrl - self.to) * two_thirds,
            to: self.to,
        }
    }
}

#[test]
fn elevation_preserves_the_curve() {
    let quadratic: QuadraticBezierSegment<f64> = QuadraticBezierSegment {
        from: Point::new(0.0, 0.0),
        ctrl: Point::new(5.0, 10.0),
        to: Point::new(10.0, 0.0),
    };

    let cubic = quadratic.to_cubic();
    assert!((cubic.ctrl1.x - 10.0 / 3.0).abs() < 1e-12);
    assert!((cubic.ctrl1.y - 20.0 / 3.0).abs() < 1e-12);
    assert!((cubic.ctrl2.x - 20.0 / 3.0).abs() < 1e-12);
    assert!((cubic.ctrl2.y - 20.0 / 3.0).abs() < 1e-12);

    for i in 0..=10 {
        let t = i as f64 / 10.0;
        let a = quadratic.sample(t);
        let b = cubic.sample(t);
        assert!((a - b).length() < 1e-9);
    }
}
