#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! 2D curve maths on top of euclid.
//!
//! This crate is reexported in the `gingerbread` facade crate.
//!
//! # Overview.
//!
//! This crate implements the geometry needed to turn SVG path data into
//! polygons:
//!
//! - quadratic and cubic bézier curves,
//! - elliptic arcs in SVG's endpoint parameterization and their conversion to
//!   cubic bézier curves,
//! - flattening of cubic bézier curves with a bounded error.
//!
//! # Flattening
//!
//! Flattening is the action of approximating a curve with a succession of line segments.
//!
//! The tolerance threshold taken as input by the flattening algorithm corresponds
//! to the maximum distance between the curve and its linear approximation.
//! The smaller the tolerance is, the more precise the approximation and the more segments
//! are generated.
//!
//! The cubic flattener samples the curve at a uniform parameter step derived from a
//! bound on the curve's second derivative, so the chord error of every generated
//! segment stays under the tolerance.
//!

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
pub mod cubic_bezier;
pub mod quadratic_bezier;

#[doc(inline)]
pub use crate::arc::{Arc, ArcFlags, SvgArc};
#[doc(inline)]
pub use crate::cubic_bezier::CubicBezierSegment;
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use euclid::Trig;
    pub(crate) use num_traits::{Float, FloatConst, NumCast};

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float
        + NumCast
        + FloatConst
        + Sized
        + Display
        + Debug
        + Trig
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const THREE: Self;
        const FOUR: Self;
        const SIX: Self;
        const EIGHT: Self;

        const EPSILON: Self;

        fn value(v: f32) -> Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;
        const EIGHT: Self = 8.0;

        const EPSILON: Self = 1e-4;

        #[inline]
        fn value(v: f32) -> Self {
            v
        }
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const THREE: Self = 3.0;
        const FOUR: Self = 4.0;
        const SIX: Self = 6.0;
        const EIGHT: Self = 8.0;

        const EPSILON: Self = 1e-8;

        #[inline]
        fn value(v: f32) -> Self {
            v as f64
        }
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Rotation2D`, used to orient elliptic arcs.
pub type Rotation<S> = euclid::default::Rotation2D<S>;

/// An angle in radians.
pub use euclid::Angle;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

pub mod traits {
    use crate::{Point, Rotation, Scalar, Vector};

    /// Something that maps points and vectors, applied to the control points of curves.
    pub trait Transformation<S> {
        fn transform_point(&self, p: Point<S>) -> Point<S>;
        fn transform_vector(&self, v: Vector<S>) -> Vector<S>;
    }

    impl<S: Scalar> Transformation<S> for Rotation<S> {
        #[inline]
        fn transform_point(&self, p: Point<S>) -> Point<S> {
            Rotation::transform_point(self, p)
        }

        #[inline]
        fn transform_vector(&self, v: Vector<S>) -> Vector<S> {
            Rotation::transform_vector(self, v)
        }
    }

    impl<'l, S: Scalar, T: Transformation<S>> Transformation<S> for &'l T {
        #[inline]
        fn transform_point(&self, p: Point<S>) -> Point<S> {
            (*self).transform_point(p)
        }

        #[inline]
        fn transform_vector(&self, v: Vector<S>) -> Vector<S> {
            (*self).transform_vector(v)
        }
    }
}
