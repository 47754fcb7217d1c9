#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]

//! Data structures and algorithms to work with SVG path data.
//!
//! Path data goes through three forms:
//!
//! - the raw form produced by the [parser](parser/index.html), which keeps every
//!   command of the SVG path syntax including relative and shorthand forms,
//! - the absolute form produced by [`absolutize`],
//! - the canonical form produced by [`reduce`], made of move-to, line-to, cubic
//!   bézier and close segments only.
//!
//! Canonical path data is then cut into continuous [subpaths](split/index.html).
//!
//! This crate is reexported in the `gingerbread` facade crate.
//!
//! # Examples
//!
//! ```
//! # extern crate gingerbread_path;
//! # fn main() {
//! use gingerbread_path::{normalize, PathData};
//!
//! let path = PathData::parse("M0 0 Q5 10 10 0 z");
//! let canonical = normalize(&path);
//!
//! for subpath in canonical.subpaths() {
//!     println!("{:?}", subpath);
//! }
//!
//! // Canonical path data serializes back to a minimal path string.
//! println!("{}", canonical);
//! # }
//! ```
//!

pub use gingerbread_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod error;
pub mod normalize;
pub mod parser;
mod path_data;
mod segment;
pub mod split;

#[doc(inline)]
pub use crate::error::PathError;
pub use crate::geom::ArcFlags;
#[doc(inline)]
pub use crate::normalize::{absolutize, normalize, reduce, CanonicalPath, CanonicalSegment};
#[doc(inline)]
pub use crate::parser::{parse, ParseError};
pub use crate::path_data::PathData;
pub use crate::segment::Segment;
#[doc(inline)]
pub use crate::split::{Edge, Subpath, Subpaths};

pub mod math {
    //! f64 version of the gingerbread_geom types used for path data.

    use crate::geom::euclid;

    /// Alias for ```euclid::default::Point2D<f64>```.
    pub type Point = euclid::default::Point2D<f64>;

    /// Alias for ```euclid::default::Vector2D<f64>```.
    pub type Vector = euclid::default::Vector2D<f64>;

    /// An angle in radians (f64).
    pub type Angle = euclid::Angle<f64>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }
}
