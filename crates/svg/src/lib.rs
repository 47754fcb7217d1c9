#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! SVG basic shapes and the extraction of polygonal contours from a tree of shapes.
//!
//! - The [shapes](shapes/index.html) module turns the geometry attributes of the SVG
//!   basic shapes into path data.
//! - The [tree](tree/index.html) module holds shapes and groups, and caches the path
//!   data derived from each shape.
//! - The [pipeline](pipeline/index.html) module walks a tree and flattens every
//!   shape into [`Contour`]s.
//!
//! This crate is reexported in the `gingerbread` facade crate.
//!
//! # Examples
//!
//! ```
//! # extern crate gingerbread_svg;
//! # fn main() {
//! use gingerbread_svg::shapes::{Circle, Rect};
//! use gingerbread_svg::{to_paths, Node};
//!
//! let root = Node::group(vec![
//!     Node::shape(Rect::new(0.0, 0.0, 10.0, 5.0)),
//!     Node::shape(Circle::new(20.0, 20.0, 5.0)),
//! ]);
//!
//! for contour in to_paths(&root) {
//!     println!("{} points, closed: {}", contour.len(), contour.closed);
//! }
//! # }
//! ```

pub use gingerbread_path as path;
pub use gingerbread_path::geom;
pub use gingerbread_path::math;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod pipeline;
pub mod shapes;
pub mod tree;

#[doc(inline)]
pub use crate::pipeline::{to_paths, to_paths_with_options, Contour, Contours, FlattenOptions};
#[doc(inline)]
pub use crate::shapes::Geometry;
#[doc(inline)]
pub use crate::tree::{Node, Shape};
