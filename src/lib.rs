#![deny(bare_trait_objects)]

//! SVG path data processing in Rust: parsing, normalization and flattening of paths
//! and basic shapes into polygonal contours.
//!
//! # Crates
//!
//! This meta-crate (`gingerbread`) reexports the following sub-crates for convenience:
//!
//! * **gingerbread_geom** - cubic and quadratic bézier curves, SVG arcs and curve
//!   flattening.
//! * **gingerbread_path** - path data parsing, normalization to a canonical form and
//!   splitting into subpaths.
//! * **gingerbread_svg** - SVG basic shapes, shape trees and contour extraction.
//!
//! Each `gingerbread_<name>` crate is reexported as a `<name>` module in `gingerbread`.
//! For example:
//!
//! ```ignore
//! extern crate gingerbread_path;
//! use gingerbread_path::PathData;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate gingerbread;
//! use gingerbread::path::PathData;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Examples
//!
//! ## Normalizing path data
//!
//! ```
//! use gingerbread::path::{normalize, PathData};
//!
//! let path = PathData::parse("m 10 10 h 20 v 10 z m 5 5 q 10 0 10 10");
//! let canonical = normalize(&path);
//!
//! assert!(canonical.to_path_data().is_canonical());
//! assert!(canonical.to_string().starts_with("M 10 10 L 30 10 L 30 20 Z M 15 15 C "));
//! assert_eq!(canonical.subpaths().count(), 2);
//! ```
//!
//! ## Extracting contours from shapes
//!
//! ```
//! use gingerbread::svg::shapes::{Circle, Rect};
//! use gingerbread::svg::{to_paths_with_options, FlattenOptions, Node};
//!
//! let root = Node::group(vec![
//!     Node::shape(Rect::new(0.0, 0.0, 100.0, 50.0).with_radii(Some(10.0), None)),
//!     Node::shape(Circle::new(50.0, 25.0, 10.0)),
//! ]);
//!
//! let options = FlattenOptions::tolerance(0.1);
//! for contour in to_paths_with_options(&root, &options) {
//!     println!(" -- {} points, closed: {}", contour.len(), contour.closed);
//! }
//! ```

pub use gingerbread_geom as geom;
pub use gingerbread_path as path;
pub use gingerbread_svg as svg;

pub use crate::path::math;
