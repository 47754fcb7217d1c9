//! A tree of shapes and groups.

use crate::path::{normalize, CanonicalPath, PathData};
use crate::shapes::Geometry;

use log::debug;
use once_cell::sync::OnceCell;

/// A node of the shape tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// A container, its children are visited in order.
    Group(Vec<Node>),
    Shape(Shape),
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group(children)
    }

    pub fn shape<G: Into<Geometry>>(geometry: G) -> Self {
        Node::Shape(Shape::new(geometry))
    }
}

impl From<Shape> for Node {
    fn from(shape: Shape) -> Node {
        Node::Shape(shape)
    }
}

/// A leaf of the shape tree.
///
/// The raw and canonical path data derived from the geometry are computed on first
/// use and cached. Modifying the geometry requires mutable access, which drops both
/// caches before the new geometry can be observed.
#[derive(Clone, Debug)]
pub struct Shape {
    geometry: Geometry,
    path_data: OnceCell<PathData>,
    canonical_path: OnceCell<CanonicalPath>,
}

impl Shape {
    pub fn new<G: Into<Geometry>>(geometry: G) -> Self {
        Shape {
            geometry: geometry.into(),
            path_data: OnceCell::new(),
            canonical_path: OnceCell::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_geometry<G: Into<Geometry>>(&mut self, geometry: G) {
        self.invalidate();
        self.geometry = geometry.into();
    }

    /// Mutable access to the geometry.
    ///
    /// The cached path data is dropped right away.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        self.invalidate();
        &mut self.geometry
    }

    /// The raw path data of this shape, before normalization.
    pub fn path_data(&self) -> &PathData {
        self.path_data.get_or_init(|| {
            let path = self.geometry.path_data();
            debug!(
                "cached {} path data ({} segments)",
                self.geometry.element_name(),
                path.len()
            );
            path
        })
    }

    /// The canonical path data of this shape.
    pub fn canonical_path(&self) -> &CanonicalPath {
        self.canonical_path.get_or_init(|| {
            let path = normalize(self.path_data());
            debug!(
                "cached {} canonical path ({} segments)",
                self.geometry.element_name(),
                path.len()
            );
            path
        })
    }

    /// Whether the canonical path data is currently cached.
    pub fn is_cached(&self) -> bool {
        self.canonical_path.get().is_some()
    }

    fn invalidate(&mut self) {
        let path_data = self.path_data.take();
        let canonical_path = self.canonical_path.take();
        if path_data.is_some() || canonical_path.is_some() {
            debug!("invalidated {} path data", self.geometry.element_name());
        }
    }
}

#[cfg(test)]
use crate::shapes::{Circle, Rect};

#[test]
fn cache_is_filled_on_demand() {
    let shape = Shape::new(Circle::new(0.0, 0.0, 5.0));
    assert!(!shape.is_cached());

    let canonical = shape.canonical_path().clone();
    assert!(shape.is_cached());
    assert!(canonical.to_path_data().is_canonical());
    assert_eq!(shape.path_data(), &Circle::new(0.0, 0.0, 5.0).path_data());

    // Same cached value.
    assert!(std::ptr::eq(shape.canonical_path(), shape.canonical_path()));
}

#[test]
fn cache_is_invalidated() {
    let mut shape = Shape::new(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(shape.path_data().to_string(), "M 0 0 H 10 V 10 H 0 V 0 Z");
    shape.canonical_path();

    shape.set_geometry(Rect::new(0.0, 0.0, 20.0, 10.0));
    assert!(!shape.is_cached());
    assert_eq!(shape.path_data().to_string(), "M 0 0 H 20 V 10 H 0 V 0 Z");

    shape.canonical_path();
    if let Geometry::Rect(rect) = shape.geometry_mut() {
        rect.height = 5.0;
    }
    assert!(!shape.is_cached());
    assert_eq!(
        shape.canonical_path().to_string(),
        "M 0 0 L 20 0 L 20 5 L 0 5 L 0 0 Z"
    );
}
