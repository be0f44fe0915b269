//! # padkit core
//!
//! Geometry kernel for parametric layout generation: points, boxes,
//! rectangles and polygons, placement transforms, layers, typed ports and
//! hierarchical components with (array) references and flattening.

pub mod component;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod port;

pub use component::{ArrayPlacement, Component, ComponentId, ComponentRef, ComponentSettings};
pub use error::LayoutError;
pub use geometry::{BBox, GeomPrimitive, Point, Polygon, Rect, Transform};
pub use layer::{Layer, LayerColor, LayerId, LayerStack};
pub use port::{Orientation, Port, PortType};

/// A (width, height) pair in microns.
pub type Size = (f64, f64);
