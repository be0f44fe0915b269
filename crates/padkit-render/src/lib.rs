//! # padkit renderer
//!
//! Turns a component into drawable data: a viewport fitted to its bounding
//! box, flattened polygons grouped by layer with their display colors, port
//! markers, and an SVG serialization of the lot for the web viewer.

pub mod render_data;
pub mod svg_output;
pub mod viewport;

pub use render_data::{RenderFrame, RenderLayer, RenderPolygon, RenderPort};
pub use svg_output::{component_svg, frame_to_svg};
pub use viewport::Viewport;
