use std::collections::BTreeMap;

use padkit_core::{Component, LayerColor, LayerId, LayerStack, PortType, Transform};
use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// Render data for a single layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderLayer {
    pub layer: LayerId,
    pub name: String,
    /// CSS hex color.
    pub color: String,
    pub polygons: Vec<RenderPolygon>,
}

/// A polygon outline in layout coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPolygon {
    /// Flat array of vertices: [x0, y0, x1, y1, ...]
    pub vertices: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPort {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Degrees.
    pub orientation: f64,
    pub port_type: PortType,
    pub layer: LayerId,
}

/// Everything needed to draw one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub name: String,
    pub layers: Vec<RenderLayer>,
    pub ports: Vec<RenderPort>,
    pub viewport: Viewport,
    /// [min_x, min_y, max_x, max_y]
    pub bbox: Option<[f64; 4]>,
}

impl RenderFrame {
    pub fn empty(name: &str, viewport: Viewport) -> Self {
        Self {
            name: name.to_string(),
            layers: Vec::new(),
            ports: Vec::new(),
            viewport,
            bbox: None,
        }
    }

    /// Flatten `component` into per-layer polygons, ordered by GDS layer, and
    /// fit `canvas` to its bounding box.
    pub fn from_component(component: &Component, stack: &LayerStack, canvas: (f64, f64)) -> Self {
        let bbox = component.bbox();
        let viewport = Viewport::fitted(canvas.0, canvas.1, bbox);
        let mut frame = Self::empty(&component.name, viewport);
        frame.bbox = bbox.map(|bb| [bb.min.x, bb.min.y, bb.max.x, bb.max.y]);

        let mut by_layer: BTreeMap<LayerId, Vec<RenderPolygon>> = BTreeMap::new();
        for shape in component.shapes_under(&Transform::default()) {
            let vertices = shape.vertices().iter().flat_map(|p| [p.x, p.y]).collect();
            by_layer
                .entry(shape.layer())
                .or_default()
                .push(RenderPolygon { vertices });
        }

        frame.layers = by_layer
            .into_iter()
            .map(|(id, polygons)| {
                let (name, color) = match stack.get_layer_by_id(id) {
                    Some(layer) => (layer.name.clone(), layer.color),
                    None => (id.to_string(), LayerColor::default()),
                };
                RenderLayer {
                    layer: id,
                    name,
                    color: color.to_hex(),
                    polygons,
                }
            })
            .collect();

        frame.ports = component
            .ports()
            .iter()
            .map(|p| RenderPort {
                name: p.name.clone(),
                x: p.center.x,
                y: p.center.y,
                width: p.width,
                orientation: p.orientation.degrees(),
                port_type: p.port_type,
                layer: p.layer,
            })
            .collect();

        log::debug!(
            "Render frame for '{}': {} layers, {} ports",
            frame.name,
            frame.layers.len(),
            frame.ports.len()
        );
        frame
    }

    pub fn polygon_count(&self) -> usize {
        self.layers.iter().map(|l| l.polygons.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padkit_core::{Layer, Orientation, Point, Port, Rect};
    use std::sync::Arc;

    fn stack() -> LayerStack {
        let mut stack = LayerStack::new();
        stack.add_layer(Layer::new("M1", 41, 0).with_color(0, 180, 180));
        stack
    }

    #[test]
    fn test_frame_groups_by_layer() {
        let mut child = Component::new("child");
        child.add_rect(Rect::new(LayerId::new(41, 0), 0.0, 0.0, 1.0, 1.0));
        let mut c = Component::new("top");
        c.add_rect(Rect::new(LayerId::new(99, 1), 0.0, 0.0, 4.0, 2.0));
        c.add_ref(Arc::new(child)).movex(10.0);
        c.add_port(Port::new(
            "e1",
            Point::new(11.0, 0.5),
            1.0,
            Orientation::East,
            LayerId::new(41, 0),
            PortType::Electrical,
        ))
        .unwrap();

        let frame = RenderFrame::from_component(&c, &stack(), (800.0, 600.0));
        assert_eq!(frame.name, "top");
        assert_eq!(frame.polygon_count(), 2);
        assert_eq!(frame.layers[0].name, "M1");
        assert_eq!(frame.layers[0].color, "#00b4b4");
        assert_eq!(frame.layers[0].polygons[0].vertices[0], 10.0);
        assert_eq!(frame.layers[1].name, "99/1");
        assert_eq!(frame.ports.len(), 1);
        assert_eq!(frame.ports[0].orientation, 0.0);
        assert_eq!(frame.bbox, Some([0.0, 0.0, 11.0, 2.0]));
    }

    #[test]
    fn test_empty_component() {
        let frame = RenderFrame::from_component(&Component::new("empty"), &stack(), (100.0, 100.0));
        assert!(frame.layers.is_empty());
        assert!(frame.bbox.is_none());
        assert_eq!(frame.viewport.zoom, 1.0);
    }
}
