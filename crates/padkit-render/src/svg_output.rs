use padkit_core::{Component, LayerStack, PortType};
use svg::node::element::path::Data;
use svg::node::element::{Circle, Group, Line, Path, Rectangle};
use svg::Document;

use crate::render_data::{RenderFrame, RenderPort};
use crate::viewport::Viewport;

const STROKE_WIDTH: f64 = 1.0;
const PORT_RADIUS: f64 = 3.0;
/// Length of the orientation tick drawn at each port, in pixels.
const PORT_TICK: f64 = 12.0;

fn port_color(port_type: PortType) -> &'static str {
    match port_type {
        PortType::Electrical => "#d62728",
        PortType::Optical => "#1f77b4",
        PortType::Pad => "#2ca02c",
    }
}

/// Serialize a render frame as a standalone SVG document.
pub fn frame_to_svg(frame: &RenderFrame) -> String {
    let vp = &frame.viewport;
    let mut document = Document::new()
        .set("viewBox", (0, 0, vp.canvas_width, vp.canvas_height))
        .set("width", format!("{}px", vp.canvas_width))
        .set("height", format!("{}px", vp.canvas_height))
        .set("data-cell", frame.name.as_str());

    document = document.add(
        Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", "white"),
    );

    for layer in &frame.layers {
        let mut group = Group::new()
            .set("data-layer", layer.layer.to_string())
            .set("data-name", layer.name.as_str())
            .set("fill", layer.color.as_str())
            .set("fill-opacity", 0.5)
            .set("stroke", layer.color.as_str())
            .set("stroke-width", STROKE_WIDTH);

        for polygon in &layer.polygons {
            let mut data = Data::new();
            for (i, xy) in polygon.vertices.chunks_exact(2).enumerate() {
                let (x, y) = vp.layout_to_screen(&padkit_core::Point::new(xy[0], xy[1]));
                data = if i == 0 {
                    data.move_to((x, y))
                } else {
                    data.line_to((x, y))
                };
            }
            group = group.add(Path::new().set("d", data.close()));
        }
        document = document.add(group);
    }

    let mut ports = Group::new().set("class", "ports");
    for port in &frame.ports {
        ports = ports.add(port_marker(port, vp));
    }
    document.add(ports).to_string()
}

fn port_marker(port: &RenderPort, vp: &Viewport) -> Group {
    let (x, y) = vp.layout_to_screen(&padkit_core::Point::new(port.x, port.y));
    let angle = port.orientation.to_radians();
    // Screen y grows downward.
    let (tx, ty) = (x + PORT_TICK * angle.cos(), y - PORT_TICK * angle.sin());
    let color = port_color(port.port_type);

    Group::new()
        .set("data-port", port.name.as_str())
        .set("stroke", color)
        .set("stroke-width", STROKE_WIDTH * 2.0)
        .add(
            Circle::new()
                .set("cx", x)
                .set("cy", y)
                .set("r", PORT_RADIUS)
                .set("fill", color),
        )
        .add(
            Line::new()
                .set("x1", x)
                .set("y1", y)
                .set("x2", tx)
                .set("y2", ty),
        )
}

/// Render `component` onto a `width` x `height` canvas.
pub fn component_svg(component: &Component, stack: &LayerStack, width: f64, height: f64) -> String {
    frame_to_svg(&RenderFrame::from_component(component, stack, (width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use padkit_core::{Layer, LayerId, Orientation, Point, Port, Rect};

    #[test]
    fn test_svg_has_one_path_per_polygon() {
        let mut stack = LayerStack::new();
        stack.add_layer(Layer::new("MTOP", 49, 0).with_color(230, 190, 60));
        let mut c = Component::new("pads");
        c.add_rect(Rect::new(LayerId::new(49, 0), 0.0, 0.0, 10.0, 10.0));
        c.add_rect(Rect::new(LayerId::new(49, 0), 20.0, 0.0, 30.0, 10.0));
        c.add_port(Port::new(
            "pad",
            Point::new(5.0, 5.0),
            10.0,
            Orientation::North,
            LayerId::new(49, 0),
            PortType::Pad,
        ))
        .unwrap();

        let svg = component_svg(&c, &stack, 300.0, 200.0);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("viewBox=\"0 0 300 200\""));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("data-name=\"MTOP\""));
        assert!(svg.contains("#e6be3c"));
        assert!(svg.contains("data-port=\"pad\""));
    }

    #[test]
    fn test_empty_svg() {
        let svg = component_svg(&Component::new("empty"), &LayerStack::new(), 100.0, 100.0);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains("data-cell=\"empty\""));
    }
}
