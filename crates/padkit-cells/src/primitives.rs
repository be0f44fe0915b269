//! Rectangles with compass ports, the building block of every other cell.

use std::sync::Arc;

use padkit_core::{Component, LayerId, Orientation, Point, Port, PortType, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::error::{CellError, Result};
use crate::params::{build, CellParams};
use crate::pdk::{LayerSpec, Pdk};

/// Database grid in microns. Shape sizes snap to twice the grid so that
/// centered shapes keep on-grid edges.
pub const GRID: f64 = 0.001;

pub fn snap_to_grid2x(value: f64) -> f64 {
    let steps = 1.0 / (2.0 * GRID);
    (value * steps).round() / steps
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompassParams {
    pub size: Size,
    pub layer: LayerSpec,
    /// `None` adds no ports.
    pub port_type: Option<PortType>,
    /// Distance the ports are pulled inward from the edges.
    pub port_inclusion: f64,
    pub port_orientations: Option<Vec<Orientation>>,
}

impl Default for CompassParams {
    fn default() -> Self {
        Self {
            size: (4.0, 2.0),
            layer: "WG".into(),
            port_type: Some(PortType::Electrical),
            port_inclusion: 0.0,
            port_orientations: Some(vec![
                Orientation::West,
                Orientation::North,
                Orientation::East,
                Orientation::South,
            ]),
        }
    }
}

impl CellParams for CompassParams {
    const FUNCTION: &'static str = "compass";

    fn draw(&self, pdk: &Pdk) -> Result<Component> {
        let (dx, dy) = (snap_to_grid2x(self.size.0), snap_to_grid2x(self.size.1));
        if dx <= 0.0 || dy <= 0.0 {
            return Err(CellError::InvalidParameter(format!(
                "compass size ({dx}, {dy}) must be positive"
            )));
        }
        let layer = pdk.get_layer(&self.layer)?;

        let mut c = Component::new(Self::FUNCTION);
        c.add_rect(Rect::centered(layer, dx, dy));

        if let Some(port_type) = self.port_type {
            let orientations = self.port_orientations.as_deref().unwrap_or_default();
            c.add_ports(compass_ports(
                (dx, dy),
                layer,
                port_type,
                self.port_inclusion,
                orientations,
            ))?;
        }
        Ok(c)
    }
}

/// Edge-midpoint ports of a centered `size` rectangle, numbered
/// West 1, North 2, East 3, South 4 whatever order they are requested in.
pub fn compass_ports(
    size: Size,
    layer: LayerId,
    port_type: PortType,
    inclusion: f64,
    orientations: &[Orientation],
) -> Vec<Port> {
    let prefix = match port_type {
        PortType::Optical => "o",
        PortType::Electrical | PortType::Pad => "e",
    };
    let (dx, dy) = size;
    let mut ports = Vec::new();
    for (index, orientation) in [
        Orientation::West,
        Orientation::North,
        Orientation::East,
        Orientation::South,
    ]
    .into_iter()
    .enumerate()
    {
        if !orientations.contains(&orientation) {
            continue;
        }
        let (center, width) = match orientation {
            Orientation::West => (Point::new(-dx / 2.0 + inclusion, 0.0), dy),
            Orientation::North => (Point::new(0.0, dy / 2.0 - inclusion), dx),
            Orientation::East => (Point::new(dx / 2.0 - inclusion, 0.0), dy),
            Orientation::South => (Point::new(0.0, -dy / 2.0 + inclusion), dx),
        };
        ports.push(Port::new(
            &format!("{prefix}{}", index + 1),
            center,
            width,
            orientation,
            layer,
            port_type,
        ));
    }
    ports
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RectangleParams {
    pub size: Size,
    pub layer: LayerSpec,
    /// Center on the origin instead of putting the lower-left corner there.
    pub centered: bool,
    pub port_type: Option<PortType>,
    pub port_orientations: Option<Vec<Orientation>>,
}

impl Default for RectangleParams {
    fn default() -> Self {
        let compass = CompassParams::default();
        Self {
            size: compass.size,
            layer: compass.layer,
            centered: false,
            port_type: compass.port_type,
            port_orientations: compass.port_orientations,
        }
    }
}

impl RectangleParams {
    pub fn new(size: Size, layer: LayerId) -> Self {
        Self {
            size,
            layer: layer.into(),
            ..Default::default()
        }
    }
}

impl CellParams for RectangleParams {
    const FUNCTION: &'static str = "rectangle";

    fn draw(&self, pdk: &Pdk) -> Result<Component> {
        let compass = build(
            &CompassParams {
                size: self.size,
                layer: self.layer.clone(),
                port_type: self.port_type,
                port_inclusion: 0.0,
                port_orientations: self.port_orientations.clone(),
            },
            pdk,
        )?;
        let (dx, dy) = compass.size();

        let mut c = Component::new(Self::FUNCTION);
        let reference = c.add_ref(Arc::new(compass));
        if !self.centered {
            reference.move_by(dx / 2.0, dy / 2.0);
        }
        let ports = reference.ports();
        c.add_ports(ports)?;
        Ok(c)
    }
}

pub fn rectangle(params: &RectangleParams, pdk: &Pdk) -> Result<Component> {
    build(params, pdk)
}

pub fn compass(params: &CompassParams, pdk: &Pdk) -> Result<Component> {
    build(params, pdk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid2x() {
        assert_eq!(snap_to_grid2x(100.0), 100.0);
        assert!((snap_to_grid2x(1.0004) - 1.0).abs() < 1e-12);
        assert!((snap_to_grid2x(18.9601) - 18.96).abs() < 1e-12);
    }

    #[test]
    fn test_compass_ports_at_edge_midpoints() {
        let pdk = Pdk::generic();
        let params = CompassParams {
            size: (10.0, 6.0),
            port_inclusion: 1.0,
            ..Default::default()
        };
        let c = compass(&params, &pdk).unwrap();
        assert_eq!(c.ports().len(), 4);
        let west = c.port("e1").unwrap();
        assert_eq!(west.orientation, Orientation::West);
        assert_eq!(west.center, Point::new(-4.0, 0.0));
        assert_eq!(west.width, 6.0);
        let north = c.port("e2").unwrap();
        assert_eq!(north.center, Point::new(0.0, 2.0));
        assert_eq!(north.width, 10.0);
    }

    #[test]
    fn test_compass_rejects_non_positive_size() {
        let pdk = Pdk::generic();
        let params = CompassParams {
            size: (0.0, 2.0),
            ..Default::default()
        };
        assert!(matches!(
            compass(&params, &pdk),
            Err(CellError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_optical_compass_prefix() {
        let pdk = Pdk::generic();
        let params = CompassParams {
            port_type: Some(PortType::Optical),
            port_orientations: Some(vec![Orientation::East]),
            ..Default::default()
        };
        let c = compass(&params, &pdk).unwrap();
        assert_eq!(c.ports().len(), 1);
        assert_eq!(c.ports()[0].name, "o3");
    }

    #[test]
    fn test_rectangle_lower_left_at_origin() {
        let pdk = Pdk::generic();
        let c = rectangle(&RectangleParams::new((8.0, 2.0), LayerId::new(41, 0)), &pdk).unwrap();
        let bb = c.bbox().unwrap();
        assert_eq!(bb.min, Point::new(0.0, 0.0));
        assert_eq!(bb.max, Point::new(8.0, 2.0));
        assert_eq!(c.port("e3").unwrap().center, Point::new(8.0, 1.0));
    }
}
