//! Rectangular pads and pad arrays.

use std::sync::Arc;

use padkit_core::{ArrayPlacement, Component, Orientation, Point, Port, PortType, Size};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{CellError, Result};
use crate::params::{build, CellParams};
use crate::pdk::{LayerSpec, Pdk, Settings, SizeSpec};
use crate::primitives::CompassParams;

// ── Pad ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PadParams {
    pub size: SizeSpec,
    pub layer: LayerSpec,
    /// Extra boxes around the pad, one per layer.
    pub bbox_layers: Option<Vec<LayerSpec>>,
    /// Per-box growth (negative shrinks), applied on top of the previous box.
    pub bbox_offsets: Option<Vec<f64>>,
    pub port_inclusion: f64,
    /// Orientation of the center port named `pad`; `None` omits it.
    pub port_orientation: Option<Orientation>,
    /// Edge ports to add; `None` adds none.
    pub port_orientations: Option<Vec<Orientation>>,
    pub port_type: PortType,
}

impl Default for PadParams {
    fn default() -> Self {
        Self {
            size: SizeSpec::Value((100.0, 100.0)),
            layer: "MTOP".into(),
            bbox_layers: None,
            bbox_offsets: None,
            port_inclusion: 0.0,
            port_orientation: Some(Orientation::East),
            port_orientations: Some(vec![
                Orientation::West,
                Orientation::North,
                Orientation::East,
                Orientation::South,
            ]),
            port_type: PortType::Pad,
        }
    }
}

impl PadParams {
    /// Pad sized by the PDK constant `pad_size`.
    pub fn rectangular() -> Self {
        Self {
            size: SizeSpec::Constant("pad_size".into()),
            ..Default::default()
        }
    }

    pub fn small() -> Self {
        Self {
            size: SizeSpec::Value((80.0, 80.0)),
            ..Default::default()
        }
    }
}

impl CellParams for PadParams {
    const FUNCTION: &'static str = "pad";

    fn draw(&self, pdk: &Pdk) -> Result<Component> {
        let layer = pdk.get_layer(&self.layer)?;
        let size = pdk.resolve_size(&self.size)?;

        let rect = build(
            &CompassParams {
                size,
                layer: layer.into(),
                port_type: Some(PortType::Electrical),
                port_inclusion: self.port_inclusion,
                port_orientations: self.port_orientations.clone(),
            },
            pdk,
        )?;

        let mut c = Component::new(Self::FUNCTION);
        let ports = c.add_ref(Arc::new(rect)).ports();
        c.add_ports(ports)?;
        c.info.insert("size".into(), json!([size.0, size.1]));
        c.info.insert("xsize".into(), json!(size.0));
        c.info.insert("ysize".into(), json!(size.1));

        if let Some(orientation) = self.port_orientation {
            let width = if orientation.is_horizontal() {
                size.1
            } else {
                size.0
            };
            c.add_port(Port::new(
                "pad",
                Point::origin(),
                width,
                orientation,
                layer,
                self.port_type,
            ))?;
        }

        if let (Some(bbox_layers), Some(bbox_offsets)) = (&self.bbox_layers, &self.bbox_offsets) {
            let mut box_size = size;
            for (bbox_layer, offset) in bbox_layers.iter().zip(bbox_offsets) {
                box_size = (box_size.0 + 2.0 * offset, box_size.1 + 2.0 * offset);
                let bbox = build(
                    &CompassParams {
                        size: box_size,
                        layer: bbox_layer.clone(),
                        ..Default::default()
                    },
                    pdk,
                )?;
                c.add_ref(Arc::new(bbox));
            }
        }

        c.flatten();
        Ok(c)
    }
}

pub fn pad(params: &PadParams, pdk: &Pdk) -> Result<Component> {
    build(params, pdk)
}

// ── Pad array ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PadArrayParams {
    /// Registered cell to replicate.
    pub pad: String,
    pub columns: usize,
    pub rows: usize,
    pub column_pitch: f64,
    pub row_pitch: f64,
    pub port_orientation: Orientation,
    /// Pad size override; the pad's recorded size otherwise.
    pub size: Option<Size>,
    pub layer: Option<LayerSpec>,
    /// Put ports at pad centers instead of pad edges.
    pub centered_ports: bool,
    pub auto_rename_ports: bool,
}

impl Default for PadArrayParams {
    fn default() -> Self {
        Self {
            pad: "pad".into(),
            columns: 6,
            rows: 1,
            column_pitch: 150.0,
            row_pitch: 150.0,
            port_orientation: Orientation::East,
            size: None,
            layer: Some("MTOP".into()),
            centered_ports: false,
            auto_rename_ports: false,
        }
    }
}

impl PadArrayParams {
    pub fn north() -> Self {
        Self {
            port_orientation: Orientation::North,
            ..Default::default()
        }
    }

    pub fn south() -> Self {
        Self {
            port_orientation: Orientation::South,
            ..Default::default()
        }
    }

    /// One column of three pads facing east.
    pub fn east() -> Self {
        Self {
            port_orientation: Orientation::East,
            columns: 1,
            rows: 3,
            ..Default::default()
        }
    }

    /// One column of three pads facing west.
    pub fn west() -> Self {
        Self {
            port_orientation: Orientation::West,
            columns: 1,
            rows: 3,
            ..Default::default()
        }
    }
}

impl CellParams for PadArrayParams {
    const FUNCTION: &'static str = "pad_array";

    fn draw(&self, pdk: &Pdk) -> Result<Component> {
        let mut overrides = Settings::new();
        overrides.insert("port_orientations".into(), Value::Null);
        overrides.insert(
            "port_orientation".into(),
            serde_json::to_value(self.port_orientation)?,
        );
        if let Some(layer) = &self.layer {
            overrides.insert("layer".into(), serde_json::to_value(layer)?);
        }
        if let Some(size) = self.size {
            overrides.insert("size".into(), serde_json::to_value(size)?);
        }
        let pad = pdk.get_component(&self.pad, &overrides)?;

        let pad_size: Size = match self.size {
            Some(size) => size,
            None => match pad.info.get("size") {
                Some(size) => serde_json::from_value(size.clone())?,
                None => pad.size(),
            },
        };
        let pad_layer = match &self.layer {
            Some(layer) => pdk.get_layer(layer)?,
            None => pad.ports().first().map(|p| p.layer).ok_or_else(|| {
                CellError::InvalidParameter(format!(
                    "cell '{}' has no port to take the pad layer from",
                    pad.name
                ))
            })?,
        };

        let mut c = Component::new(Self::FUNCTION);
        c.add_array_ref(
            Arc::new(pad),
            ArrayPlacement::new(self.columns, self.rows, self.column_pitch, self.row_pitch),
        );

        let orientation = self.port_orientation;
        let width = if orientation.is_horizontal() {
            pad_size.1
        } else {
            pad_size.0
        };

        for col in 0..self.columns {
            for row in 0..self.rows {
                let mut center = Point::new(
                    col as f64 * self.column_pitch,
                    row as f64 * self.row_pitch,
                );
                if !self.centered_ports {
                    center = match orientation {
                        Orientation::East => center.translate(pad_size.0 / 2.0, 0.0),
                        Orientation::North => center.translate(0.0, pad_size.1 / 2.0),
                        Orientation::West => center.translate(-pad_size.0 / 2.0, 0.0),
                        Orientation::South => center.translate(0.0, -pad_size.1 / 2.0),
                    };
                }
                c.add_port(Port::new(
                    &format!("e{}{}", row + 1, col + 1),
                    center,
                    width,
                    orientation,
                    pad_layer,
                    PortType::Electrical,
                ))?;
            }
        }

        if self.auto_rename_ports {
            c.auto_rename_ports();
        }
        log::debug!(
            "Pad array {}x{} of '{}' with {} ports",
            self.columns,
            self.rows,
            self.pad,
            c.ports().len()
        );
        Ok(c)
    }
}

pub fn pad_array(params: &PadArrayParams, pdk: &Pdk) -> Result<Component> {
    build(params, pdk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use padkit_core::LayerId;

    const EPS: f64 = 1e-9;

    fn pdk() -> Pdk {
        Pdk::generic()
    }

    #[test]
    fn test_pad_bbox_equals_size() {
        for size in [(100.0, 100.0), (80.0, 40.0), (3.5, 120.25)] {
            let c = pad(
                &PadParams {
                    size: size.into(),
                    ..Default::default()
                },
                &pdk(),
            )
            .unwrap();
            let (w, h) = c.size();
            assert!((w - size.0).abs() < EPS, "width for {size:?}");
            assert!((h - size.1).abs() < EPS, "height for {size:?}");
            assert!(c.references.is_empty());
        }
    }

    #[test]
    fn test_pad_compass_ports_with_inclusion() {
        let c = pad(
            &PadParams {
                size: (60.0, 40.0).into(),
                port_inclusion: 5.0,
                ..Default::default()
            },
            &pdk(),
        )
        .unwrap();
        let expected = [
            ("e1", Point::new(-25.0, 0.0), Orientation::West, 40.0),
            ("e2", Point::new(0.0, 15.0), Orientation::North, 60.0),
            ("e3", Point::new(25.0, 0.0), Orientation::East, 40.0),
            ("e4", Point::new(0.0, -15.0), Orientation::South, 60.0),
        ];
        for (name, center, orientation, width) in expected {
            let p = c.port(name).unwrap();
            assert!((p.center.x - center.x).abs() < EPS, "{name}");
            assert!((p.center.y - center.y).abs() < EPS, "{name}");
            assert_eq!(p.orientation, orientation);
            assert_eq!(p.width, width);
            assert_eq!(p.port_type, PortType::Electrical);
        }
        assert_eq!(c.ports().len(), 5);
    }

    #[test]
    fn test_pad_center_port_width_follows_orientation() {
        let size = (70.0, 30.0);
        for orientation in Orientation::ALL {
            let c = pad(
                &PadParams {
                    size: size.into(),
                    port_orientation: Some(orientation),
                    ..Default::default()
                },
                &pdk(),
            )
            .unwrap();
            let p = c.port("pad").unwrap();
            let expected = match orientation {
                Orientation::East | Orientation::West => size.1,
                Orientation::North | Orientation::South => size.0,
            };
            assert_eq!(p.width, expected);
            assert_eq!(p.orientation, orientation);
            assert_eq!(p.port_type, PortType::Pad);
            assert_eq!(p.center, Point::origin());
        }
    }

    #[test]
    fn test_pad_invalid_orientation_rejected() {
        let mut overrides = Settings::new();
        overrides.insert("port_orientation".into(), json!(45));
        assert!(pdk().get_component("pad", &overrides).is_err());
    }

    #[test]
    fn test_pad_without_ports() {
        let c = pad(
            &PadParams {
                port_orientation: None,
                port_orientations: None,
                ..Default::default()
            },
            &pdk(),
        )
        .unwrap();
        assert!(c.ports().is_empty());
    }

    #[test]
    fn test_pad_bbox_layers_grow_cumulatively() {
        let c = pad(
            &PadParams {
                bbox_layers: Some(vec!["MTOP".into(), "M1".into()]),
                bbox_offsets: Some(vec![10.0, 20.0]),
                ..Default::default()
            },
            &pdk(),
        )
        .unwrap();
        let m1: Vec<_> = c
            .shapes
            .iter()
            .filter(|s| s.layer() == LayerId::new(41, 0))
            .collect();
        assert_eq!(m1.len(), 1);
        let bb = m1[0].bbox().unwrap();
        assert!((bb.width() - 160.0).abs() < EPS);
        assert_eq!(c.shapes.len(), 3);
    }

    #[test]
    fn test_pad_presets() {
        let small = pdk().get_component("pad_small", &Settings::new()).unwrap();
        assert!((small.size().0 - 80.0).abs() < EPS);
        let rectangular = pdk().get_component("pad_rectangular", &Settings::new()).unwrap();
        assert!((rectangular.size().0 - 100.0).abs() < EPS);
        assert_ne!(small.name, rectangular.name);
    }

    #[test]
    fn test_pad_array_port_grid() {
        let c = pad_array(
            &PadArrayParams {
                columns: 3,
                rows: 2,
                ..Default::default()
            },
            &pdk(),
        )
        .unwrap();
        assert_eq!(c.ports().len(), 6);
        for col in 0..3 {
            for row in 0..2 {
                let p = c.port(&format!("e{}{}", row + 1, col + 1)).unwrap();
                assert!((p.center.x - (col as f64 * 150.0 + 50.0)).abs() < EPS);
                assert!((p.center.y - row as f64 * 150.0).abs() < EPS);
                assert_eq!(p.width, 100.0);
                assert_eq!(p.orientation, Orientation::East);
                assert_eq!(p.layer, LayerId::new(49, 0));
            }
        }
        let (w, h) = c.size();
        assert!((w - 400.0).abs() < EPS);
        assert!((h - 250.0).abs() < EPS);
    }

    #[test]
    fn test_pad_array_offsets_per_orientation() {
        let size = (40.0, 20.0);
        let cases = [
            (Orientation::East, Point::new(20.0, 0.0), 20.0),
            (Orientation::North, Point::new(0.0, 10.0), 40.0),
            (Orientation::West, Point::new(-20.0, 0.0), 20.0),
            (Orientation::South, Point::new(0.0, -10.0), 40.0),
        ];
        for (orientation, offset, width) in cases {
            let c = pad_array(
                &PadArrayParams {
                    columns: 1,
                    rows: 1,
                    size: Some(size),
                    port_orientation: orientation,
                    ..Default::default()
                },
                &pdk(),
            )
            .unwrap();
            let p = c.port("e11").unwrap();
            assert_eq!(p.center, offset);
            assert_eq!(p.width, width);
        }
    }

    #[test]
    fn test_pad_array_centered_ports() {
        let c = pad_array(
            &PadArrayParams {
                columns: 2,
                centered_ports: true,
                port_orientation: Orientation::North,
                ..Default::default()
            },
            &pdk(),
        )
        .unwrap();
        assert_eq!(c.port("e12").unwrap().center, Point::new(150.0, 0.0));
    }

    #[test]
    fn test_pad_array_auto_rename() {
        let c = pad_array(
            &PadArrayParams {
                columns: 3,
                port_orientation: Orientation::North,
                auto_rename_ports: true,
                ..Default::default()
            },
            &pdk(),
        )
        .unwrap();
        let names: Vec<&str> = c.ports().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["e1", "e2", "e3"]);
        assert!(c.port("e1").unwrap().center.x < c.port("e3").unwrap().center.x);
    }

    #[test]
    fn test_pad_array_presets() {
        let c = pdk().get_component("pad_array180", &Settings::new()).unwrap();
        assert_eq!(c.ports().len(), 3);
        assert!(c.ports().iter().all(|p| p.orientation == Orientation::West));
        let c = pdk().get_component("pad_array90", &Settings::new()).unwrap();
        assert_eq!(c.ports().len(), 6);
    }

    #[test]
    fn test_generators_are_idempotent() {
        let params = PadArrayParams {
            columns: 2,
            rows: 2,
            ..Default::default()
        };
        let a = pad_array(&params, &pdk()).unwrap();
        let b = pad_array(&params, &pdk()).unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(a.bbox(), b.bbox());
        assert_eq!(a.ports(), b.ports());
        assert_ne!(a.id, b.id);
    }
}
