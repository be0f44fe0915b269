//! Serpentine resistor between two pads, for sheet resistance test structures.

use std::sync::Arc;

use padkit_core::{Component, Size};
use serde::{Deserialize, Serialize};

use crate::error::{CellError, Result};
use crate::params::{build, CellParams};
use crate::pdk::{LayerSpec, Pdk};
use crate::primitives::{rectangle, RectangleParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeanderParams {
    /// Name of the trace sub-component.
    pub name: String,
    /// Size of each of the two end pads.
    pub pad_size: Size,
    /// Target number of `width` x `width` squares in the trace.
    pub num_squares: i64,
    pub width: f64,
    pub res_layer: LayerSpec,
    pub pad_layer: LayerSpec,
}

impl Default for MeanderParams {
    fn default() -> Self {
        Self {
            name: "net".into(),
            pad_size: (50.0, 50.0),
            num_squares: 1000,
            width: 1.0,
            res_layer: "MTOP".into(),
            pad_layer: "MTOP".into(),
        }
    }
}

/// Row partition of a meander trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanderLayout {
    /// Rows in the serpentine. Can be zero or negative for degenerate
    /// inputs, in which case only the two end stubs are drawn.
    pub num_rows: i64,
    pub squares_in_row: f64,
    pub length_row: f64,
}

/// Split `num_squares` into rows that fit next to a pad of `pad_size`.
pub fn meander_layout(pad_size: Size, num_squares: i64, width: f64) -> Result<MeanderLayout> {
    let (x, z) = pad_size;
    if x <= 0.0 || z <= 0.0 {
        return Err(CellError::InvalidParameter(
            "pad must have positive dimensions".into(),
        ));
    } else if width > z {
        return Err(CellError::InvalidParameter(format!(
            "trace width {width} cannot be greater than pad height {z}"
        )));
    } else if num_squares <= 0 {
        return Err(CellError::InvalidParameter(format!(
            "number of squares must be positive, got {num_squares}"
        )));
    } else if width <= 0.0 {
        return Err(CellError::InvalidParameter(format!(
            "trace width must be positive, got {width}"
        )));
    }

    let mut num_rows = (z / (2.0 * width)).floor() as i64;
    if num_rows % 2 == 0 {
        num_rows -= 1;
    }
    let num_columns = num_rows - 1;
    let mut squares_in_row = (num_squares - num_columns - 2) as f64 / num_rows as f64;

    if squares_in_row < 1.0 {
        num_rows = (num_rows as f64 / 2.0).round_ties_even() as i64 - 2;
        squares_in_row = 1.0;
    }
    if width * 2.0 > z {
        num_rows = 1;
        squares_in_row = (num_squares - 2) as f64;
    }

    let layout = MeanderLayout {
        num_rows,
        squares_in_row,
        length_row: squares_in_row * width,
    };
    log::debug!(
        "Meander of {num_squares} squares: {} rows of {} squares",
        layout.num_rows,
        layout.squares_in_row
    );
    Ok(layout)
}

impl CellParams for MeanderParams {
    const FUNCTION: &'static str = "resistance_meander";

    fn draw(&self, pdk: &Pdk) -> Result<Component> {
        let layout = meander_layout(self.pad_size, self.num_squares, self.width)?;
        let (x, z) = self.pad_size;
        let w = self.width;
        let l = layout.length_row;

        let trace = |size: Size| {
            rectangle(
                &RectangleParams {
                    size,
                    layer: self.res_layer.clone(),
                    ..Default::default()
                },
                pdk,
            )
            .map(Arc::new)
        };
        let row = trace((l, w))?;
        let col = trace((w, w))?;

        // Row with a corner square hanging below its right end.
        let mut tile = Component::new("meander_tile");
        tile.add_ref(row.clone());
        tile.add_ref(col.clone()).move_by(l - w, -w);
        let tile_height = tile.size().1;
        let tile = Arc::new(tile);

        let mut net = Component::new(&self.name);
        for i in 0..layout.num_rows {
            let n = i + 1;
            let cell = if i != layout.num_rows - 1 {
                tile.clone()
            } else {
                row.clone()
            };
            let r = net.add_ref(cell);
            if n % 2 == 0 {
                let center = r.x();
                r.mirror_x(center);
            }
            r.movey(-((n - 1) as f64) * tile_height);
        }
        let n = layout.num_rows.max(0) + 1;
        net.add_ref(col.clone()).movex(-w);
        net.add_ref(col)
            .movey(-((n - 2) as f64) * tile_height)
            .movex(l);

        let pad = Arc::new(rectangle(
            &RectangleParams {
                size: (x, z),
                layer: self.pad_layer.clone(),
                ..Default::default()
            },
            pdk,
        )?);

        let mut c = Component::new(Self::FUNCTION);
        let pad_ymin = c.add_ref(pad.clone()).movex(-x - w).ymin();
        c.add_ref(pad).movex(l + w);
        c.add_ref(Arc::new(net)).set_ymin(pad_ymin);
        c.flatten();
        Ok(c)
    }
}

pub fn resistance_meander(params: &MeanderParams, pdk: &Pdk) -> Result<Component> {
    build(params, pdk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use padkit_core::LayerId;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_layout_regular() {
        let layout = meander_layout((50.0, 50.0), 500, 1.0).unwrap();
        assert_eq!(layout.num_rows, 25);
        assert!((layout.squares_in_row - 18.96).abs() < EPS);
        assert!((layout.length_row - 18.96).abs() < EPS);
    }

    #[test]
    fn test_layout_validation() {
        for (pad_size, num_squares, width) in [
            ((0.0, 50.0), 100, 1.0),
            ((50.0, -1.0), 100, 1.0),
            ((50.0, 50.0), 100, 60.0),
            ((50.0, 50.0), 0, 1.0),
            ((50.0, 50.0), 100, 0.0),
        ] {
            assert!(
                matches!(
                    meander_layout(pad_size, num_squares, width),
                    Err(CellError::InvalidParameter(_))
                ),
                "{pad_size:?} {num_squares} {width}"
            );
        }
    }

    #[test]
    fn test_layout_too_few_squares_rounds_half_to_even() {
        // 25 rows do not fit 10 squares: 25 / 2 = 12.5 rounds to 12.
        let layout = meander_layout((50.0, 50.0), 10, 1.0).unwrap();
        assert_eq!(layout.num_rows, 10);
        assert_eq!(layout.squares_in_row, 1.0);
    }

    #[test]
    fn test_layout_wide_trace_single_row() {
        let layout = meander_layout((50.0, 50.0), 100, 30.0).unwrap();
        assert_eq!(layout.num_rows, 1);
        assert_eq!(layout.squares_in_row, 98.0);
        assert!((layout.length_row - 2940.0).abs() < EPS);
    }

    #[test]
    fn test_meander_geometry() {
        let pdk = Pdk::generic();
        let c = resistance_meander(&MeanderParams::default(), &pdk).unwrap();
        // 1000 squares: 25 rows of 38.96.
        let bb = c.bbox().unwrap();
        assert!((bb.min.x + 51.0).abs() < EPS);
        assert!((bb.max.x - (38.96 + 1.0 + 50.0)).abs() < 1e-6);
        assert!(bb.min.y.abs() < EPS);
        assert!((bb.max.y - 50.0).abs() < EPS);

        assert!(c.references.is_empty());
        assert!(c.ports().is_empty());
        assert_eq!(c.layers(), vec![LayerId::new(49, 0)]);
        // 25 rows, 24 corners, 2 stubs, 2 pads.
        assert_eq!(c.shapes.len(), 53);
    }

    #[test]
    fn test_meander_gap_between_pads() {
        let pdk = Pdk::generic();
        let params = MeanderParams {
            num_squares: 500,
            ..Default::default()
        };
        let c = resistance_meander(&params, &pdk).unwrap();
        let mut pads: Vec<_> = c
            .shapes
            .iter()
            .filter_map(|s| s.bbox())
            .filter(|bb| (bb.width() - 50.0).abs() < EPS && (bb.height() - 50.0).abs() < EPS)
            .collect();
        pads.sort_by(|a, b| a.min.x.total_cmp(&b.min.x));
        assert_eq!(pads.len(), 2);
        let gap = pads[1].min.x - pads[0].max.x;
        assert!((gap - (18.96 + 2.0)).abs() < 1e-6);
        assert!(gap > 18.96);
    }

    #[test]
    fn test_meander_too_few_squares_for_trace() {
        let pdk = Pdk::generic();
        let params = MeanderParams {
            num_squares: 2,
            width: 30.0,
            ..Default::default()
        };
        assert!(resistance_meander(&params, &pdk).is_err());
    }

    #[test]
    fn test_meander_naming() {
        let pdk = Pdk::generic();
        let a = resistance_meander(&MeanderParams::default(), &pdk).unwrap();
        assert_eq!(a.name, "resistance_meander");

        let params = MeanderParams {
            num_squares: 500,
            ..Default::default()
        };
        let b = resistance_meander(&params, &pdk).unwrap();
        let c = resistance_meander(&params, &pdk).unwrap();
        assert_eq!(b.name, c.name);
        assert_eq!(b.bbox(), c.bbox());
        assert!(b.name.starts_with("resistance_meander_"));
        assert_eq!(b.name.len(), "resistance_meander_".len() + 8);
    }
}
