use padkit_core::{BBox, Point};
use serde::{Deserialize, Serialize};

/// Maps layout coordinates (microns, y up) onto a pixel canvas (y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center X in layout coordinates.
    pub center_x: f64,
    /// Center Y in layout coordinates.
    pub center_y: f64,
    /// Zoom level (pixels per layout unit).
    pub zoom: f64,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom: 1.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Zoom to fit a bounding box with a 10% margin. Degenerate boxes only
    /// recenter.
    pub fn fit_bbox(&mut self, bbox: &BBox) {
        let center = bbox.center();
        self.center_x = center.x;
        self.center_y = center.y;

        let (width, height) = (bbox.width(), bbox.height());
        let zoom_x = if width > 0.0 { self.canvas_width / width * 0.9 } else { f64::INFINITY };
        let zoom_y = if height > 0.0 { self.canvas_height / height * 0.9 } else { f64::INFINITY };
        let zoom = zoom_x.min(zoom_y);
        if zoom.is_finite() {
            self.zoom = zoom;
        }
    }

    /// A viewport of the given canvas size fitted to `bbox`.
    pub fn fitted(canvas_width: f64, canvas_height: f64, bbox: Option<BBox>) -> Self {
        let mut viewport = Self::new(canvas_width, canvas_height);
        if let Some(bbox) = bbox {
            viewport.fit_bbox(&bbox);
        }
        viewport
    }

    pub fn layout_to_screen(&self, p: &Point) -> (f64, f64) {
        (
            (p.x - self.center_x) * self.zoom + self.canvas_width / 2.0,
            self.canvas_height / 2.0 - (p.y - self.center_y) * self.zoom,
        )
    }
}
