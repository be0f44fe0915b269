use serde::{Deserialize, Serialize};

use crate::layer::LayerId;

/// A 2D point in layout coordinates (microns).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Corners in counter-clockwise order starting at the lower left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            min: self.min.translate(dx, dy),
            max: self.max.translate(dx, dy),
        }
    }

    /// Union of an iterator of boxes, `None` when it is empty.
    pub fn union_all(boxes: impl IntoIterator<Item = BBox>) -> Option<Self> {
        boxes.into_iter().reduce(|acc, bb| acc.union(&bb))
    }
}

/// An instance placement: scale, then mirror about the x axis, then rotate
/// counter-clockwise, then translate. Same order as a GDS STRANS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation offset.
    pub offset: Point,
    /// Rotation in degrees (0, 90, 180, 270).
    pub rotation: f64,
    /// Mirror about X axis.
    pub mirror_x: bool,
    /// Uniform scale factor (typically 1.0).
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Point::origin(),
            rotation: 0.0,
            mirror_x: false,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            offset: Point::new(x, y),
            ..Default::default()
        }
    }

    /// Reflection across the vertical line `x = x0`.
    pub fn mirror_about_x(x0: f64) -> Self {
        Self {
            offset: Point::new(2.0 * x0, 0.0),
            rotation: 180.0,
            mirror_x: true,
            scale: 1.0,
        }
    }

    /// Rotation reduced to a whole number of quarter turns in `0..4`.
    pub fn quarter_turns(&self) -> i64 {
        ((self.rotation / 90.0).round() as i64).rem_euclid(4)
    }

    fn is_quarter_turn(&self) -> bool {
        (self.rotation / 90.0 - (self.rotation / 90.0).round()).abs() < 1e-9
    }

    pub fn apply(&self, point: &Point) -> Point {
        let mut p = *point;

        p.x *= self.scale;
        p.y *= self.scale;

        if self.mirror_x {
            p.y = -p.y;
        }

        let (rx, ry) = if self.is_quarter_turn() {
            // Exact for the common case, avoids sin/cos residue.
            match self.quarter_turns() {
                0 => (p.x, p.y),
                1 => (-p.y, p.x),
                2 => (-p.x, -p.y),
                _ => (p.y, -p.x),
            }
        } else {
            let rad = self.rotation.to_radians();
            let (sin_r, cos_r) = rad.sin_cos();
            (p.x * cos_r - p.y * sin_r, p.x * sin_r + p.y * cos_r)
        };

        Point::new(rx + self.offset.x, ry + self.offset.y)
    }

    /// The transform equivalent to applying `self` first and `outer` second.
    pub fn then(&self, outer: &Transform) -> Transform {
        let rotation = if outer.mirror_x {
            outer.rotation - self.rotation
        } else {
            outer.rotation + self.rotation
        };
        Transform {
            offset: outer.apply(&self.offset),
            rotation: rotation.rem_euclid(360.0),
            mirror_x: self.mirror_x ^ outer.mirror_x,
            scale: self.scale * outer.scale,
        }
    }
}

/// A rectangle defined by lower-left and upper-right corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub layer: LayerId,
    pub lower_left: Point,
    pub upper_right: Point,
}

impl Rect {
    pub fn new(layer: LayerId, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            layer,
            lower_left: Point::new(x1.min(x2), y1.min(y2)),
            upper_right: Point::new(x1.max(x2), y1.max(y2)),
        }
    }

    /// A `width` by `height` rectangle centered on the origin.
    pub fn centered(layer: LayerId, width: f64, height: f64) -> Self {
        Self::new(layer, -width / 2.0, -height / 2.0, width / 2.0, height / 2.0)
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.lower_left, self.upper_right)
    }
}

/// A polygon defined by a list of vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub layer: LayerId,
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(layer: LayerId, vertices: Vec<Point>) -> Self {
        Self { layer, vertices }
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }
}

/// A geometric primitive in the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeomPrimitive {
    Rect(Rect),
    Polygon(Polygon),
}

impl GeomPrimitive {
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            GeomPrimitive::Rect(r) => Some(r.bbox()),
            GeomPrimitive::Polygon(p) => p.bbox(),
        }
    }

    pub fn layer(&self) -> LayerId {
        match self {
            GeomPrimitive::Rect(r) => r.layer,
            GeomPrimitive::Polygon(p) => p.layer,
        }
    }

    /// Outline vertices, counter-clockwise for rectangles.
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            GeomPrimitive::Rect(r) => r.bbox().corners().to_vec(),
            GeomPrimitive::Polygon(p) => p.vertices.clone(),
        }
    }

    /// Apply a placement. Rectangles stay rectangles under quarter turns.
    pub fn transformed(&self, t: &Transform) -> GeomPrimitive {
        match self {
            GeomPrimitive::Rect(r) if t.is_quarter_turn() => {
                let a = t.apply(&r.lower_left);
                let b = t.apply(&r.upper_right);
                GeomPrimitive::Rect(Rect::new(r.layer, a.x, a.y, b.x, b.y))
            }
            _ => GeomPrimitive::Polygon(Polygon::new(
                self.layer(),
                self.vertices().iter().map(|p| t.apply(p)).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M1: LayerId = LayerId::new(41, 0);

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(M1, 10.0, 4.0);
        assert_eq!(r.lower_left, Point::new(-5.0, -2.0));
        assert_eq!(r.upper_right, Point::new(5.0, 2.0));
    }

    #[test]
    fn test_transform_translate() {
        let t = Transform::translate(10.0, 20.0);
        let result = t.apply(&Point::new(5.0, 5.0));
        assert!((result.x - 15.0).abs() < 1e-10);
        assert!((result.y - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_mirror_about_vertical_line() {
        let t = Transform::mirror_about_x(5.0);
        let p = t.apply(&Point::new(1.0, 3.0));
        assert!((p.x - 9.0).abs() < 1e-10);
        assert!((p.y - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_transform_composition_matches_sequential_apply() {
        let inner = Transform {
            offset: Point::new(3.0, -1.0),
            rotation: 90.0,
            mirror_x: false,
            scale: 1.0,
        };
        let outer = Transform::mirror_about_x(2.0).then(&Transform::translate(0.0, 7.0));
        let composed = inner.then(&outer);
        for p in [Point::new(1.0, 2.0), Point::new(-4.0, 0.5)] {
            let expected = outer.apply(&inner.apply(&p));
            let got = composed.apply(&p);
            assert!((expected.x - got.x).abs() < 1e-9);
            assert!((expected.y - got.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rect_stays_rect_under_quarter_turn() {
        let r = GeomPrimitive::Rect(Rect::new(M1, 0.0, 0.0, 4.0, 2.0));
        let t = Transform {
            rotation: 90.0,
            ..Default::default()
        };
        match r.transformed(&t) {
            GeomPrimitive::Rect(out) => {
                assert_eq!(out.lower_left, Point::new(-2.0, 0.0));
                assert_eq!(out.upper_right, Point::new(0.0, 4.0));
            }
            other => panic!("expected a rect, got {other:?}"),
        }
    }

    #[test]
    fn test_bbox_union_all() {
        let a = BBox::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = BBox::new(Point::new(5.0, -5.0), Point::new(15.0, 5.0));
        let u = BBox::union_all([a, b]).unwrap();
        assert_eq!(u.min, Point::new(0.0, -5.0));
        assert_eq!(u.max, Point::new(15.0, 10.0));
        assert!(BBox::union_all(Vec::new()).is_none());
    }
}
