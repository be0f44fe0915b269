use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::LayoutError;
use crate::geometry::{BBox, GeomPrimitive, Point, Rect, Transform};
use crate::layer::LayerId;
use crate::port::{Orientation, Port, PortType};

/// Unique component identifier.
pub type ComponentId = Uuid;

/// Grid replication of a reference: `columns` x `rows` copies, stepped by
/// the pitches in the parent's coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrayPlacement {
    pub columns: usize,
    pub rows: usize,
    pub column_pitch: f64,
    pub row_pitch: f64,
}

impl ArrayPlacement {
    pub fn new(columns: usize, rows: usize, column_pitch: f64, row_pitch: f64) -> Self {
        Self {
            columns,
            rows,
            column_pitch,
            row_pitch,
        }
    }

    /// Offsets of every copy, column-major.
    pub fn offsets(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.columns).flat_map(move |col| {
            (0..self.rows).map(move |row| {
                Point::new(col as f64 * self.column_pitch, row as f64 * self.row_pitch)
            })
        })
    }
}

/// A placed child component.
#[derive(Debug, Clone)]
pub struct ComponentRef {
    pub component: Arc<Component>,
    pub transform: Transform,
    pub array: Option<ArrayPlacement>,
}

impl ComponentRef {
    pub fn new(component: Arc<Component>) -> Self {
        Self {
            component,
            transform: Transform::default(),
            array: None,
        }
    }

    /// One transform per placed copy.
    pub fn placements(&self) -> Vec<Transform> {
        match &self.array {
            None => vec![self.transform],
            Some(array) => array
                .offsets()
                .map(|o| self.transform.then(&Transform::translate(o.x, o.y)))
                .collect(),
        }
    }

    pub fn bbox(&self) -> Option<BBox> {
        let child = self.component.bbox()?;
        let corners: Vec<Point> = child
            .corners()
            .iter()
            .map(|p| self.transform.apply(p))
            .collect();
        let first = BBox::from_points(&corners)?;
        match &self.array {
            None => Some(first),
            Some(a) if a.columns == 0 || a.rows == 0 => None,
            Some(a) => Some(first.union(&first.translate(
                (a.columns - 1) as f64 * a.column_pitch,
                (a.rows - 1) as f64 * a.row_pitch,
            ))),
        }
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.transform = self.transform.then(&Transform::translate(dx, dy));
        self
    }

    pub fn movex(&mut self, dx: f64) -> &mut Self {
        self.move_by(dx, 0.0)
    }

    pub fn movey(&mut self, dy: f64) -> &mut Self {
        self.move_by(0.0, dy)
    }

    /// Reflect across the vertical line `x = x0`.
    pub fn mirror_x(&mut self, x0: f64) -> &mut Self {
        self.transform = self.transform.then(&Transform::mirror_about_x(x0));
        self
    }

    /// Center x of the placed bounding box.
    pub fn x(&self) -> f64 {
        self.bbox().map(|bb| bb.center().x).unwrap_or(self.transform.offset.x)
    }

    pub fn ymin(&self) -> f64 {
        self.bbox().map(|bb| bb.min.y).unwrap_or(self.transform.offset.y)
    }

    pub fn set_ymin(&mut self, y: f64) -> &mut Self {
        let dy = y - self.ymin();
        self.movey(dy)
    }

    /// Child ports as seen from the parent (first copy for arrays).
    pub fn ports(&self) -> Vec<Port> {
        self.component
            .ports()
            .iter()
            .map(|p| p.transformed(&self.transform))
            .collect()
    }
}

/// How a generated component was parameterized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSettings {
    pub function_name: String,
    /// Every parameter at its generator default.
    pub default: Map<String, Value>,
    /// Parameters that differ from the defaults.
    pub changed: Map<String, Value>,
    /// Parameters as used.
    pub full: Map<String, Value>,
}

/// A layout component: shapes, child references and ports.
#[derive(Debug, Clone)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub shapes: Vec<GeomPrimitive>,
    pub references: Vec<ComponentRef>,
    ports: Vec<Port>,
    /// Free-form derived values, e.g. `size`.
    pub info: Map<String, Value>,
    pub settings: Option<ComponentSettings>,
}

impl Component {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            shapes: Vec::new(),
            references: Vec::new(),
            ports: Vec::new(),
            info: Map::new(),
            settings: None,
        }
    }

    pub fn add_shape(&mut self, shape: GeomPrimitive) {
        self.shapes.push(shape);
    }

    pub fn add_rect(&mut self, rect: Rect) {
        self.add_shape(GeomPrimitive::Rect(rect));
    }

    pub fn add_ref(&mut self, component: Arc<Component>) -> &mut ComponentRef {
        self.references.push(ComponentRef::new(component));
        let last = self.references.len() - 1;
        &mut self.references[last]
    }

    pub fn add_array_ref(
        &mut self,
        component: Arc<Component>,
        array: ArrayPlacement,
    ) -> &mut ComponentRef {
        let reference = self.add_ref(component);
        reference.array = Some(array);
        reference
    }

    /// Add a port. Names are unique within a component.
    pub fn add_port(&mut self, port: Port) -> Result<(), LayoutError> {
        if self.port(&port.name).is_some() {
            return Err(LayoutError::DuplicatePort {
                component: self.name.clone(),
                port: port.name,
            });
        }
        self.ports.push(port);
        Ok(())
    }

    pub fn add_ports(&mut self, ports: impl IntoIterator<Item = Port>) -> Result<(), LayoutError> {
        ports.into_iter().try_for_each(|p| self.add_port(p))
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Bounding box of all geometry, references included.
    pub fn bbox(&self) -> Option<BBox> {
        BBox::union_all(
            self.shapes
                .iter()
                .filter_map(|g| g.bbox())
                .chain(self.references.iter().filter_map(|r| r.bbox())),
        )
    }

    /// (xsize, ysize) of the bounding box; zero when empty.
    pub fn size(&self) -> (f64, f64) {
        self.bbox()
            .map(|bb| (bb.width(), bb.height()))
            .unwrap_or((0.0, 0.0))
    }

    /// All geometry under `t`, references expanded recursively.
    pub fn shapes_under(&self, t: &Transform) -> Vec<GeomPrimitive> {
        let mut out: Vec<GeomPrimitive> = self.shapes.iter().map(|g| g.transformed(t)).collect();
        for reference in &self.references {
            for placement in reference.placements() {
                out.extend(reference.component.shapes_under(&placement.then(t)));
            }
        }
        out
    }

    /// Replace every reference by its transformed geometry.
    pub fn flatten(&mut self) {
        let references = std::mem::take(&mut self.references);
        for reference in &references {
            for placement in reference.placements() {
                self.shapes
                    .extend(reference.component.shapes_under(&placement));
            }
        }
        log::debug!(
            "Flattened {} references into '{}' ({} shapes)",
            references.len(),
            self.name,
            self.shapes.len()
        );
    }

    /// Layers used anywhere in the hierarchy, sorted.
    pub fn layers(&self) -> Vec<LayerId> {
        let mut layers: Vec<LayerId> = self
            .shapes_under(&Transform::default())
            .iter()
            .map(|g| g.layer())
            .collect();
        layers.sort();
        layers.dedup();
        layers
    }

    /// Renumber electrical (`e1..`) and optical (`o1..`) ports clockwise:
    /// west ports south to north, north ports west to east, east ports
    /// north to south, south ports east to west.
    pub fn auto_rename_ports(&mut self) {
        for port_type in [PortType::Electrical, PortType::Optical] {
            let Some(prefix) = port_type.rename_prefix() else {
                continue;
            };
            let mut indices: Vec<usize> = (0..self.ports.len())
                .filter(|&i| self.ports[i].port_type == port_type)
                .collect();
            indices.sort_by(|&a, &b| {
                let (ka, kb) = (clockwise_key(&self.ports[a]), clockwise_key(&self.ports[b]));
                ka.0.cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
            });
            for (n, i) in indices.into_iter().enumerate() {
                self.ports[i].name = format!("{prefix}{}", n + 1);
            }
        }
    }
}

fn clockwise_key(port: &Port) -> (u8, f64) {
    match port.orientation {
        Orientation::West => (0, port.center.y),
        Orientation::North => (1, port.center.x),
        Orientation::East => (2, -port.center.y),
        Orientation::South => (3, -port.center.x),
    }
}
