use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use padkit_core::{Component, Layer, LayerId, LayerStack, Size};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CellError, Result};
use crate::meander::MeanderParams;
use crate::pad::{PadArrayParams, PadParams};
use crate::params::{build, with_overrides, CellParams};
use crate::primitives::{CompassParams, RectangleParams};

/// Parameter overrides keyed by parameter name.
pub type Settings = Map<String, Value>;

/// Builds a component from overrides.
pub type CellFactory = Arc<dyn Fn(&Settings, &Pdk) -> Result<Component> + Send + Sync>;

/// A layer given by PDK name (`"MTOP"`) or GDS pair (`[49, 0]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerSpec {
    Id(LayerId),
    Name(String),
}

impl From<&str> for LayerSpec {
    fn from(name: &str) -> Self {
        LayerSpec::Name(name.to_string())
    }
}

impl From<LayerId> for LayerSpec {
    fn from(id: LayerId) -> Self {
        LayerSpec::Id(id)
    }
}

/// A size given literally (`[100, 100]`) or by PDK constant (`"pad_size"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    Value(Size),
    Constant(String),
}

impl From<Size> for SizeSpec {
    fn from(size: Size) -> Self {
        SizeSpec::Value(size)
    }
}

/// Process design kit: layer map, named constants and the cell registry.
pub struct Pdk {
    pub name: String,
    pub layers: LayerStack,
    constants: Map<String, Value>,
    cells: IndexMap<String, CellFactory>,
}

impl fmt::Debug for Pdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pdk")
            .field("name", &self.name)
            .field("layers", &self.layers)
            .field("constants", &self.constants)
            .field("cells", &self.cells.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Pdk {
    /// An empty PDK: no layers, constants or cells.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            layers: LayerStack::new(),
            constants: Map::new(),
            cells: IndexMap::new(),
        }
    }

    /// The built-in generic PDK with every generator of this crate.
    pub fn generic() -> Self {
        let mut pdk = Self::new("generic");
        for layer in generic_layers() {
            pdk.layers.add_layer(layer);
        }
        pdk.set_constant("pad_size", serde_json::json!([100.0, 100.0]));

        pdk.register_cell("rectangle", RectangleParams::default);
        pdk.register_cell("compass", CompassParams::default);
        pdk.register_cell("pad", PadParams::default);
        pdk.register_cell("pad_rectangular", PadParams::rectangular);
        pdk.register_cell("pad_small", PadParams::small);
        pdk.register_cell("pad_array", PadArrayParams::default);
        pdk.register_cell("pad_array0", PadArrayParams::east);
        pdk.register_cell("pad_array90", PadArrayParams::north);
        pdk.register_cell("pad_array180", PadArrayParams::west);
        pdk.register_cell("pad_array270", PadArrayParams::south);
        pdk.register_cell("resistance_meander", MeanderParams::default);
        pdk
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, factory: CellFactory) {
        self.cells.insert(name.to_string(), factory);
    }

    /// Register a generator preset: overrides are merged onto `preset()`.
    pub fn register_cell<P>(&mut self, name: &str, preset: fn() -> P)
    where
        P: CellParams + 'static,
    {
        self.register(
            name,
            Arc::new(move |overrides: &Settings, pdk: &Pdk| {
                let params = with_overrides(preset(), overrides)?;
                build(&params, pdk)
            }),
        );
    }

    pub fn has_cell(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Registered cell names, sorted.
    pub fn cell_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cells.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a registered cell with `overrides` applied.
    pub fn get_component(&self, name: &str, overrides: &Settings) -> Result<Component> {
        let factory = self
            .cells
            .get(name)
            .ok_or_else(|| CellError::UnknownCell(name.to_string()))?;
        factory(overrides, self)
    }

    pub fn get_layer(&self, spec: &LayerSpec) -> Result<LayerId> {
        match spec {
            LayerSpec::Id(id) => Ok(*id),
            LayerSpec::Name(name) => self
                .layers
                .get_layer(name)
                .map(|l| l.id)
                .ok_or_else(|| CellError::UnknownLayer(name.clone())),
        }
    }

    pub fn set_constant(&mut self, name: &str, value: Value) {
        self.constants.insert(name.to_string(), value);
    }

    pub fn get_constant<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .constants
            .get(name)
            .ok_or_else(|| CellError::UnknownConstant(name.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn resolve_size(&self, spec: &SizeSpec) -> Result<Size> {
        match spec {
            SizeSpec::Value(size) => Ok(*size),
            SizeSpec::Constant(name) => self.get_constant(name),
        }
    }
}

fn generic_layers() -> Vec<Layer> {
    vec![
        Layer::new("WG", 1, 0).with_color(0, 114, 255).with_description("Waveguide core"),
        Layer::new("SLAB90", 3, 0).with_color(120, 170, 255),
        Layer::new("N", 20, 0).with_color(120, 200, 120),
        Layer::new("P", 21, 0).with_color(200, 120, 120),
        Layer::new("VIAC", 40, 0).with_color(90, 90, 90),
        Layer::new("M1", 41, 0).with_color(0, 180, 180).with_description("Metal 1"),
        Layer::new("VIA1", 44, 0).with_color(70, 70, 70),
        Layer::new("M2", 45, 0).with_color(180, 120, 220).with_description("Metal 2"),
        Layer::new("VIA2", 43, 0).with_color(50, 50, 50),
        Layer::new("PADOPEN", 46, 0).with_color(255, 200, 0),
        Layer::new("HEATER", 47, 0).with_color(255, 120, 0),
        Layer::new("M3", 49, 0).with_color(230, 190, 60).with_description("Metal 3"),
        Layer::new("MTOP", 49, 0).with_color(230, 190, 60).with_description("Top metal"),
        Layer::new("FLOORPLAN", 64, 0).with_color(200, 200, 200),
        Layer::new("TEXT", 66, 0).with_color(40, 40, 40),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_spec_forms() {
        let pdk = Pdk::generic();
        assert_eq!(pdk.get_layer(&"MTOP".into()).unwrap(), LayerId::new(49, 0));
        assert_eq!(pdk.get_layer(&LayerId::new(7, 1).into()).unwrap(), LayerId::new(7, 1));
        assert!(matches!(
            pdk.get_layer(&"NOPE".into()),
            Err(CellError::UnknownLayer(name)) if name == "NOPE"
        ));

        let spec: LayerSpec = serde_json::from_str("[41, 0]").unwrap();
        assert_eq!(spec, LayerSpec::Id(LayerId::new(41, 0)));
        let spec: LayerSpec = serde_json::from_str("\"M2\"").unwrap();
        assert_eq!(spec, LayerSpec::Name("M2".into()));
    }

    #[test]
    fn test_size_constant() {
        let pdk = Pdk::generic();
        let size = pdk.resolve_size(&SizeSpec::Constant("pad_size".into())).unwrap();
        assert_eq!(size, (100.0, 100.0));
        assert!(pdk.resolve_size(&SizeSpec::Constant("nope".into())).is_err());
    }

    #[test]
    fn test_registry_lists_presets() {
        let pdk = Pdk::generic();
        let names = pdk.cell_names();
        for expected in ["pad", "pad_small", "pad_array90", "resistance_meander"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_unknown_cell() {
        let pdk = Pdk::generic();
        assert!(matches!(
            pdk.get_component("does_not_exist", &Settings::new()),
            Err(CellError::UnknownCell(_))
        ));
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let pdk = Pdk::generic();
        let mut overrides = Settings::new();
        overrides.insert("colour".into(), Value::from("red"));
        assert!(matches!(
            pdk.get_component("pad", &overrides),
            Err(CellError::Settings(_))
        ));
    }
}
