use std::fmt;

use serde::{Deserialize, Serialize};

/// A GDS (layer, datatype) pair. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(u16, u16)", into = "(u16, u16)")]
pub struct LayerId {
    pub layer: u16,
    pub datatype: u16,
}

impl LayerId {
    pub const fn new(layer: u16, datatype: u16) -> Self {
        Self { layer, datatype }
    }
}

impl From<(u16, u16)> for LayerId {
    fn from((layer, datatype): (u16, u16)) -> Self {
        Self::new(layer, datatype)
    }
}

impl From<LayerId> for (u16, u16) {
    fn from(id: LayerId) -> Self {
        (id.layer, id.datatype)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.layer, self.datatype)
    }
}

/// A named technology layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    #[serde(default)]
    pub color: LayerColor,
    #[serde(default)]
    pub description: String,
}

impl Layer {
    pub fn new(name: &str, layer: u16, datatype: u16) -> Self {
        Self {
            id: LayerId::new(layer, datatype),
            name: name.to_string(),
            color: LayerColor::default(),
            description: String::new(),
        }
    }

    pub fn with_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = LayerColor { r, g, b };
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }
}

/// RGB display color for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for LayerColor {
    fn default() -> Self {
        Self {
            r: 128,
            g: 128,
            b: 128,
        }
    }
}

impl LayerColor {
    /// CSS hex notation, e.g. `#80a0ff`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// An ordered registry of layers, searchable by name and by GDS id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a layer, replacing any existing layer with the same name.
    pub fn add_layer(&mut self, layer: Layer) {
        match self.layers.iter_mut().find(|l| l.name == layer.name) {
            Some(existing) => *existing = layer,
            None => self.layers.push(layer),
        }
    }

    pub fn get_layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// First layer registered for a GDS id. Several names may alias one id.
    pub fn get_layer_by_id(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn all_layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_id_serializes_as_pair() {
        let json = serde_json::to_string(&LayerId::new(49, 0)).unwrap();
        assert_eq!(json, "[49,0]");
        let back: LayerId = serde_json::from_str("[41, 2]").unwrap();
        assert_eq!(back, LayerId::new(41, 2));
    }

    #[test]
    fn test_stack_lookup_and_replace() {
        let mut stack = LayerStack::new();
        stack.add_layer(Layer::new("M1", 41, 0));
        stack.add_layer(Layer::new("MTOP", 49, 0));
        stack.add_layer(Layer::new("M1", 42, 0));
        assert_eq!(stack.layer_count(), 2);
        assert_eq!(stack.get_layer("M1").unwrap().id, LayerId::new(42, 0));
        assert_eq!(stack.get_layer_by_id(LayerId::new(49, 0)).unwrap().name, "MTOP");
        assert!(stack.get_layer("WG").is_none());
    }

    #[test]
    fn test_color_hex() {
        let layer = Layer::new("M1", 41, 0).with_color(255, 0, 16);
        assert_eq!(layer.color.to_hex(), "#ff0010");
    }
}
