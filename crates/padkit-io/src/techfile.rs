use std::path::Path;

use padkit_cells::Pdk;
use padkit_core::Layer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TechFileError {
    #[error("Cannot read technology file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed technology file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Layer '{layer}' has invalid color '{color}', expected #rrggbb")]
    InvalidColor { layer: String, color: String },

    #[error("dbu_per_um must be a positive number, got {0}")]
    InvalidDbu(f64),
}

/// A JSON technology file: layer map, named constants and database settings
/// layered on top of a PDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub layers: Vec<TechLayer>,
    #[serde(default)]
    pub constants: Map<String, Value>,
    #[serde(default)]
    pub settings: TechSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechLayer {
    pub name: String,
    pub layer: u16,
    #[serde(default)]
    pub datatype: u16,
    /// `#rrggbb`
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechSettings {
    pub dbu_per_um: f64,
}

impl Default for TechSettings {
    fn default() -> Self {
        Self { dbu_per_um: 1000.0 }
    }
}

impl TechFile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            layers: Vec::new(),
            constants: Map::new(),
            settings: TechSettings::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TechFileError> {
        let tech: Self = serde_json::from_str(json)?;
        let dbu = tech.settings.dbu_per_um;
        if !dbu.is_finite() || dbu <= 0.0 {
            return Err(TechFileError::InvalidDbu(dbu));
        }
        Ok(tech)
    }

    pub fn load(path: &Path) -> Result<Self, TechFileError> {
        let tech = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded technology '{}' from {} ({} layers)",
            tech.name,
            path.display(),
            tech.layers.len()
        );
        Ok(tech)
    }

    /// Database unit in microns for the GDS writer.
    pub fn db_unit_in_um(&self) -> f64 {
        1.0 / self.settings.dbu_per_um
    }

    /// Add the layers and constants to `pdk`, replacing same-named entries,
    /// and rename it after this technology.
    pub fn apply(&self, pdk: &mut Pdk) -> Result<(), TechFileError> {
        for tech_layer in &self.layers {
            let mut layer = Layer::new(&tech_layer.name, tech_layer.layer, tech_layer.datatype)
                .with_description(&tech_layer.description);
            if let Some(color) = &tech_layer.color {
                let (r, g, b) =
                    parse_hex_color(color).ok_or_else(|| TechFileError::InvalidColor {
                        layer: tech_layer.name.clone(),
                        color: color.clone(),
                    })?;
                layer = layer.with_color(r, g, b);
            }
            pdk.layers.add_layer(layer);
        }
        for (name, value) in &self.constants {
            pdk.set_constant(name, value.clone());
        }
        pdk.name = self.name.clone();
        Ok(())
    }

    /// The generic PDK with this technology applied.
    pub fn into_pdk(&self) -> Result<Pdk, TechFileError> {
        let mut pdk = Pdk::generic();
        self.apply(&mut pdk)?;
        Ok(pdk)
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
