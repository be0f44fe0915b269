use std::collections::BTreeMap;

use padkit_core::{Component, ComponentSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{CellError, Result};
use crate::pdk::{Pdk, Settings};

/// Parameters of a layout generator.
///
/// `Default` holds the generator defaults; presets are other constructors
/// of the same type. Implementations reject unknown fields so that a typo in
/// a settings override is an error rather than a silent no-op.
pub trait CellParams: Serialize + DeserializeOwned + Default {
    /// Generator name, the prefix of every cell name it produces.
    const FUNCTION: &'static str;

    /// Draw the component. Naming and the settings record are handled by
    /// [`build`].
    fn draw(&self, pdk: &Pdk) -> Result<Component>;
}

/// Draw `params` and attach its deterministic name and settings record.
pub fn build<P: CellParams>(params: &P, pdk: &Pdk) -> Result<Component> {
    let mut component = params.draw(pdk)?;
    let settings = settings_record(P::FUNCTION, &P::default(), params)?;
    component.name = cell_name(&settings)?;
    component.settings = Some(settings);
    log::debug!("Built cell '{}'", component.name);
    Ok(component)
}

/// Merge `overrides` onto `preset`.
pub fn with_overrides<P: CellParams>(preset: P, overrides: &Settings) -> Result<P> {
    let mut map = to_map(&preset)?;
    for (key, value) in overrides {
        map.insert(key.clone(), value.clone());
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(CellError::InvalidParameter(format!(
            "parameters must serialize to an object, got {other}"
        ))),
    }
}

pub fn settings_record<P: Serialize>(
    function: &str,
    defaults: &P,
    params: &P,
) -> Result<ComponentSettings> {
    let default = to_map(defaults)?;
    let full = to_map(params)?;
    let changed = full
        .iter()
        .filter(|(key, value)| default.get(key.as_str()) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Ok(ComponentSettings {
        function_name: function.to_string(),
        default,
        changed,
        full,
    })
}

/// `<function>` when nothing changed, else `<function>_<hash8>` where the
/// hash covers the changed settings with sorted keys.
pub fn cell_name(settings: &ComponentSettings) -> Result<String> {
    if settings.changed.is_empty() {
        return Ok(settings.function_name.clone());
    }
    let sorted: BTreeMap<&String, &Value> = settings.changed.iter().collect();
    let canonical = serde_json::to_string(&sorted)?;
    let digest = hex::encode(Sha256::digest(canonical.as_bytes()));
    Ok(format!("{}_{}", settings.function_name, &digest[..8]))
}
