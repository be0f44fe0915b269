//! # padkit viewer
//!
//! Small web service for browsing the PDK cells, customizing their settings
//! and exporting the resulting variants as GDS.

pub mod config;
pub mod error;
pub mod html;
pub mod routes;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::Router;
use padkit_cells::Pdk;
use padkit_io::TechFile;

pub use config::ViewerConfig;
pub use error::ViewerError;
pub use store::VariantStore;

/// Database unit of exported GDS files when no technology file sets one.
pub const DEFAULT_DB_UNIT_IN_UM: f64 = 0.001;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pdk: Arc<Pdk>,
    pub config: Arc<ViewerConfig>,
    pub variants: Arc<VariantStore>,
    /// Most recently exported GDS file.
    pub last_saved: Arc<Mutex<Option<PathBuf>>>,
    pub db_unit_in_um: f64,
}

impl AppState {
    pub fn new(pdk: Pdk, config: ViewerConfig, db_unit_in_um: f64) -> Self {
        Self {
            pdk: Arc::new(pdk),
            variants: Arc::new(VariantStore::new(config.variant_capacity)),
            config: Arc::new(config),
            last_saved: Arc::new(Mutex::new(None)),
            db_unit_in_um,
        }
    }

    /// Load the PDK named by `config.pdk`: `generic`, or a technology file.
    pub fn from_config(config: ViewerConfig) -> Result<Self, ViewerError> {
        if config.pdk == "generic" {
            return Ok(Self::new(Pdk::generic(), config, DEFAULT_DB_UNIT_IN_UM));
        }
        let tech = TechFile::load(Path::new(&config.pdk))?;
        let pdk = tech.into_pdk()?;
        Ok(Self::new(pdk, config, tech.db_unit_in_um()))
    }
}

pub fn app(state: AppState) -> Router {
    Router::new().merge(routes::router()).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_state() {
        let state = AppState::from_config(ViewerConfig::default()).unwrap();
        assert_eq!(state.pdk.name, "generic");
        assert!(state.pdk.has_cell("resistance_meander"));
        assert!((state.db_unit_in_um - 0.001).abs() < 1e-12);
        assert_eq!(state.variants.capacity(), 64);
    }

    #[test]
    fn test_state_from_techfile() {
        let path = std::env::temp_dir().join(format!("padkit-tech-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"name": "demo", "layers": [{"name": "PAD", "layer": 81, "datatype": 0}],
                "settings": {"dbu_per_um": 2000}}"#,
        )
        .unwrap();
        let config = ViewerConfig {
            pdk: path.to_string_lossy().into_owned(),
            ..Default::default()
        };
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.pdk.name, "demo");
        assert!((state.db_unit_in_um - 0.0005).abs() < 1e-12);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_techfile() {
        let config = ViewerConfig {
            pdk: "/nonexistent/tech.json".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            AppState::from_config(config),
            Err(ViewerError::TechFile(_))
        ));
    }
}
