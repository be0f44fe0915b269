//! # padkit cells
//!
//! Parametric layout generators and the PDK that registers them: rectangles
//! and compasses, rectangular pads, pad arrays and meander resistors.
//!
//! Every generator is a parameter struct implementing [`CellParams`]. Cells are
//! built either directly (`pad(&PadParams { .. }, &pdk)`) or by registered
//! name with JSON overrides (`pdk.get_component("pad_array", &overrides)`).
//! Both paths give the same deterministic cell name for the same parameters.

pub mod error;
pub mod meander;
pub mod pad;
pub mod params;
pub mod pdk;
pub mod primitives;

pub use error::{CellError, Result};
pub use meander::{meander_layout, resistance_meander, MeanderLayout, MeanderParams};
pub use pad::{pad, pad_array, PadArrayParams, PadParams};
pub use params::{build, cell_name, CellParams};
pub use pdk::{CellFactory, LayerSpec, Pdk, Settings, SizeSpec};
pub use primitives::{compass, rectangle, CompassParams, RectangleParams};
