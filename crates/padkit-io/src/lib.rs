//! # padkit I/O
//!
//! GDS-II stream reader and writer over the component tree, and JSON
//! technology files that extend a PDK with layers, constants and the
//! database unit.

pub mod gds;
pub mod techfile;

pub use gds::{read_gds, write_gds, GdsError, GdsReader, GdsWriter};
pub use techfile::{TechFile, TechFileError, TechLayer, TechSettings};
